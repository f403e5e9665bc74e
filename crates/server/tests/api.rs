use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use configs::{AppConfig, RateLimitRule};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use service::assessments::repository::mock::MockAssessmentRepository;
use service::content::repository::mock::MockContentRepository;
use service::feature_flags::mock::MockFlagStore;
use service::users::repository::mock::MockUserRepository;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes;
use server::state::{AppState, Repositories};

const SECRET: &str = "router-test-secret";

fn config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = SECRET.into();
    cfg
}

fn build_app_with(cfg: &AppConfig, flags: MockFlagStore) -> Router {
    let repos = Repositories {
        users: Arc::new(MockUserRepository::default()),
        assessments: Arc::new(MockAssessmentRepository::default()),
        content: Arc::new(MockContentRepository::default()),
        flags: Arc::new(flags),
    };
    // no database: handlers backed by mocks still work, readiness reports 503
    let state = AppState::new(cfg, DatabaseConnection::Disconnected, repos);
    routes::build_router(state, CorsLayer::very_permissive())
}

fn build_app() -> Router {
    build_app_with(&config(), MockFlagStore::default())
}

fn token_for(user: Uuid) -> String {
    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
        email: String,
    }
    let claims = Claims {
        sub: user.to_string(),
        exp: chrono::Utc::now().timestamp() + 600,
        email: format!("{}@church.org", user.simple()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).expect("sign token")
}

fn get(uri: &str, user: Option<Uuid>) -> Request<Body> {
    let mut b = Request::builder().method("GET").uri(uri);
    if let Some(id) = user {
        b = b.header(header::AUTHORIZATION, format!("Bearer {}", token_for(id)));
    }
    b.body(Body::empty()).expect("request")
}

fn send_json(method: &str, uri: &str, user: Uuid, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(user)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn call(app: &Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let res = app.clone().oneshot(req).await.expect("router is infallible");
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = res.into_body().collect().await.expect("body").to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn profile(email: &str) -> Value {
    json!({
        "email": email,
        "firstName": "Ada",
        "lastName": "Okafor",
        "ministryRole": "senior_pastor",
        "countryCode": "NG"
    })
}

#[tokio::test]
async fn health_is_public_and_tagged() {
    let app = build_app();
    let (status, headers, body) = call(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(headers["x-request-id"].to_str().unwrap().starts_with("req_"));
    assert!(headers["x-response-time"].to_str().unwrap().ends_with("ms"));
    assert_eq!(headers["x-ratelimit-limit"], "1000");
}

#[tokio::test]
async fn readiness_reports_unreachable_database() {
    let app = build_app();
    let (status, _, body) = call(&app, get("/ready", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "unreachable");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = build_app();
    let (status, _, body) = call(&app, get("/api-docs/openapi.json", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Ministry Platform API");
    assert!(body["paths"].get("/api/users/{id}").is_some());
}

#[tokio::test]
async fn api_requires_a_token() {
    let app = build_app();
    let (status, _, body) = call(&app, get("/api/users", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTHENTICATION_ERROR");
    assert_eq!(body["message"], "Authentication required");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let app = build_app();
    let user = Uuid::new_v4();
    let req = Request::builder()
        .uri("/api/users")
        .header(header::COOKIE, format!("{}={}", config().auth.session_cookie, token_for(user)))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let app = build_app();
    let claims = json!({ "sub": Uuid::new_v4().to_string(), "exp": chrono::Utc::now().timestamp() + 600 });
    let forged = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"not-the-secret")).unwrap();
    let req = Request::builder()
        .uri("/api/users")
        .header(header::AUTHORIZATION, format!("Bearer {}", forged))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = build_app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(Uuid::new_v4())))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\":"))
        .unwrap();
    let (status, _, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], "body");
}

#[tokio::test]
async fn bad_path_id_is_a_validation_error() {
    let app = build_app();
    let (status, _, body) = call(&app, get("/api/users/not-a-uuid", Some(Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], "params");
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = build_app();
    let missing = Uuid::new_v4();
    let (status, _, body) = call(&app, get(&format!("/api/users/{}", missing), Some(Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["message"], format!("User with ID {} not found", missing));
}

#[tokio::test]
async fn profile_lifecycle_and_pagination() {
    let app = build_app();
    let me = Uuid::new_v4();

    let (status, _, body) = call(&app, send_json("POST", "/api/users", me, profile("ada@church.org"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], me.to_string());

    let (status, _, body) = call(&app, get("/api/users/me", Some(me))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@church.org");

    let (status, _, body) = call(&app, get("/api/users?page=1&limit=5", Some(me))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["limit"], 5);
    assert_eq!(body["pagination"]["hasNext"], false);

    let (status, _, body) =
        call(&app, send_json("PATCH", &format!("/api/users/{}", me), me, json!({ "bio": "Church planter" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bio"], "Church planter");

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/users/{}", me))
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(me)))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = build_app();
    let (status, _, _) = call(&app, send_json("POST", "/api/users", Uuid::new_v4(), profile("dup@church.org"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _, body) = call(&app, send_json("POST", "/api/users", Uuid::new_v4(), profile("dup@church.org"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn foreign_profile_update_is_forbidden() {
    let app = build_app();
    let owner = Uuid::new_v4();
    call(&app, send_json("POST", "/api/users", owner, profile("owner@church.org"))).await;

    let intruder = Uuid::new_v4();
    let (status, _, body) =
        call(&app, send_json("PATCH", &format!("/api/users/{}", owner), intruder, json!({ "bio": "mine now" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "AUTHORIZATION_ERROR");
}

#[tokio::test]
async fn unknown_sort_field_is_rejected() {
    let app = build_app();
    let (status, _, body) = call(&app, get("/api/users?sort=password", Some(Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn api_limit_returns_429_with_headers() {
    let mut cfg = config();
    cfg.rate_limit.api = RateLimitRule::new(2, 60);
    let app = build_app_with(&cfg, MockFlagStore::default());
    let user = Uuid::new_v4();

    let (status, headers, _) = call(&app, get("/api/users", Some(user))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-ratelimit-limit"], "2");
    assert_eq!(headers["x-ratelimit-remaining"], "1");
    assert!(headers.contains_key("x-ratelimit-reset"));

    call(&app, get("/api/users", Some(user))).await;
    let (status, headers, body) = call(&app, get("/api/users", Some(user))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "RATE_LIMIT_EXCEEDED");
    assert_eq!(body["details"]["limit"], 2);
    assert_eq!(body["details"]["remaining"], 0);
    assert!(headers.contains_key(header::RETRY_AFTER));
}

#[tokio::test]
async fn completion_limit_is_per_user_and_route() {
    let mut cfg = config();
    cfg.rate_limit.assessment = RateLimitRule::new(1, 3600);
    let app = build_app_with(&cfg, MockFlagStore::default());
    let user = Uuid::new_v4();
    let uri = format!("/api/user/assessments/{}/complete", Uuid::new_v4());

    let (status, headers, _) = call(&app, send_json("POST", &uri, user, json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    // the route preset owns the headers, not the api-wide limit
    assert_eq!(headers["x-ratelimit-limit"], "1");

    let (status, _, _) = call(&app, send_json("POST", &uri, user, json!({}))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // another caller has a budget of its own
    let (status, _, _) = call(&app, send_json("POST", &uri, Uuid::new_v4(), json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_reports_each_operation_and_a_summary() {
    let app = build_app();
    let me = Uuid::new_v4();
    let body = json!({
        "operations": [
            { "action": "create", "data": profile("bulk-one@church.org") },
            { "action": "delete" },
            { "action": "update", "id": Uuid::new_v4(), "data": { "bio": "not yours" } }
        ]
    });

    let (status, _, body) = call(&app, send_json("POST", "/api/users/bulk", me, body)).await;
    assert_eq!(status, StatusCode::OK);
    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["success"], true);
    assert!(results[0]["id"].is_string());
    assert_eq!(results[1]["success"], false);
    assert_eq!(results[1]["error"], "ID is required for delete operation");
    assert_eq!(results[2]["success"], false);
    assert_eq!(results[2]["error"], "Access denied");
    assert_eq!(body["data"]["summary"], json!({ "total": 3, "successful": 1, "failed": 2 }));
}

#[tokio::test]
async fn bulk_rejects_empty_and_oversized_batches() {
    let app = build_app();
    let me = Uuid::new_v4();

    let (status, _, body) = call(&app, send_json("POST", "/api/users/bulk", me, json!({ "operations": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "operations");

    let ops: Vec<Value> = (0..=contracts::bulk::MAX_BULK_OPERATIONS).map(|_| json!({ "action": "delete" })).collect();
    let (status, _, body) = call(&app, send_json("POST", "/api/users/bulk", me, json!({ "operations": ops }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], "operations");
}

#[tokio::test]
async fn bulk_limit_is_per_user() {
    let mut cfg = config();
    cfg.rate_limit.bulk = RateLimitRule::new(1, 3600);
    let app = build_app_with(&cfg, MockFlagStore::default());
    let user = Uuid::new_v4();
    let batch = || json!({ "operations": [{ "action": "delete" }] });

    let (status, headers, _) = call(&app, send_json("POST", "/api/users/bulk", user, batch())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-ratelimit-limit"], "1");
    assert_eq!(headers["x-ratelimit-remaining"], "0");

    let (status, headers, body) = call(&app, send_json("POST", "/api/users/bulk", user, batch())).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "RATE_LIMIT_EXCEEDED");
    assert!(headers.contains_key(header::RETRY_AFTER));

    let (status, _, _) = call(&app, send_json("POST", "/api/users/bulk", Uuid::new_v4(), batch())).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn apest_assessment_flow() {
    let app = build_app();
    let me = Uuid::new_v4();

    let (status, _, body) = call(
        &app,
        send_json(
            "POST",
            "/api/assessments",
            me,
            json!({ "name": "APEST Profile", "slug": "apest-profile", "assessmentType": "apest", "status": "active" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let assessment_id = body["data"]["id"].as_str().unwrap().to_string();

    let dims = ["apostolic", "prophetic", "evangelistic", "shepherding", "teaching"];
    let mut question_ids = Vec::new();
    for (i, dim) in dims.iter().enumerate() {
        let (status, _, body) = call(
            &app,
            send_json(
                "POST",
                &format!("/api/assessments/{}/questions", assessment_id),
                me,
                json!({
                    "questionText": format!("I am drawn to {} work", dim),
                    "questionType": "likert",
                    "orderIndex": i,
                    "apestDimension": dim
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        question_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let (status, _, body) =
        call(&app, send_json("POST", &format!("/api/assessments/{}/start", assessment_id), me, json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let attempt = body["data"]["id"].as_str().unwrap().to_string();

    let values = [7, 3, 4, 5, 2];
    let responses: Vec<Value> = question_ids
        .iter()
        .zip(values)
        .map(|(q, v)| json!({ "questionId": q, "responseValue": v }))
        .collect();
    let (status, _, body) = call(
        &app,
        send_json("POST", &format!("/api/user/assessments/{}/responses", attempt), me, json!({ "responses": responses })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _, body) =
        call(&app, send_json("POST", &format!("/api/user/assessments/{}/complete", attempt), me, json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Assessment completed");
    assert_eq!(body["data"]["isCompleted"], true);
    assert_eq!(body["data"]["completionPercentage"], 100);
    assert_eq!(body["data"]["primaryGift"], "apostolic");
    assert_eq!(body["data"]["secondaryGift"], "shepherding");

    // a finished attempt cannot be scored twice
    let (status, _, body) =
        call(&app, send_json("POST", &format!("/api/user/assessments/{}/complete", attempt), me, json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn attempts_are_private_to_their_owner() {
    let app = build_app();
    let me = Uuid::new_v4();
    let (_, _, body) = call(
        &app,
        send_json(
            "POST",
            "/api/assessments",
            me,
            json!({ "name": "Gifts", "slug": "gifts", "assessmentType": "apest", "status": "active" }),
        ),
    )
    .await;
    let assessment_id = body["data"]["id"].as_str().unwrap().to_string();
    let (_, _, body) =
        call(&app, send_json("POST", &format!("/api/assessments/{}/start", assessment_id), me, json!({}))).await;
    let attempt = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _, _) = call(&app, get(&format!("/api/user/assessments/{}", attempt), Some(Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn feature_flag_evaluation() {
    let now = chrono::Utc::now().fixed_offset();
    let flag = models::feature_flag::Model {
        id: Uuid::new_v4(),
        name: "New dashboard".into(),
        key: "new-dashboard".into(),
        description: None,
        default_value: json!(true),
        rollout_percentage: 100,
        environment: "production".into(),
        is_active: true,
        tags: Default::default(),
        owner: None,
        archived_at: None,
        created_at: now,
        updated_at: now,
    };
    let mut cfg = config();
    cfg.feature_flags.environment = "production".into();
    let app = build_app_with(&cfg, MockFlagStore::with(vec![flag]));
    let user = Uuid::new_v4();

    let (status, _, body) = call(&app, get("/api/feature-flags/new-dashboard", Some(user))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["enabled"], true);
    assert_eq!(body["data"]["reason"], "rollout");

    let (_, _, body) = call(&app, get("/api/feature-flags/unknown-flag", Some(user))).await;
    assert_eq!(body["data"]["enabled"], false);
    assert_eq!(body["data"]["reason"], "not_found");
}

#[tokio::test]
async fn performance_stats_count_served_requests() {
    let app = build_app();
    call(&app, get("/health", None)).await;
    call(&app, get("/api/users", None)).await;

    let (status, _, body) = call(&app, get("/api/metrics/performance", Some(Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalRequests"], 2);
    assert_eq!(body["data"]["errorRate"], 0.5);

    let (status, _, body) = call(&app, get("/api/metrics/performance?windowMinutes=0", Some(Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn prometheus_exposition_includes_http_counters() {
    let app = build_app();
    call(&app, get("/health", None)).await;
    let res = app.clone().oneshot(get("/metrics", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("http_requests_total"));
}

#[tokio::test]
async fn page_number_beyond_cap_is_a_validation_error() {
    let app = build_app();
    let (status, _, body) =
        call(&app, get("/api/users?page=18446744073709551615&limit=100", Some(Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], "page");
    assert_eq!(body["details"][0]["code"], "too_big");
}
