pub mod assessments;
pub mod audit_logs;
pub mod communities;
pub mod content;
pub mod flags;
pub mod metrics;
pub mod organizations;
pub mod subscriptions;
pub mod users;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use common::observability::encode_metrics;
use common::types::{Health, Readiness};
use serde::Serialize;
use serde_json::Value;
use service::audit::AuditEntry;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};
use utoipa::OpenApi;

use crate::auth::require_auth;
use crate::middleware::{rate_limit, track_performance, Preset};
use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Process is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[utoipa::path(get, path = "/ready", tag = "health",
    responses((status = 200, description = "Database reachable"), (status = 503, description = "Database unreachable")))]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(Readiness::ready())),
        Err(e) => {
            warn!(event = "readiness_failed", error = %e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(Readiness::unavailable("unreachable")))
        }
    }
}

pub async fn prometheus_metrics() -> impl IntoResponse {
    let (status, body) = encode_metrics();
    (status, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Audit writes never fail the request.
pub(crate) async fn record_audit(state: &AppState, entry: AuditEntry) {
    service::audit::record(&state.db, entry).await;
}

pub(crate) fn snapshot<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

/// Build the full application router: public probes and docs plus the authenticated `/api` tree.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(prometheus_metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route_layer(from_fn_with_state((state.clone(), Preset::Public), rate_limit));

    let api = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/me", get(users::me))
        .route(
            "/users/bulk",
            post(users::bulk).layer(from_fn_with_state((state.clone(), Preset::Bulk), rate_limit)),
        )
        .route("/users/:id", get(users::get).patch(users::update).delete(users::delete))
        .route("/organizations", get(organizations::list).post(organizations::create))
        .route("/organizations/:id", get(organizations::get).patch(organizations::update))
        .route(
            "/organizations/:id/members",
            get(organizations::list_members).post(organizations::invite_member),
        )
        .route("/assessments", get(assessments::list).post(assessments::create))
        .route("/assessments/:id", get(assessments::get))
        .route("/assessments/:id/questions", post(assessments::add_question))
        .route("/assessments/:id/start", post(assessments::start))
        .route("/user/assessments", get(assessments::list_mine))
        .route(
            "/user/assessments/:id",
            get(assessments::get_mine).put(assessments::update_mine).delete(assessments::delete_mine),
        )
        .route("/user/assessments/:id/responses", post(assessments::save_responses))
        .route(
            "/user/assessments/:id/complete",
            post(assessments::complete).layer(from_fn_with_state((state.clone(), Preset::Assessment), rate_limit)),
        )
        .route("/content", get(content::list).post(content::create))
        .route("/content/categories", get(content::list_categories).post(content::create_category))
        .route("/content/:id", get(content::get).patch(content::update).delete(content::delete))
        .route("/communities", get(communities::list).post(communities::create))
        .route("/communities/:id/join", post(communities::join))
        .route("/subscriptions/plans", get(subscriptions::plans))
        .route("/subscriptions/me", get(subscriptions::mine))
        .route("/audit-logs", get(audit_logs::list))
        .route("/feature-flags/:key", get(flags::evaluate))
        .route("/metrics/performance", get(metrics::performance))
        .route("/metrics/performance/report", get(metrics::report))
        // the api limit wraps authentication so rejected tokens still count
        .route_layer(from_fn_with_state(state.clone(), require_auth))
        .route_layer(from_fn_with_state((state.clone(), Preset::Api), rate_limit));

    Router::new()
        .merge(public)
        .nest("/api", api)
        .layer(from_fn_with_state(state.clone(), track_performance))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .with_state(state)
}
