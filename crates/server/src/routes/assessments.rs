use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use contracts::assessments::{
    AssessmentFilters, AssessmentResponse, AssessmentWithQuestions, CreateAssessmentRequest, CreateQuestionRequest,
    QuestionResponse, SavedResponsesResponse, SubmitResponsesRequest, UpdateUserAssessmentRequest,
    UserAssessmentResponse, ASSESSMENT_SORTS,
};
use contracts::pagination::{ASSESSMENT_PAGE_LIMIT, DEFAULT_PAGE_LIMIT};
use contracts::{ApiResponse, DeleteResponse, PaginatedResponse, PaginationQuery};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/assessments", tag = "assessments",
    responses((status = 200, description = "Paginated assessments, newest published first")))]
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(page): ValidQuery<PaginationQuery>,
    ValidQuery(filters): ValidQuery<AssessmentFilters>,
) -> Result<Json<PaginatedResponse<AssessmentResponse>>, ApiError> {
    let page = page.resolve(ASSESSMENT_PAGE_LIMIT, ASSESSMENT_SORTS)?;
    Ok(Json(state.assessments.list(&filters, &page).await?))
}

#[utoipa::path(post, path = "/api/assessments", tag = "assessments",
    responses((status = 201, description = "Assessment created"), (status = 409, description = "Slug taken", body = crate::openapi::ErrorBody)))]
pub async fn create(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AssessmentResponse>>), ApiError> {
    let created = state.assessments.create(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

#[utoipa::path(get, path = "/api/assessments/{id}", tag = "assessments",
    params(("id" = Uuid, Path, description = "Assessment id")),
    responses((status = 200, description = "Assessment with ordered questions"), (status = 404, description = "Not found", body = crate::openapi::ErrorBody)))]
pub async fn get(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<ApiResponse<AssessmentWithQuestions>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.assessments.get_with_questions(id).await?)))
}

#[utoipa::path(post, path = "/api/assessments/{id}/questions", tag = "assessments",
    params(("id" = Uuid, Path, description = "Assessment id")),
    responses((status = 201, description = "Question added")))]
pub async fn add_question(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<QuestionResponse>>), ApiError> {
    let question = state.assessments.add_question(id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(question))))
}

#[utoipa::path(post, path = "/api/assessments/{id}/start", tag = "assessments",
    params(("id" = Uuid, Path, description = "Assessment id")),
    responses((status = 201, description = "Attempt started or resumed"), (status = 400, description = "Assessment is not active", body = crate::openapi::ErrorBody)))]
pub async fn start(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<UserAssessmentResponse>>), ApiError> {
    let attempt = state.assessments.start(user.id, id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(attempt))))
}

#[utoipa::path(get, path = "/api/user/assessments", tag = "user-assessments",
    responses((status = 200, description = "The caller's attempts, newest first")))]
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
    ValidQuery(page): ValidQuery<PaginationQuery>,
) -> Result<Json<PaginatedResponse<UserAssessmentResponse>>, ApiError> {
    let page = page.resolve(DEFAULT_PAGE_LIMIT, &["startedAt"])?;
    Ok(Json(state.assessments.list_for_user(user.id, &page).await?))
}

#[utoipa::path(get, path = "/api/user/assessments/{id}", tag = "user-assessments",
    params(("id" = Uuid, Path, description = "Attempt id")),
    responses((status = 200, description = "Attempt"), (status = 403, description = "Another user's attempt", body = crate::openapi::ErrorBody)))]
pub async fn get_mine(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<ApiResponse<UserAssessmentResponse>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.assessments.get_user_assessment(user.id, id).await?)))
}

#[utoipa::path(put, path = "/api/user/assessments/{id}", tag = "user-assessments",
    params(("id" = Uuid, Path, description = "Attempt id")),
    responses((status = 200, description = "Attempt updated")))]
pub async fn update_mine(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<UpdateUserAssessmentRequest>,
) -> Result<Json<ApiResponse<UserAssessmentResponse>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.assessments.update_user_assessment(user.id, id, req).await?)))
}

#[utoipa::path(delete, path = "/api/user/assessments/{id}", tag = "user-assessments",
    params(("id" = Uuid, Path, description = "Attempt id")),
    responses((status = 200, description = "Deleted", body = crate::openapi::DeleteBody)))]
pub async fn delete_mine(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.assessments.delete_user_assessment(user.id, id).await?;
    Ok(Json(DeleteResponse::new("Assessment attempt deleted successfully")))
}

#[utoipa::path(post, path = "/api/user/assessments/{id}/responses", tag = "user-assessments",
    params(("id" = Uuid, Path, description = "Attempt id")),
    responses((status = 200, description = "Answers saved"), (status = 409, description = "Attempt already completed", body = crate::openapi::ErrorBody)))]
pub async fn save_responses(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<SubmitResponsesRequest>,
) -> Result<Json<ApiResponse<SavedResponsesResponse>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.assessments.save_responses(user.id, id, req).await?)))
}

#[utoipa::path(post, path = "/api/user/assessments/{id}/complete", tag = "user-assessments",
    params(("id" = Uuid, Path, description = "Attempt id")),
    responses((status = 200, description = "Scored attempt"), (status = 409, description = "Already completed", body = crate::openapi::ErrorBody), (status = 429, description = "Completion limit reached", body = crate::openapi::ErrorBody)))]
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<ApiResponse<UserAssessmentResponse>>, ApiError> {
    let scored = state.assessments.complete(user.id, id).await?;
    Ok(Json(ApiResponse::with_message(scored, "Assessment completed")))
}
