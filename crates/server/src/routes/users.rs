use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use contracts::bulk::{BulkRequest, BulkResult};
use contracts::pagination::DEFAULT_PAGE_LIMIT;
use contracts::users::{CreateUserProfileRequest, UpdateUserProfileRequest, UserFilters, UserProfileResponse, USER_SORTS};
use contracts::{ApiResponse, DeleteResponse, PaginatedResponse, PaginationQuery, Validate};
use service::bulk::run_bulk;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/users", tag = "users",
    responses((status = 200, description = "Paginated user profiles"), (status = 400, description = "Invalid query", body = crate::openapi::ErrorBody)))]
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(page): ValidQuery<PaginationQuery>,
    ValidQuery(filters): ValidQuery<UserFilters>,
) -> Result<Json<PaginatedResponse<UserProfileResponse>>, ApiError> {
    let page = page.resolve(DEFAULT_PAGE_LIMIT, USER_SORTS)?;
    Ok(Json(state.users.list(&filters, &page).await?))
}

/// Self-registration: the profile id is the caller's identity-provider id.
#[utoipa::path(post, path = "/api/users", tag = "users",
    responses((status = 201, description = "Profile created"), (status = 409, description = "Email already registered", body = crate::openapi::ErrorBody)))]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(req): ValidJson<CreateUserProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfileResponse>>), ApiError> {
    let created = state.users.create(user.id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

#[utoipa::path(get, path = "/api/users/me", tag = "users",
    responses((status = 200, description = "The caller's profile"), (status = 404, description = "No profile yet", body = crate::openapi::ErrorBody)))]
pub async fn me(State(state): State<AppState>, user: AuthUser) -> Result<Json<ApiResponse<UserProfileResponse>>, ApiError> {
    let profile = state.users.get(user.id).await?;
    if let Err(e) = state.users.touch_last_active(user.id).await {
        warn!(event = "touch_last_active_failed", user_id = %user.id, error = %e);
    }
    Ok(Json(ApiResponse::ok(profile)))
}

#[utoipa::path(get, path = "/api/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "User profile"), (status = 404, description = "Not found", body = crate::openapi::ErrorBody)))]
pub async fn get(State(state): State<AppState>, ValidPath(id): ValidPath<Uuid>) -> Result<Json<ApiResponse<UserProfileResponse>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.users.get(id).await?)))
}

#[utoipa::path(patch, path = "/api/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "Updated profile"), (status = 403, description = "Not the profile owner", body = crate::openapi::ErrorBody)))]
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<UpdateUserProfileRequest>,
) -> Result<Json<ApiResponse<UserProfileResponse>>, ApiError> {
    let updated = state.users.update(user.id, id, req).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

#[utoipa::path(delete, path = "/api/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "Deleted", body = crate::openapi::DeleteBody), (status = 403, description = "Not the profile owner", body = crate::openapi::ErrorBody)))]
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.users.delete(user.id, id).await?;
    Ok(Json(DeleteResponse::new("User deleted successfully")))
}

#[utoipa::path(post, path = "/api/users/bulk", tag = "users",
    responses((status = 200, description = "Per-item results and a summary"), (status = 429, description = "Bulk limit reached", body = crate::openapi::ErrorBody)))]
pub async fn bulk(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(req): ValidJson<BulkRequest>,
) -> Result<Json<ApiResponse<BulkResult>>, ApiError> {
    req.validate()?;
    let result = run_bulk(state.users.as_ref(), user.id, req.operations).await;
    info!(
        event = "bulk_users",
        actor_id = %user.id,
        total = result.summary.total,
        failed = result.summary.failed
    );
    Ok(Json(ApiResponse::ok(result)))
}
