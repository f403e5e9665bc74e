use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use contracts::content::{
    CategoryResponse, ContentFilters, ContentItemResponse, CreateCategoryRequest, CreateContentRequest,
    UpdateContentRequest, CONTENT_SORTS,
};
use contracts::pagination::DEFAULT_PAGE_LIMIT;
use contracts::{ApiResponse, DeleteResponse, PaginatedResponse, PaginationQuery};
use models::enums::RiskLevel;
use service::audit::AuditEntry;
use uuid::Uuid;

use super::{record_audit, snapshot};
use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::extract::{AuditContext, ValidJson, ValidPath, ValidQuery};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/content", tag = "content",
    responses((status = 200, description = "Paginated content, published by default")))]
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(page): ValidQuery<PaginationQuery>,
    ValidQuery(filters): ValidQuery<ContentFilters>,
) -> Result<Json<PaginatedResponse<ContentItemResponse>>, ApiError> {
    let page = page.resolve(DEFAULT_PAGE_LIMIT, CONTENT_SORTS)?;
    Ok(Json(state.content.list(&filters, &page).await?))
}

#[utoipa::path(post, path = "/api/content", tag = "content",
    responses((status = 201, description = "Content created, caller is author"), (status = 409, description = "Slug taken", body = crate::openapi::ErrorBody)))]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AuditContext(ctx): AuditContext,
    ValidJson(req): ValidJson<CreateContentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContentItemResponse>>), ApiError> {
    let created = state.content.create(user.id, req).await?;
    record_audit(
        &state,
        AuditEntry::new(user.id, "create", "content", Some(created.id))
            .new_values(snapshot(&created))
            .context(ctx),
    )
    .await;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// Reading an item counts as a view.
#[utoipa::path(get, path = "/api/content/{id}", tag = "content",
    params(("id" = Uuid, Path, description = "Content id")),
    responses((status = 200, description = "Content item"), (status = 404, description = "Not found", body = crate::openapi::ErrorBody)))]
pub async fn get(State(state): State<AppState>, ValidPath(id): ValidPath<Uuid>) -> Result<Json<ApiResponse<ContentItemResponse>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.content.get(id).await?)))
}

#[utoipa::path(patch, path = "/api/content/{id}", tag = "content",
    params(("id" = Uuid, Path, description = "Content id")),
    responses((status = 200, description = "Updated content"), (status = 403, description = "Not the author", body = crate::openapi::ErrorBody)))]
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    AuditContext(ctx): AuditContext,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<UpdateContentRequest>,
) -> Result<Json<ApiResponse<ContentItemResponse>>, ApiError> {
    let updated = state.content.update(user.id, id, req).await?;
    record_audit(
        &state,
        AuditEntry::new(user.id, "update", "content", Some(id))
            .risk(RiskLevel::Medium)
            .new_values(snapshot(&updated))
            .context(ctx),
    )
    .await;
    Ok(Json(ApiResponse::ok(updated)))
}

#[utoipa::path(delete, path = "/api/content/{id}", tag = "content",
    params(("id" = Uuid, Path, description = "Content id")),
    responses((status = 200, description = "Deleted", body = crate::openapi::DeleteBody), (status = 403, description = "Not the author", body = crate::openapi::ErrorBody)))]
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AuditContext(ctx): AuditContext,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.content.delete(user.id, id).await?;
    record_audit(&state, AuditEntry::new(user.id, "delete", "content", Some(id)).risk(RiskLevel::High).context(ctx)).await;
    Ok(Json(DeleteResponse::new("Content deleted successfully")))
}

#[utoipa::path(get, path = "/api/content/categories", tag = "content",
    responses((status = 200, description = "Active categories")))]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.content.list_categories().await?)))
}

#[utoipa::path(post, path = "/api/content/categories", tag = "content",
    responses((status = 201, description = "Category created")))]
pub async fn create_category(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), ApiError> {
    let created = state.content.create_category(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}
