use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use contracts::communities::{
    CommunityFilters, CommunityMembershipResponse, CommunityResponse, CreateCommunityRequest, COMMUNITY_SORTS,
};
use contracts::pagination::DEFAULT_PAGE_LIMIT;
use contracts::{ApiResponse, PaginatedResponse, PaginationQuery};
use service::audit::AuditEntry;
use service::communities;
use uuid::Uuid;

use super::{record_audit, snapshot};
use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::extract::{AuditContext, ValidJson, ValidPath, ValidQuery};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/communities", tag = "communities",
    responses((status = 200, description = "Paginated active communities")))]
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(page): ValidQuery<PaginationQuery>,
    ValidQuery(filters): ValidQuery<CommunityFilters>,
) -> Result<Json<PaginatedResponse<CommunityResponse>>, ApiError> {
    let page = page.resolve(DEFAULT_PAGE_LIMIT, COMMUNITY_SORTS)?;
    Ok(Json(communities::list(&state.db, &filters, &page).await?))
}

#[utoipa::path(post, path = "/api/communities", tag = "communities",
    responses((status = 201, description = "Community created, caller is owner")))]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AuditContext(ctx): AuditContext,
    ValidJson(req): ValidJson<CreateCommunityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommunityResponse>>), ApiError> {
    let created = communities::create(&state.db, user.id, req).await?;
    record_audit(
        &state,
        AuditEntry::new(user.id, "create", "community", Some(created.id))
            .new_values(snapshot(&created))
            .context(ctx),
    )
    .await;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

#[utoipa::path(post, path = "/api/communities/{id}/join", tag = "communities",
    params(("id" = Uuid, Path, description = "Community id")),
    responses((status = 201, description = "Membership created, pending when approval is required"), (status = 409, description = "Already a member or community full", body = crate::openapi::ErrorBody)))]
pub async fn join(
    State(state): State<AppState>,
    user: AuthUser,
    AuditContext(ctx): AuditContext,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<CommunityMembershipResponse>>), ApiError> {
    let membership = communities::join(&state.db, user.id, id).await?;
    record_audit(
        &state,
        AuditEntry::new(user.id, "join", "community_membership", Some(membership.id))
            .new_values(snapshot(&membership))
            .context(ctx),
    )
    .await;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(membership))))
}
