use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use contracts::organizations::{
    CreateOrganizationRequest, InviteMemberRequest, MemberFilters, MembershipResponse, OrganizationFilters,
    OrganizationResponse, UpdateOrganizationRequest, ORGANIZATION_SORTS,
};
use contracts::pagination::DEFAULT_PAGE_LIMIT;
use contracts::{ApiResponse, PaginatedResponse, PaginationQuery};
use models::enums::RiskLevel;
use service::audit::AuditEntry;
use service::organizations;
use uuid::Uuid;

use super::{record_audit, snapshot};
use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::extract::{AuditContext, ValidJson, ValidPath, ValidQuery};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/organizations", tag = "organizations",
    responses((status = 200, description = "Paginated organizations with member counts")))]
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(page): ValidQuery<PaginationQuery>,
    ValidQuery(filters): ValidQuery<OrganizationFilters>,
) -> Result<Json<PaginatedResponse<OrganizationResponse>>, ApiError> {
    let page = page.resolve(DEFAULT_PAGE_LIMIT, ORGANIZATION_SORTS)?;
    Ok(Json(organizations::list(&state.db, &filters, &page).await?))
}

#[utoipa::path(post, path = "/api/organizations", tag = "organizations",
    responses((status = 201, description = "Organization created, caller is owner"), (status = 409, description = "Slug taken", body = crate::openapi::ErrorBody)))]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AuditContext(ctx): AuditContext,
    ValidJson(req): ValidJson<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrganizationResponse>>), ApiError> {
    let created = organizations::create(&state.db, user.id, req).await?;
    record_audit(
        &state,
        AuditEntry::new(user.id, "create", "organization", Some(created.id))
            .new_values(snapshot(&created))
            .context(ctx),
    )
    .await;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

#[utoipa::path(get, path = "/api/organizations/{id}", tag = "organizations",
    params(("id" = Uuid, Path, description = "Organization id")),
    responses((status = 200, description = "Organization"), (status = 404, description = "Not found", body = crate::openapi::ErrorBody)))]
pub async fn get(State(state): State<AppState>, ValidPath(id): ValidPath<Uuid>) -> Result<Json<ApiResponse<OrganizationResponse>>, ApiError> {
    Ok(Json(ApiResponse::ok(organizations::get(&state.db, id).await?)))
}

#[utoipa::path(patch, path = "/api/organizations/{id}", tag = "organizations",
    params(("id" = Uuid, Path, description = "Organization id")),
    responses((status = 200, description = "Updated organization"), (status = 403, description = "Not an owner or admin", body = crate::openapi::ErrorBody)))]
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    AuditContext(ctx): AuditContext,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<UpdateOrganizationRequest>,
) -> Result<Json<ApiResponse<OrganizationResponse>>, ApiError> {
    let updated = organizations::update(&state.db, user.id, id, req).await?;
    record_audit(
        &state,
        AuditEntry::new(user.id, "update", "organization", Some(id))
            .risk(RiskLevel::Medium)
            .new_values(snapshot(&updated))
            .context(ctx),
    )
    .await;
    Ok(Json(ApiResponse::ok(updated)))
}

#[utoipa::path(get, path = "/api/organizations/{id}/members", tag = "organizations",
    params(("id" = Uuid, Path, description = "Organization id")),
    responses((status = 200, description = "Paginated memberships"), (status = 403, description = "Not a member", body = crate::openapi::ErrorBody)))]
pub async fn list_members(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidQuery(page): ValidQuery<PaginationQuery>,
    ValidQuery(filters): ValidQuery<MemberFilters>,
) -> Result<Json<PaginatedResponse<MembershipResponse>>, ApiError> {
    let page = page.resolve(DEFAULT_PAGE_LIMIT, &["joinedAt"])?;
    Ok(Json(organizations::list_members(&state.db, user.id, id, &filters, &page).await?))
}

#[utoipa::path(post, path = "/api/organizations/{id}/members", tag = "organizations",
    params(("id" = Uuid, Path, description = "Organization id")),
    responses((status = 201, description = "Invitation created"), (status = 404, description = "No user with that email", body = crate::openapi::ErrorBody), (status = 409, description = "Already a member", body = crate::openapi::ErrorBody)))]
pub async fn invite_member(
    State(state): State<AppState>,
    user: AuthUser,
    AuditContext(ctx): AuditContext,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<InviteMemberRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MembershipResponse>>), ApiError> {
    let membership = organizations::invite_member(&state.db, user.id, id, req).await?;
    record_audit(
        &state,
        AuditEntry::new(user.id, "invite", "organization_membership", Some(membership.id))
            .risk(RiskLevel::Medium)
            .new_values(snapshot(&membership))
            .context(ctx),
    )
    .await;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(membership))))
}
