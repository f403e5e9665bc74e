use axum::extract::State;
use axum::Json;
use contracts::audit::{AuditLogFilters, AuditLogResponse};
use contracts::pagination::DEFAULT_PAGE_LIMIT;
use contracts::{PaginatedResponse, PaginationQuery};
use service::audit;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::extract::ValidQuery;
use crate::state::AppState;

/// The caller's own audit trail.
#[utoipa::path(get, path = "/api/audit-logs", tag = "audit",
    responses((status = 200, description = "Paginated audit entries, newest first")))]
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    ValidQuery(page): ValidQuery<PaginationQuery>,
    ValidQuery(filters): ValidQuery<AuditLogFilters>,
) -> Result<Json<PaginatedResponse<AuditLogResponse>>, ApiError> {
    let page = page.resolve(DEFAULT_PAGE_LIMIT, &["createdAt"])?;
    Ok(Json(audit::list_for_user(&state.db, user.id, &filters, &page).await?))
}
