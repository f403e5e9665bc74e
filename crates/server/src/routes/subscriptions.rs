use axum::extract::State;
use axum::Json;
use contracts::subscriptions::{PlanResponse, UserSubscriptionResponse};
use contracts::ApiResponse;
use service::subscriptions;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::state::AppState;

#[utoipa::path(get, path = "/api/subscriptions/plans", tag = "subscriptions",
    responses((status = 200, description = "Active plans by sort order")))]
pub async fn plans(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<PlanResponse>>>, ApiError> {
    Ok(Json(ApiResponse::ok(subscriptions::list_plans(&state.db).await?)))
}

#[utoipa::path(get, path = "/api/subscriptions/me", tag = "subscriptions",
    responses((status = 200, description = "The caller's subscriptions, newest first")))]
pub async fn mine(State(state): State<AppState>, user: AuthUser) -> Result<Json<ApiResponse<Vec<UserSubscriptionResponse>>>, ApiError> {
    Ok(Json(ApiResponse::ok(subscriptions::list_for_user(&state.db, user.id).await?)))
}
