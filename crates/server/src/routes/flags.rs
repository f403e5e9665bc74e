use axum::extract::State;
use axum::Json;
use contracts::flags::FlagEvaluation;
use contracts::ApiResponse;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::extract::ValidPath;
use crate::state::AppState;

#[utoipa::path(get, path = "/api/feature-flags/{key}", tag = "feature-flags",
    params(("key" = String, Path, description = "Flag key")),
    responses((status = 200, description = "Evaluation for the caller")))]
pub async fn evaluate(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(key): ValidPath<String>,
) -> Result<Json<ApiResponse<FlagEvaluation>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.flags.evaluate(&key, user.id).await?)))
}
