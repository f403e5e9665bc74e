use std::time::Duration;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use common::perf::PerformanceStats;
use contracts::metrics::PerformanceQuery;
use contracts::{ApiResponse, Validate};

use crate::errors::ApiError;
use crate::extract::ValidQuery;
use crate::state::AppState;

#[utoipa::path(get, path = "/api/metrics/performance", tag = "metrics",
    params(("windowMinutes" = Option<u64>, Query, description = "Only count requests from the last N minutes")),
    responses((status = 200, description = "Aggregated request statistics")))]
pub async fn performance(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<PerformanceQuery>,
) -> Result<Json<ApiResponse<PerformanceStats>>, ApiError> {
    query.validate()?;
    let window = query.window_minutes.map(|m| Duration::from_secs(m * 60));
    Ok(Json(ApiResponse::ok(state.monitor.stats(window))))
}

#[utoipa::path(get, path = "/api/metrics/performance/report", tag = "metrics",
    responses((status = 200, description = "Plain text summary", body = String, content_type = "text/plain")))]
pub async fn report(State(state): State<AppState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], state.monitor.report())
}
