//! Aggregate statistics endpoint

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::services::StatsReport;

/// GET /v1/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsReport>, ApiError> {
    let report = state.synthesis.stats().await?;
    Ok(Json(report))
}
