//! Workflow synthesis endpoint

use axum::extract::State;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::services::SynthesisResult;

/// Request to synthesize a workflow from natural language
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SynthesizeRequest {
    #[validate(length(min = 1, max = 128, message = "owner_id must be 1-128 characters"))]
    pub owner_id: String,

    #[validate(length(min = 1, max = 4000, message = "text must be 1-4000 characters"))]
    pub text: String,
}

/// POST /v1/synthesize
///
/// Pipeline failures are part of the contract: they return 200 with
/// `success: false` and a structured error, not an HTTP error status.
pub async fn synthesize(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Json<SynthesisResult>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    info!(owner_id = %request.owner_id, "Synthesis requested");
    let result = state
        .synthesis
        .synthesize(&request.owner_id, &request.text)
        .await?;

    Ok(Json(result))
}
