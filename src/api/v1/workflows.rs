//! Workflow listing endpoint

use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{WorkflowRecord, WorkflowStatus};

#[derive(Debug, Deserialize)]
pub struct WorkflowsQuery {
    pub owner_id: String,
}

/// Workflow record summary returned to callers
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSummary {
    pub id: Uuid,
    pub platform_id: String,
    pub name: String,
    pub description: String,
    pub status: WorkflowStatus,
    pub execution_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&WorkflowRecord> for WorkflowSummary {
    fn from(record: &WorkflowRecord) -> Self {
        Self {
            id: record.id(),
            platform_id: record.platform_id().to_string(),
            name: record.name().to_string(),
            description: record.description().to_string(),
            status: record.status(),
            execution_count: record.execution_count(),
            created_at: record.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WorkflowsResponse {
    pub workflows: Vec<WorkflowSummary>,
}

/// GET /v1/workflows?owner_id=
pub async fn list_workflows(
    State(state): State<AppState>,
    Query(query): Query<WorkflowsQuery>,
) -> Result<Json<WorkflowsResponse>, ApiError> {
    if query.owner_id.trim().is_empty() {
        return Err(ApiError::bad_request("owner_id must not be empty"));
    }

    let records = state.synthesis.list_workflows(&query.owner_id).await?;
    let workflows = records.iter().map(WorkflowSummary::from).collect();

    Ok(Json(WorkflowsResponse { workflows }))
}
