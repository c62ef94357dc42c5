//! v1 API endpoints

pub mod stats;
pub mod synthesize;
pub mod workflows;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/synthesize", post(synthesize::synthesize))
        .route("/workflows", get(workflows::list_workflows))
        .route("/stats", get(stats::stats))
}
