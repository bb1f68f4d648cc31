pub mod runs;
pub mod stats;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/runs", get(runs::list_runs).post(runs::create_run))
        .route("/runs/stats", get(stats::kpi_stats))
        .route("/runs/agents", get(stats::agent_run_counts))
        .route("/runs/agents/{agent_id}/stats", get(stats::agent_stats))
        .route("/runs/status", get(stats::status_breakdown))
        .route("/runs/timeline", get(stats::timeline))
        .route("/runs/feedback", get(stats::feedback_summary))
}

/// GET / - Liveness and identity.
async fn root() -> Json<Value> {
    Json(json!({ "message": "Agent Analytics API" }))
}
