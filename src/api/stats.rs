//! Aggregate statistics endpoints. Each handler loads the runs it needs and
//! hands them to the pure functions in [`crate::analytics`].

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::AppState;
use crate::analytics;
use crate::domain::{AgentRunCount, AgentStats, FeedbackStats, KpiStats, StatusCount, TimelineEntry};
use crate::error::Result;

/// GET /runs/stats - Overall KPI summary.
pub async fn kpi_stats(State(state): State<AppState>) -> Result<Json<KpiStats>> {
    let runs = state.store.all_runs().await?;
    Ok(Json(analytics::kpi_summary(&runs)))
}

/// GET /runs/agents - Run count per agent.
pub async fn agent_run_counts(State(state): State<AppState>) -> Result<Json<Vec<AgentRunCount>>> {
    let runs = state.store.all_runs().await?;
    Ok(Json(analytics::agent_run_counts(&runs)))
}

/// GET /runs/agents/{agent_id}/stats - Detail for one agent. Unknown agents
/// get zero-filled stats rather than 404.
pub async fn agent_stats(
    State(state): State<AppState>,
    agent_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<AgentStats>> {
    let Path(agent_id) = agent_id?;
    let runs = state.store.runs_for_agent(agent_id).await?;
    Ok(Json(analytics::agent_summary(agent_id, &runs)))
}

pub async fn status_breakdown(State(state): State<AppState>) -> Result<Json<Vec<StatusCount>>> {
    let runs = state.store.all_runs().await?;
    Ok(Json(analytics::status_breakdown(&runs)))
}

pub async fn timeline(State(state): State<AppState>) -> Result<Json<Vec<TimelineEntry>>> {
    let runs = state.store.all_runs().await?;
    Ok(Json(analytics::timeline(&runs)))
}

pub async fn feedback_summary(State(state): State<AppState>) -> Result<Json<FeedbackStats>> {
    let runs = state.store.all_runs().await?;
    Ok(Json(analytics::feedback_summary(&runs)))
}
