use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::analytics::canonicalize;
use crate::domain::{AgentRun, NewAgentRun, RunFilter};
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct ListRunsQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub agent_id: Option<i64>,
    pub status: Option<String>,
    pub feedback: Option<i64>,
}

fn default_limit() -> u32 {
    1000
}

/// GET /runs - List runs with offset/limit and optional equality filters.
pub async fn list_runs(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListRunsQuery>, QueryRejection>,
) -> Result<Json<Vec<AgentRun>>> {
    let Query(query) = query?;
    let filter = RunFilter {
        agent_id: query.agent_id,
        status: query.status,
        feedback: query.feedback,
    };

    let runs = state
        .store
        .list_runs(&filter, query.skip, query.limit)
        .await?;
    Ok(Json(runs))
}

/// POST /runs - Insert one fully-formed run.
pub async fn create_run(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewAgentRun>, JsonRejection>,
) -> Result<Json<AgentRun>> {
    let Json(payload) = payload?;
    let payload = normalize_timestamps(payload)?;

    let run = state.store.insert_run(&payload).await?;
    info!(
        name: "runs.created",
        run_id = run.id,
        agent_id = run.agent_id,
        status = %run.status,
        "Run created"
    );
    Ok(Json(run))
}

/// Parse timestamps at the write boundary and store them in RFC 3339 form.
/// A blank `completed_at` is treated as absent.
fn normalize_timestamps(mut run: NewAgentRun) -> Result<NewAgentRun> {
    run.created_at =
        canonicalize(&run.created_at).ok_or_else(|| AppError::InvalidTimestamp {
            field: "created_at",
            value: run.created_at.clone(),
        })?;

    run.completed_at = match run.completed_at.take() {
        Some(raw) if raw.trim().is_empty() => None,
        Some(raw) => Some(canonicalize(&raw).ok_or(AppError::InvalidTimestamp {
            field: "completed_at",
            value: raw,
        })?),
        None => None,
    };

    Ok(run)
}
