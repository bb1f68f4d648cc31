use crate::config::PersistenceConfig;
use crate::domain::{AgentRun, NewAgentRun, RunFilter};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod providers;

use providers::{postgres::PostgresRunStore, sqlite::SqliteRunStore};

#[async_trait]
pub trait RunStore: Send + Sync + std::fmt::Debug {
    /// Create the `agent_run` table and its indexes if they do not exist.
    async fn ensure_schema(&self) -> Result<()>;

    /// Append one run and return it with its generated id.
    async fn insert_run(&self, run: &NewAgentRun) -> Result<AgentRun>;

    /// List runs ordered by id, applying the equality filters and offset/limit.
    async fn list_runs(&self, filter: &RunFilter, skip: u32, limit: u32) -> Result<Vec<AgentRun>>;

    /// Full scan.
    async fn all_runs(&self) -> Result<Vec<AgentRun>>;

    async fn runs_for_agent(&self, agent_id: i64) -> Result<Vec<AgentRun>>;

    /// Clear the table and insert `runs` in a single transaction.
    ///
    /// Readers never observe the cleared table: on any failure the
    /// transaction rolls back and the previous contents remain.
    async fn replace_all(&self, runs: &[NewAgentRun]) -> Result<u64>;
}

/// Open the store selected by `persistence.provider`.
pub async fn connect(config: &PersistenceConfig) -> Result<Arc<dyn RunStore>> {
    let store: Arc<dyn RunStore> = match config.provider.as_str() {
        "postgres" => Arc::new(
            PostgresRunStore::new(&config.database_url, config.max_connections).await?,
        ),
        "sqlite" => Arc::new(
            SqliteRunStore::new(&config.database_url, config.max_connections).await?,
        ),
        other => anyhow::bail!("unknown persistence provider `{other}`"),
    };
    Ok(store)
}

pub(crate) const SELECT_COLUMNS: &str = "SELECT id, agent_id, user_id, input_data, output_data, \
     status, created_at, completed_at, feedback FROM agent_run";
