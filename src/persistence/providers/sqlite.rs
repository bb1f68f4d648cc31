use crate::domain::{AgentRun, NewAgentRun, RunFilter};
use crate::persistence::{RunStore, SELECT_COLUMNS};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS agent_run (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        agent_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        input_data TEXT NOT NULL,
        output_data TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        completed_at TEXT,
        feedback INTEGER DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_agent_run_agent_id ON agent_run (agent_id)",
    "CREATE INDEX IF NOT EXISTS ix_agent_run_user_id ON agent_run (user_id)",
    "CREATE INDEX IF NOT EXISTS ix_agent_run_status ON agent_run (status)",
];

const INSERT_RUN: &str = r#"
    INSERT INTO agent_run
        (agent_id, user_id, input_data, output_data, status, created_at, completed_at, feedback)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

#[derive(Debug, Clone)]
pub struct SqliteRunStore {
    pool: SqlitePool,
}

impl SqliteRunStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Private in-memory database. A single long-lived connection keeps the
    /// database alive for the lifetime of the pool.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RunStore for SqliteRunStore {
    async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn insert_run(&self, run: &NewAgentRun) -> Result<AgentRun> {
        let id = sqlx::query(INSERT_RUN)
            .bind(run.agent_id)
            .bind(run.user_id)
            .bind(&run.input_data)
            .bind(&run.output_data)
            .bind(&run.status)
            .bind(&run.created_at)
            .bind(&run.completed_at)
            .bind(run.feedback)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(run.clone().with_id(id))
    }

    async fn list_runs(&self, filter: &RunFilter, skip: u32, limit: u32) -> Result<Vec<AgentRun>> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        query.push(" WHERE 1 = 1");
        if let Some(agent_id) = filter.agent_id {
            query.push(" AND agent_id = ").push_bind(agent_id);
        }
        if let Some(status) = &filter.status {
            query.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(feedback) = filter.feedback {
            query.push(" AND feedback = ").push_bind(feedback);
        }
        query
            .push(" ORDER BY id LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(i64::from(skip));

        let runs = query
            .build_query_as::<AgentRun>()
            .fetch_all(&self.pool)
            .await?;
        Ok(runs)
    }

    async fn all_runs(&self) -> Result<Vec<AgentRun>> {
        let runs = sqlx::query_as::<_, AgentRun>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(runs)
    }

    async fn runs_for_agent(&self, agent_id: i64) -> Result<Vec<AgentRun>> {
        let runs = sqlx::query_as::<_, AgentRun>(&format!(
            "{SELECT_COLUMNS} WHERE agent_id = ? ORDER BY id"
        ))
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(runs)
    }

    async fn replace_all(&self, runs: &[NewAgentRun]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM agent_run").execute(&mut *tx).await?;

        let mut inserted = 0;
        for run in runs {
            sqlx::query(INSERT_RUN)
                .bind(run.agent_id)
                .bind(run.user_id)
                .bind(&run.input_data)
                .bind(&run.output_data)
                .bind(&run.status)
                .bind(&run.created_at)
                .bind(&run.completed_at)
                .bind(run.feedback)
                .execute(&mut *tx)
                .await?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
