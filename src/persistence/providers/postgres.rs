use crate::domain::{AgentRun, NewAgentRun, RunFilter};
use crate::persistence::{RunStore, SELECT_COLUMNS};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS agent_run (
        id BIGSERIAL PRIMARY KEY,
        agent_id BIGINT NOT NULL,
        user_id BIGINT NOT NULL,
        input_data TEXT NOT NULL,
        output_data TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        completed_at TEXT,
        feedback BIGINT DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_agent_run_agent_id ON agent_run (agent_id)",
    "CREATE INDEX IF NOT EXISTS ix_agent_run_user_id ON agent_run (user_id)",
    "CREATE INDEX IF NOT EXISTS ix_agent_run_status ON agent_run (status)",
];

const INSERT_RUN: &str = r#"
    INSERT INTO agent_run
        (agent_id, user_id, input_data, output_data, status, created_at, completed_at, feedback)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    RETURNING id
"#;

#[derive(Debug, Clone)]
pub struct PostgresRunStore {
    pool: PgPool,
}

impl PostgresRunStore {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(connection_string)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RunStore for PostgresRunStore {
    async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn insert_run(&self, run: &NewAgentRun) -> Result<AgentRun> {
        let id: i64 = sqlx::query_scalar(INSERT_RUN)
            .bind(run.agent_id)
            .bind(run.user_id)
            .bind(&run.input_data)
            .bind(&run.output_data)
            .bind(&run.status)
            .bind(&run.created_at)
            .bind(&run.completed_at)
            .bind(run.feedback)
            .fetch_one(&self.pool)
            .await?;

        Ok(run.clone().with_id(id))
    }

    async fn list_runs(&self, filter: &RunFilter, skip: u32, limit: u32) -> Result<Vec<AgentRun>> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_COLUMNS);
        query.push(" WHERE TRUE");
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
            "{SELECT_COLUMNS} WHERE agent_id = $1 ORDER BY id"
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
            let _id: i64 = sqlx::query_scalar(INSERT_RUN)
                .bind(run.agent_id)
                .bind(run.user_id)
                .bind(&run.input_data)
                .bind(&run.output_data)
                .bind(&run.status)
                .bind(&run.created_at)
                .bind(&run.completed_at)
                .bind(run.feedback)
                .fetch_one(&mut *tx)
                .await?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
