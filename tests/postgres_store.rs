//! Postgres run store tests.
//!
//! Requires: DATABASE_URL environment variable pointing to a scratch Postgres
//! database. The `agent_run` table in that database is cleared by these tests.

use agent_analytics::domain::{NewAgentRun, RunFilter};
use agent_analytics::persistence::{RunStore, providers::postgres::PostgresRunStore};
use serial_test::serial;

/// Create the store, or skip the test if DATABASE_URL is not a Postgres URL.
async fn setup_store() -> Option<PostgresRunStore> {
    let url = std::env::var("DATABASE_URL").ok()?;
    if !url.starts_with("postgres") {
        return None;
    }
    PostgresRunStore::new(&url, 2).await.ok()
}

fn new_run(agent_id: i64, status: &str, feedback: Option<i64>) -> NewAgentRun {
    NewAgentRun {
        agent_id,
        user_id: 1,
        input_data: "in".into(),
        output_data: "out".into(),
        status: status.into(),
        created_at: "2024-01-01T00:00:00+00:00".into(),
        completed_at: Some("2024-01-01T00:00:45+00:00".into()),
        feedback,
    }
}

#[tokio::test]
#[serial]
async fn test_replace_insert_and_filter() {
    let Some(store) = setup_store().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let loaded = store
        .replace_all(&[new_run(1, "completed", Some(1)), new_run(2, "failed", None)])
        .await
        .expect("Failed to replace runs");
    assert_eq!(loaded, 2);

    let created = store
        .insert_run(&new_run(1, "failed", Some(-1)))
        .await
        .expect("Failed to insert run");

    let all = store.all_runs().await.expect("Failed to scan runs");
    assert_eq!(all.len(), 3);
    assert_eq!(all.last(), Some(&created));

    let agent_one = store.runs_for_agent(1).await.expect("Failed to filter runs");
    assert_eq!(agent_one.len(), 2);

    let filter = RunFilter {
        status: Some("failed".into()),
        ..RunFilter::default()
    };
    let failed = store
        .list_runs(&filter, 0, 10)
        .await
        .expect("Failed to list runs");
    assert_eq!(failed.len(), 2);

    let page = store
        .list_runs(&RunFilter::default(), 2, 10)
        .await
        .expect("Failed to page runs");
    assert_eq!(page, vec![created]);
}

#[tokio::test]
#[serial]
async fn test_ids_are_not_reused_after_reload() {
    let Some(store) = setup_store().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    store
        .replace_all(&[new_run(1, "completed", None)])
        .await
        .expect("Failed to replace runs");
    let before = store.all_runs().await.expect("Failed to scan runs");

    store
        .replace_all(&[new_run(1, "completed", None)])
        .await
        .expect("Failed to replace runs");
    let after = store.all_runs().await.expect("Failed to scan runs");

    assert_eq!(after.len(), 1);
    assert!(after[0].id > before[0].id);
}
