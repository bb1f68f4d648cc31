use agent_analytics::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;

const BIN: &str = "agent-analytics";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("ANALYTICS_SERVER__PORT");
        env::remove_var("ANALYTICS_PERSISTENCE__PROVIDER");
        env::remove_var("ANALYTICS_PERSISTENCE__DATABASE_URL");
        env::remove_var("ANALYTICS_RESILIENCE__TIMEOUT_DISABLED");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("DATABASE_URL");
        env::remove_var("TIMEOUT_DISABLED");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([BIN]).expect("defaults should load");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.persistence.provider, "sqlite");
    assert_eq!(config.persistence.database_url, "sqlite://agent_runs.db");
    assert!(!config.resilience.timeout_disabled);
    assert_eq!(config.resilience.request_timeout_secs, 30);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("ANALYTICS_SERVER__PORT", "9090");
        env::set_var("ANALYTICS_RESILIENCE__TIMEOUT_DISABLED", "true");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert!(config.resilience.timeout_disabled);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_flags_beat_env() {
    clear_env_vars();
    unsafe {
        env::set_var("ANALYTICS_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args([
        BIN,
        "--port",
        "7171",
        "--database-url",
        "postgres://analytics@localhost/runs",
    ])
    .expect("Failed to load config");

    assert_eq!(config.server.port, 7171);
    assert_eq!(config.persistence.provider, "postgres");
    assert_eq!(
        config.persistence.database_url,
        "postgres://analytics@localhost/runs"
    );

    clear_env_vars();
}

#[test]
#[serial]
fn test_env_database_url_selects_provider() {
    clear_env_vars();
    unsafe {
        env::set_var(
            "ANALYTICS_PERSISTENCE__DATABASE_URL",
            "postgres://analytics@localhost/runs",
        );
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.persistence.provider, "postgres");
    assert_eq!(
        config.persistence.database_url,
        "postgres://analytics@localhost/runs"
    );

    clear_env_vars();
}

#[test]
#[serial]
fn test_sqlite_url_overrides_file_provider() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = dir.path().join("analytics.yaml");
    fs::write(
        &file_path,
        r#"
persistence:
  provider: postgres
  database_url: "postgres://analytics@localhost/runs"
    "#,
    )
    .expect("Failed to write temp config");

    let config = AppConfig::load_from_args([
        BIN,
        "--config",
        file_path.to_str().expect("temp path is utf-8"),
        "--database-url",
        "sqlite://local.db",
    ])
    .expect("Failed to load config");

    assert_eq!(config.persistence.provider, "sqlite");
    assert_eq!(config.persistence.database_url, "sqlite://local.db");
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = dir.path().join("analytics.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
persistence:
  database_url: "sqlite://from_file.db"
    "#,
    )
    .expect("Failed to write temp config");

    // Tell AppConfig to use this file via Env Var
    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.persistence.database_url, "sqlite://from_file.db");
    // Untouched keys keep their defaults
    assert_eq!(config.persistence.provider, "sqlite");

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args([BIN, "--config", "/nonexistent/analytics.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_unknown_flag_is_an_error() {
    clear_env_vars();

    assert!(AppConfig::load_from_args([BIN, "--no-such-flag"]).is_err());
}
