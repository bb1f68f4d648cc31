//! Agent Analytics Server
//!
//! Entry point: `serve` (default) runs the HTTP API, `seed` bulk-loads a CSV.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use agent_analytics::config::{AppConfig, Cli, Command};
use agent_analytics::{loader, persistence, server, telemetry};
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before clap reads env-backed flags
    let _ = dotenv();

    telemetry::init();

    let cli = Cli::parse();
    let config = Arc::new(AppConfig::from_cli(&cli)?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::start_server(config).await,
        Command::Seed { csv } => {
            let store = persistence::connect(&config.persistence).await?;
            let loaded = loader::seed_from_csv(store.as_ref(), &csv).await?;
            info!(name: "seed.finished", rows = loaded, "Seed complete");
            Ok(())
        }
    }
}
