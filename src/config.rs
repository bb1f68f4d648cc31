use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE", global = true)]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,

    /// Database URL (`sqlite://...` or `postgres://...`)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED", global = true)]
    pub timeout_disabled: Option<bool>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Replace every stored run with the contents of a CSV file
    Seed {
        #[arg(long, default_value = "my_data.csv")]
        csv: PathBuf,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub persistence: PersistenceConfig,
    pub resilience: ResilienceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PersistenceConfig {
    /// `sqlite` or `postgres`
    pub provider: String,
    pub database_url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub timeout_disabled: bool,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Priority: CLI flag > CLI env var > `ANALYTICS_*` env > config file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("persistence.provider", "sqlite")?
            .set_default("persistence.database_url", "sqlite://agent_runs.db")?
            .set_default("persistence.max_connections", 5)?
            .set_default("resilience.timeout_disabled", false)?
            .set_default("resilience.request_timeout_secs", 30)?;

        // Explicit file must exist; ./config.{yaml,toml,json} is picked up if present.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // E.g. ANALYTICS_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("ANALYTICS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = &cli.database_url {
            builder = builder.set_override("persistence.database_url", url.as_str())?;
        }
        if let Some(disabled) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", disabled)?;
        }

        let mut config: Self = builder.build()?.try_deserialize()?;
        // The final URL decides the provider, whichever layer supplied it.
        if let Some(provider) = provider_for_url(&config.persistence.database_url) {
            config.persistence.provider = provider.to_string();
        }
        Ok(config)
    }
}

/// Provider implied by a database URL scheme, if recognised.
fn provider_for_url(url: &str) -> Option<&'static str> {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Some("postgres")
    } else if url.starts_with("sqlite:") {
        Some("sqlite")
    } else {
        None
    }
}
