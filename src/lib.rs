//! Agent Analytics
//!
//! Records "agent run" events and serves aggregate statistics about them
//! over a JSON HTTP API.
//!
//! # Architecture
//!
//! - **Run Store**: a single `agent_run` table behind the [`persistence::RunStore`] trait
//! - **Aggregation Engine**: pure functions over run slices ([`analytics`])
//! - **API**: Axum router mapping requests to store queries and aggregations
//! - **Bulk Loader**: replace-all CSV import ([`loader`])
//!
//! # Modules
//!
//! - [`analytics`]: duration averaging, grouping, timeline bucketing
//! - [`api`]: HTTP handlers
//! - [`config`]: layered configuration and CLI
//! - [`domain`]: run entity and response shapes
//! - [`persistence`]: SQLite and Postgres run stores

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod analytics;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod persistence;
pub mod server;
pub mod telemetry;

use crate::config::AppConfig;
use persistence::RunStore;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Run store.
    pub store: Arc<dyn RunStore>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
