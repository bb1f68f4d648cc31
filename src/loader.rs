//! One-shot CSV import that replaces every stored run.
//!
//! The whole file is parsed before the store is touched, and the clear plus
//! inserts run in one transaction. A malformed row therefore aborts the load
//! with the previous contents intact.

use crate::domain::NewAgentRun;
use crate::persistence::RunStore;
use csv::StringRecord;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("line {line}: `{column}` must be an integer, got {value:?}")]
    InvalidInteger {
        line: u64,
        column: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Columns {
    agent_id: usize,
    user_id: usize,
    input_data: usize,
    output_data: usize,
    status: usize,
    created_at: usize,
    completed_at: Option<usize>,
    feedback: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|header| header.trim() == name);
        let require = |name: &'static str| find(name).ok_or(LoadError::MissingColumn(name));

        Ok(Self {
            agent_id: require("agent_id")?,
            user_id: require("user_id")?,
            input_data: require("input_data")?,
            output_data: require("output_data")?,
            status: require("status")?,
            created_at: require("created_at")?,
            completed_at: find("completed_at"),
            feedback: find("feedback"),
        })
    }
}

/// Parse CSV rows into run payloads. Fails on the first malformed row.
pub fn parse_runs<R: Read>(reader: R) -> Result<Vec<NewAgentRun>, LoadError> {
    let mut csv = csv::Reader::from_reader(reader);
    let columns = Columns::resolve(csv.headers()?)?;

    let mut runs = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let field = |index: usize| record.get(index).unwrap_or_default();
        let optional = |index: Option<usize>| {
            index
                .map(field)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let feedback = match optional(columns.feedback) {
            Some(value) => parse_integer(line, "feedback", value)?,
            None => 0,
        };

        runs.push(NewAgentRun {
            agent_id: parse_integer(line, "agent_id", field(columns.agent_id))?,
            user_id: parse_integer(line, "user_id", field(columns.user_id))?,
            input_data: field(columns.input_data).to_string(),
            output_data: field(columns.output_data).to_string(),
            status: field(columns.status).to_string(),
            created_at: field(columns.created_at).to_string(),
            completed_at: optional(columns.completed_at).map(String::from),
            feedback: Some(feedback),
        });
    }
    Ok(runs)
}

fn parse_integer(line: u64, column: &'static str, value: &str) -> Result<i64, LoadError> {
    value
        .trim()
        .parse()
        .map_err(|source| LoadError::InvalidInteger {
            line,
            column,
            value: value.to_string(),
            source,
        })
}

/// Replace the store's contents with the runs in `path`. Returns the number
/// of rows loaded.
pub async fn seed_from_csv(store: &dyn RunStore, path: &Path) -> Result<u64, LoadError> {
    info!(name: "loader.started", path = %path.display(), "Loading runs from CSV");

    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let runs = parse_runs(bytes.as_slice())?;
    let loaded = store.replace_all(&runs).await?;

    info!(name: "loader.completed", rows = loaded, path = %path.display(), "Loaded runs from CSV");
    Ok(loaded)
}
