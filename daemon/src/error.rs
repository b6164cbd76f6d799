//! Error types for eqtail.

use std::path::PathBuf;

use thiserror::Error;

/// eqtail error type.
///
/// Only the I/O failures that stop a tail (`Open`, `Read`) ever leave the
/// watcher. Unmatched lines and bad timestamps are absorbed where they occur.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot open log {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read failed on {} at byte {offset}: {source}", path.display())]
    Read {
        path: PathBuf,
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Tailer task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Home directory not found")]
    NoHomeDir,

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Alert '{name}' has an invalid pattern: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("No log file given. Pass --path, or --player/--server/--base-path.")]
    MissingLogPath,
}
