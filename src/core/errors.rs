//! Error types for the sweep harness
//!
//! This module defines the errors that can occur while building the grid,
//! driving external processes, and parsing their output files.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a sweep
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Malformed file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("File not found: {0}")]
    MissingFile(PathBuf),

    #[error("No running process matches '{0}'")]
    ProcessNotFound(String),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl SweepError {
    /// Build a `Malformed` error for the given file
    pub fn malformed<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        SweepError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;
