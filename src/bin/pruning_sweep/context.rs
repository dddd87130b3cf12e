// src/bin/pruning_sweep/context.rs
use tokio::runtime::Runtime;
use crate::formatters::{OutputFormat, Formatter};
use crate::formatters::text::TextFormatter;
use crate::formatters::json::JsonFormatter;
use crate::formatters::table::TableFormatter;
use anyhow::{Result, anyhow};

/// CLI execution context
pub struct Context {
    /// Verbosity level
    verbosity: u8,

    /// Current formatter
    formatter: Box<dyn Formatter>,

    /// Tokio runtime for the sweep
    runtime: Runtime,
}

impl Context {
    /// Create a new context
    pub fn new(verbosity: u8, format: OutputFormat, colored: bool) -> Result<Self> {
        let formatter: Box<dyn Formatter> = match (format, colored) {
            (OutputFormat::Text, true) => Box::new(TextFormatter::new()),
            (OutputFormat::Text, false) => Box::new(TextFormatter::without_colors()),
            (OutputFormat::Json, _) => Box::new(JsonFormatter::new()),
            (OutputFormat::Table, true) => Box::new(TableFormatter::new()),
            (OutputFormat::Table, false) => Box::new(TableFormatter::without_colors()),
        };

        // Build records run in background tasks on this runtime
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| anyhow!("Failed to create Tokio runtime: {}", e))?;

        Ok(Context {
            verbosity,
            formatter,
            runtime,
        })
    }

    /// Get the current formatter
    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    /// Get the verbosity level
    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    /// Get the Tokio runtime
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}
