use anyhow::Result;
use pruning_sweep::{CellStatus, PlannedCell, RunReport, SweepResults};

/// Trait implemented by output formatters
pub trait Formatter {
    /// Format a sweep summary
    fn format_results(&self, results: &SweepResults) -> Result<String>;

    /// Format the cells a dry run would execute
    fn format_plan(&self, plan: &[PlannedCell]) -> Result<String>;

    /// Format the outcome of a sweep
    fn format_report(&self, report: &RunReport) -> Result<String>;

    /// Format an error message
    fn format_error(&self, error: &str) -> String;

    /// Format an informational message
    fn format_info(&self, info: &str) -> String;

    /// Format a success message
    fn format_success(&self, success: &str) -> String;
}

/// Short label for a cell status
pub fn status_label(status: &CellStatus) -> (&'static str, Option<&str>) {
    match status {
        CellStatus::Completed => ("completed", None),
        CellStatus::Skipped(reason) => ("skipped", Some(reason.as_str())),
        CellStatus::Failed(reason) => ("failed", Some(reason.as_str())),
    }
}
