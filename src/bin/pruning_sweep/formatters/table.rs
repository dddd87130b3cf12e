use anyhow::Result;
use colored::*;
use prettytable::{Table, Row, Cell};
use pruning_sweep::{PlannedCell, RunReport, SweepResults};
use crate::formatters::Formatter;
use crate::formatters::formatter::status_label;

/// Table formatter
pub struct TableFormatter {
    /// Whether colors are enabled
    colored: bool,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        TableFormatter {
            colored: true,
        }
    }

    /// Disable colors
    pub fn without_colors() -> Self {
        TableFormatter {
            colored: false,
        }
    }
}

fn header(names: &[&str]) -> Row {
    Row::new(names.iter().map(|name| Cell::new(name)).collect())
}

impl Formatter for TableFormatter {
    fn format_results(&self, results: &SweepResults) -> Result<String> {
        let mut table = Table::new();
        table.set_titles(header(&["every", "recent", "sim_time (s)", "max_cpu (%)", "max_mem (MB)"]));

        for row in results.rows() {
            table.add_row(Row::new(vec![
                Cell::new(&row.every.to_string()),
                Cell::new(&row.recent.to_string()),
                Cell::new(&format!("{:.3}", row.sim_time)),
                Cell::new(&format!("{:.1}", row.max_cpu)),
                Cell::new(&format!("{:.1}", row.max_mem)),
            ]));
        }

        Ok(table.to_string())
    }

    fn format_plan(&self, plan: &[PlannedCell]) -> Result<String> {
        let mut table = Table::new();
        table.set_titles(header(&["every", "recent", "command", "sampler"]));

        for planned in plan {
            table.add_row(Row::new(vec![
                Cell::new(&planned.cell.every.to_string()),
                Cell::new(&planned.cell.recent.to_string()),
                Cell::new(&planned.command),
                Cell::new(planned.sampler.as_deref().unwrap_or("-")),
            ]));
        }

        Ok(table.to_string())
    }

    fn format_report(&self, report: &RunReport) -> Result<String> {
        let mut table = Table::new();
        table.set_titles(header(&["every", "recent", "status", "exit", "pid", "elapsed", "reason"]));

        for outcome in &report.cells {
            let (label, reason) = status_label(&outcome.status);
            let label = match (self.colored, label) {
                (true, "completed") => label.green().to_string(),
                (true, "skipped") => label.yellow().to_string(),
                (true, _) => label.red().to_string(),
                (false, _) => label.to_string(),
            };
            table.add_row(Row::new(vec![
                Cell::new(&outcome.cell.every.to_string()),
                Cell::new(&outcome.cell.recent.to_string()),
                Cell::new(&label),
                Cell::new(&outcome.exit_code.map_or("-".to_string(), |c| c.to_string())),
                Cell::new(&outcome.pid.map_or("-".to_string(), |p| p.to_string())),
                Cell::new(&format!("{:.1?}", outcome.elapsed)),
                Cell::new(reason.unwrap_or("")),
            ]));
        }

        Ok(table.to_string())
    }

    fn format_error(&self, error: &str) -> String {
        if self.colored {
            format!("{}", error.red().bold())
        } else {
            format!("Error: {}", error)
        }
    }

    fn format_info(&self, info: &str) -> String {
        if self.colored {
            format!("{}", info.blue())
        } else {
            format!("Info: {}", info)
        }
    }

    fn format_success(&self, success: &str) -> String {
        if self.colored {
            format!("{}", success.green().bold())
        } else {
            format!("Success: {}", success)
        }
    }
}
