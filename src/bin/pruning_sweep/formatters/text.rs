use anyhow::Result;
use colored::*;
use pruning_sweep::{PlannedCell, RunReport, SweepResults};
use crate::formatters::Formatter;
use crate::formatters::formatter::status_label;

/// Plain text formatter
pub struct TextFormatter {
    /// Whether colors are enabled
    colored: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        TextFormatter {
            colored: true,
        }
    }

    /// Disable colors
    pub fn without_colors() -> Self {
        TextFormatter {
            colored: false,
        }
    }
}

impl Formatter for TextFormatter {
    fn format_results(&self, results: &SweepResults) -> Result<String> {
        let mut lines = vec!["every,recent,sim_time,max_cpu,max_mem".to_string()];
        for row in results.rows() {
            lines.push(format!("{},{},{},{},{}",
                row.every, row.recent, row.sim_time, row.max_cpu, row.max_mem));
        }
        Ok(lines.join("\n"))
    }

    fn format_plan(&self, plan: &[PlannedCell]) -> Result<String> {
        let mut lines = Vec::new();
        for planned in plan {
            let env = planned.env.iter()
                .filter(|(key, _)| key.starts_with("KEEP_"))
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(format!("{} {}", env, planned.command));
            if let Some(sampler) = &planned.sampler {
                lines.push(format!("    {}", sampler));
            }
        }
        Ok(lines.join("\n"))
    }

    fn format_report(&self, report: &RunReport) -> Result<String> {
        let mut lines = Vec::new();
        for outcome in &report.cells {
            let (label, reason) = status_label(&outcome.status);
            let label = match (self.colored, label) {
                (true, "completed") => label.green().to_string(),
                (true, "skipped") => label.yellow().to_string(),
                (true, _) => label.red().to_string(),
                (false, _) => label.to_string(),
            };
            let mut line = format!("{}: {} in {:.1?}", outcome.cell, label, outcome.elapsed);
            if let Some(code) = outcome.exit_code {
                line.push_str(&format!(" (exit {})", code));
            }
            if let Some(reason) = reason {
                line.push_str(&format!(" - {}", reason));
            }
            lines.push(line);
        }
        lines.push(format!("{} completed, {} skipped, {} failed ({} to {})",
            report.completed(), report.skipped(), report.failed(),
            report.started_at.format("%Y-%m-%d %H:%M:%S"),
            report.finished_at.format("%Y-%m-%d %H:%M:%S")));
        Ok(lines.join("\n"))
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
