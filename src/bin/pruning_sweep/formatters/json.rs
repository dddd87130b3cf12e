use anyhow::Result;
use serde_json::json;
use pruning_sweep::{PlannedCell, RunReport, SweepResults};
use crate::formatters::Formatter;
use crate::formatters::formatter::status_label;

/// JSON formatter
pub struct JsonFormatter {
    /// Whether output is indented
    pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        JsonFormatter {
            pretty: true,
        }
    }

    fn render(&self, value: &serde_json::Value) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }

    fn message(&self, key: &str, text: &str) -> String {
        let mut map = serde_json::Map::new();
        map.insert(key.to_string(), json!(text));
        self.render(&serde_json::Value::Object(map)).unwrap_or_else(|_| format!("{{\"{}\":\"{}\"}}", key, text))
    }
}

impl Formatter for JsonFormatter {
    fn format_results(&self, results: &SweepResults) -> Result<String> {
        self.render(&serde_json::to_value(results.rows())?)
    }

    fn format_plan(&self, plan: &[PlannedCell]) -> Result<String> {
        let cells: Vec<serde_json::Value> = plan.iter().map(|planned| {
            json!({
                "every": planned.cell.every,
                "recent": planned.cell.recent,
                "env": planned.env.iter().cloned().collect::<std::collections::BTreeMap<_, _>>(),
                "command": planned.command,
                "sampler": planned.sampler,
            })
        }).collect();
        self.render(&json!(cells))
    }

    fn format_report(&self, report: &RunReport) -> Result<String> {
        let cells: Vec<serde_json::Value> = report.cells.iter().map(|outcome| {
            let (status, reason) = status_label(&outcome.status);
            json!({
                "every": outcome.cell.every,
                "recent": outcome.cell.recent,
                "status": status,
                "reason": reason,
                "exit_code": outcome.exit_code,
                "pid": outcome.pid,
                "elapsed_secs": outcome.elapsed.as_secs_f64(),
            })
        }).collect();

        self.render(&json!({
            "started_at": report.started_at.to_rfc3339(),
            "finished_at": report.finished_at.to_rfc3339(),
            "completed": report.completed(),
            "skipped": report.skipped(),
            "failed": report.failed(),
            "cells": cells,
        }))
    }

    fn format_error(&self, error: &str) -> String {
        self.message("error", error)
    }

    fn format_info(&self, info: &str) -> String {
        self.message("info", info)
    }

    fn format_success(&self, success: &str) -> String {
        self.message("success", success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pruning_sweep::GridCell;

    #[test]
    fn test_results_as_rows() {
        let mut results = SweepResults::new();
        results.insert(GridCell::new(101, 50), 10.0, 99.5, 400.0);

        let text = JsonFormatter { pretty: false }.format_results(&results).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["every"], 101);
        assert_eq!(value[0]["recent"], 50);
        assert_eq!(value[0]["max_cpu"], 99.5);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(JsonFormatter { pretty: false }.format_error("boom"), "{\"error\":\"boom\"}");
    }
}
