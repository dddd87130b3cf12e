// src/parse/results.rs
//! Parser for build result files
//!
//! The build appends its output to `<cell>.results`. The last line is the
//! test summary, for example `ok  \tgithub.com/org/app/simapp\t1234.567s`,
//! whose third tab-separated field is the elapsed simulation time.

use std::fs;
use std::path::Path;

use crate::core::errors::{Result, SweepError};

/// Index of the elapsed-time field in the summary line
const ELAPSED_FIELD: usize = 2;

/// Status reported by a passing run
const PASS_STATUS: &str = "ok";

/// Extract the elapsed simulation time, in seconds, from a results file's contents
pub fn parse_sim_time(contents: &str, path: &Path) -> Result<f64> {
    let last = contents
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| SweepError::malformed(path, "results file is empty"))?;

    let fields: Vec<&str> = last.split('\t').collect();
    let status = fields[0].trim();
    if status != PASS_STATUS {
        return Err(SweepError::malformed(path, format!("run did not pass: '{}'", last.trim())));
    }

    let field = fields
        .get(ELAPSED_FIELD)
        .copied()
        .map(str::trim)
        .ok_or_else(|| SweepError::malformed(path, format!("no elapsed-time field in '{}'", last.trim())))?;

    let number = field.strip_suffix('s').unwrap_or(field);
    number
        .parse::<f64>()
        .map_err(|e| SweepError::malformed(path, format!("bad elapsed time '{}': {}", field, e)))
}

/// Read and parse a results file
pub fn read_sim_time(path: &Path) -> Result<f64> {
    if !path.exists() {
        return Err(SweepError::MissingFile(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    parse_sim_time(&contents, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
go test -mod=readonly -benchmem -run=^$ ./simapp -bench ^BenchmarkFullAppSimulation$
goos: linux
goarch: amd64
BenchmarkFullAppSimulation-8   \t       1\t1268489736127 ns/op
PASS
ok  \tgithub.com/cosmos/cosmos-sdk/simapp\t1268.655s
";

    #[test]
    fn test_parse_last_line() {
        let time = parse_sim_time(SAMPLE, Path::new("a.results")).unwrap();
        assert!((time - 1268.655).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_blank_lines_ignored() {
        let contents = "ok  \tpkg\t12.5s\n\n   \n";
        assert_eq!(parse_sim_time(contents, Path::new("a.results")).unwrap(), 12.5);
    }

    #[test]
    fn test_value_without_unit() {
        assert_eq!(parse_sim_time("ok\tpkg\t42", Path::new("a.results")).unwrap(), 42.0);
    }

    #[test]
    fn test_malformed() {
        let path = Path::new("a.results");
        assert!(matches!(parse_sim_time("", path), Err(SweepError::Malformed { .. })));
        assert!(matches!(parse_sim_time("FAIL\tpkg", path), Err(SweepError::Malformed { .. })));
        assert!(matches!(parse_sim_time("ok\tpkg\t(cached)", path), Err(SweepError::Malformed { .. })));
    }

    #[test]
    fn test_failed_run_rejected() {
        let contents = "--- FAIL: BenchmarkFullAppSimulation\nFAIL\tgithub.com/cosmos/cosmos-sdk/simapp\t12.300s\n";
        let result = parse_sim_time(contents, Path::new("a.results"));
        assert!(matches!(result, Err(SweepError::Malformed { .. })));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("every-1-recent-0.results");
        assert!(matches!(read_sim_time(&path), Err(SweepError::MissingFile(_))));
    }
}
