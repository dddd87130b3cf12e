//! Summary collection
//!
//! Turns the per-cell results and resource logs left by a sweep into a
//! [`SweepResults`] table and a CSV file.

use std::fs;
use std::path::Path;
use csv::{ReaderBuilder, WriterBuilder};
use log::{info, warn};

use crate::core::errors::Result;
use crate::core::grid::{GridCell, SweepGrid};
use crate::core::record::{ResultRecord, SummaryRow, SweepResults};
use crate::parse::{read_resource_log, read_sim_time};

/// Columns of the summary CSV
pub const CSV_HEADER: [&str; 5] = ["every", "recent", "sim_time", "max_cpu", "max_mem"];

/// Parse the results file and resource log of a single cell
pub fn collect_cell(cell: GridCell, dir: &Path) -> Result<ResultRecord> {
    let sim_time = read_sim_time(&cell.results_path(dir))?;
    let peak = read_resource_log(&cell.log_path(dir))?;
    Ok(ResultRecord {
        recent: cell.recent,
        sim_time,
        max_cpu: peak.max_cpu,
        max_mem: peak.max_mem,
    })
}

/// Parse every cell of the grid, skipping cells whose files are missing or malformed
pub fn collect(grid: &SweepGrid, dir: &Path) -> SweepResults {
    let mut results = SweepResults::new();
    let cells = grid.cells();
    let total = cells.len();

    for cell in cells {
        match collect_cell(cell, dir) {
            Ok(record) => results.push(cell.every, record),
            Err(e) => warn!("{}: {}", cell, e),
        }
    }

    info!("Collected {} of {} cells from {}", results.row_count(), total, dir.display());
    results
}

/// Write the summary CSV
pub fn write_csv(results: &SweepResults, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for row in results.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a summary CSV back into memory
pub fn read_csv(path: &Path) -> Result<SweepResults> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize::<SummaryRow>() {
        rows.push(row?);
    }
    Ok(rows.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::ParamRange;

    const RESULTS: &str = "PASS\nok  \tgithub.com/cosmos/cosmos-sdk/simapp\t812.25s\n";
    const LOG: &str = "\
# Elapsed time   CPU (%)     Real (MB)   Virtual (MB)
       0.000        0.000       23.148     1071.555
      15.012      104.500      390.000     2301.117
      30.019       99.000      410.500     2310.420
";

    fn write_cell(dir: &Path, cell: GridCell, results: &str, log: &str) {
        fs::write(cell.results_path(dir), results).unwrap();
        fs::write(cell.log_path(dir), log).unwrap();
    }

    fn small_grid() -> SweepGrid {
        SweepGrid::new(ParamRange::new(1, 201, 100).unwrap(), ParamRange::new(0, 100, 50).unwrap())
    }

    #[test]
    fn test_collect_cell() {
        let dir = tempfile::tempdir().unwrap();
        let cell = GridCell::new(101, 50);
        write_cell(dir.path(), cell, RESULTS, LOG);

        let record = collect_cell(cell, dir.path()).unwrap();
        assert_eq!(record, ResultRecord { recent: 50, sim_time: 812.25, max_cpu: 104.5, max_mem: 410.5 });
    }

    #[test]
    fn test_collect_skips_bad_cells() {
        let dir = tempfile::tempdir().unwrap();
        write_cell(dir.path(), GridCell::new(1, 0), RESULTS, LOG);
        write_cell(dir.path(), GridCell::new(1, 50), RESULTS, LOG);
        write_cell(dir.path(), GridCell::new(101, 0), "FAIL\n", LOG);
        // 101/50 has a results file but no resource log
        fs::write(GridCell::new(101, 50).results_path(dir.path()), RESULTS).unwrap();

        let results = collect(&small_grid(), dir.path());
        assert_eq!(results.row_count(), 2);
        assert_eq!(results.get(1).map(|r| r.len()), Some(2));
        assert!(results.get(101).is_none());
    }

    #[test]
    fn test_csv_rows_match_valid_cells() {
        let dir = tempfile::tempdir().unwrap();
        write_cell(dir.path(), GridCell::new(1, 0), RESULTS, LOG);
        write_cell(dir.path(), GridCell::new(101, 50), RESULTS, LOG);

        let results = collect(&small_grid(), dir.path());
        let csv_path = dir.path().join("summary").join("sweep.csv");
        write_csv(&results, &csv_path).unwrap();

        let contents = fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "every,recent,sim_time,max_cpu,max_mem");
        assert_eq!(lines.len(), 1 + results.row_count());
        assert_eq!(lines[1], "1,0,812.25,104.5,410.5");
        assert_eq!(lines[2], "101,50,812.25,104.5,410.5");

        let back = read_csv(&csv_path).unwrap();
        assert_eq!(back, results);
    }

    #[test]
    fn test_empty_results_write_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("sweep.csv");
        write_csv(&SweepResults::new(), &csv_path).unwrap();

        let contents = fs::read_to_string(&csv_path).unwrap();
        assert_eq!(contents.trim(), "every,recent,sim_time,max_cpu,max_mem");
    }
}
