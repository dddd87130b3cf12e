//! Result records
//!
//! One [`ResultRecord`] summarizes a finished grid cell. Records are kept
//! in a [`SweepResults`] map keyed by the `every` parameter.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::grid::GridCell;

/// Measurements collected for a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Value of the secondary parameter
    pub recent: u64,
    /// Elapsed simulation time, in seconds
    pub sim_time: f64,
    /// Peak CPU usage, in percent
    pub max_cpu: f64,
    /// Peak resident memory, in MB
    pub max_mem: f64,
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recent={}: {:.3}s, {:.1}% cpu, {:.1} MB",
            self.recent, self.sim_time, self.max_cpu, self.max_mem)
    }
}

/// Summary row: a record together with its primary parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub every: u64,
    pub recent: u64,
    pub sim_time: f64,
    pub max_cpu: f64,
    pub max_mem: f64,
}

impl SummaryRow {
    pub fn new(every: u64, record: &ResultRecord) -> Self {
        SummaryRow {
            every,
            recent: record.recent,
            sim_time: record.sim_time,
            max_cpu: record.max_cpu,
            max_mem: record.max_mem,
        }
    }

    pub fn record(&self) -> ResultRecord {
        ResultRecord {
            recent: self.recent,
            sim_time: self.sim_time,
            max_cpu: self.max_cpu,
            max_mem: self.max_mem,
        }
    }
}

/// Records for a whole sweep, grouped by `every`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepResults {
    records: BTreeMap<u64, Vec<ResultRecord>>,
}

impl SweepResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a cell
    pub fn insert(&mut self, cell: GridCell, sim_time: f64, max_cpu: f64, max_mem: f64) {
        self.push(cell.every, ResultRecord {
            recent: cell.recent,
            sim_time,
            max_cpu,
            max_mem,
        });
    }

    /// Append a record under the given `every` value
    pub fn push(&mut self, every: u64, record: ResultRecord) {
        self.records.entry(every).or_default().push(record);
    }

    /// Records for one `every` value, in insertion order
    pub fn get(&self, every: u64) -> Option<&[ResultRecord]> {
        self.records.get(&every).map(Vec::as_slice)
    }

    /// Flattened rows, ordered by `every` then insertion order
    pub fn rows(&self) -> Vec<SummaryRow> {
        self.records
            .iter()
            .flat_map(|(every, records)| records.iter().map(move |r| SummaryRow::new(*every, r)))
            .collect()
    }

    /// Total number of records
    pub fn row_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

impl FromIterator<SummaryRow> for SweepResults {
    fn from_iter<I: IntoIterator<Item = SummaryRow>>(iter: I) -> Self {
        let mut results = SweepResults::new();
        for row in iter {
            results.push(row.every, row.record());
        }
        results
    }
}
