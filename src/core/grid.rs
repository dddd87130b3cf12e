//! Parameter grid
//!
//! A sweep covers every combination of two integer parameters, `every`
//! (outer loop) and `recent` (inner loop). Each combination is a
//! [`GridCell`] and owns a pair of output files named after it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::core::errors::{Result, SweepError};

/// Largest number of cells a grid may expand to
pub const MAX_GRID_CELLS: usize = 100_000;

fn default_step() -> u64 {
    1
}

/// Half-open integer range `start..end` walked in increments of `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamRange {
    pub start: u64,
    pub end: u64,
    #[serde(default = "default_step")]
    pub step: u64,
}

impl ParamRange {
    /// Create a new range, rejecting a zero step
    pub fn new(start: u64, end: u64, step: u64) -> Result<Self> {
        let range = ParamRange { start, end, step };
        range.validate()?;
        Ok(range)
    }

    /// Check that the range can be iterated
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(SweepError::InvalidRange(format!(
                "step must be positive in {}", self
            )));
        }
        Ok(())
    }

    /// Values covered by the range, in ascending order
    pub fn values(&self) -> impl Iterator<Item = u64> {
        // step_by panics on zero; a zero step yields nothing instead
        let step = self.step.max(1) as usize;
        let end = if self.step == 0 { self.start } else { self.end };
        (self.start..end).step_by(step)
    }

    /// Number of values in the range
    pub fn len(&self) -> usize {
        if self.step == 0 || self.end <= self.start {
            return 0;
        }
        let count = (self.end - self.start - 1) / self.step + 1;
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ParamRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.end, self.step)
    }
}

impl FromStr for ParamRange {
    type Err = SweepError;

    /// Parse `start:end:step`; the step defaults to 1 when omitted
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let parse = |part: &str| {
            part.parse::<u64>()
                .map_err(|e| SweepError::InvalidRange(format!("'{}': {}", s, e)))
        };

        match parts.as_slice() {
            [start, end] => ParamRange::new(parse(*start)?, parse(*end)?, 1),
            [start, end, step] => ParamRange::new(parse(*start)?, parse(*end)?, parse(*step)?),
            _ => Err(SweepError::InvalidRange(format!(
                "'{}': expected start:end[:step]", s
            ))),
        }
    }
}

/// One (every, recent) combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub every: u64,
    pub recent: u64,
}

impl GridCell {
    pub fn new(every: u64, recent: u64) -> Self {
        GridCell { every, recent }
    }

    /// Base name shared by the cell's output files
    pub fn file_stem(&self) -> String {
        format!("every-{}-recent-{}", self.every, self.recent)
    }

    /// Where the build output for this cell is appended
    pub fn results_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.results", self.file_stem()))
    }

    /// Where the sampler writes its resource log for this cell
    pub fn log_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.log", self.file_stem()))
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

/// The two-dimensional sweep grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepGrid {
    pub every: ParamRange,
    pub recent: ParamRange,
}

impl Default for SweepGrid {
    fn default() -> Self {
        SweepGrid {
            every: ParamRange { start: 1, end: 501, step: 100 },
            recent: ParamRange { start: 0, end: 201, step: 50 },
        }
    }
}

impl SweepGrid {
    pub fn new(every: ParamRange, recent: ParamRange) -> Self {
        SweepGrid { every, recent }
    }

    pub fn validate(&self) -> Result<()> {
        self.every.validate()?;
        self.recent.validate()?;
        if self.len() > MAX_GRID_CELLS {
            return Err(SweepError::InvalidRange(format!(
                "grid {} x {} has more than {} cells", self.every, self.recent, MAX_GRID_CELLS
            )));
        }
        Ok(())
    }

    /// All cells, `every` in the outer loop and `recent` in the inner one
    pub fn cells(&self) -> Vec<GridCell> {
        self.every
            .values()
            .flat_map(|every| self.recent.values().map(move |recent| GridCell::new(every, recent)))
            .collect()
    }

    /// Number of cells in the grid
    pub fn len(&self) -> usize {
        self.every.len().saturating_mul(self.recent.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
