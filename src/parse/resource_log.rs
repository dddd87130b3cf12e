// src/parse/resource_log.rs
//! Parser for sampler resource logs
//!
//! The sampler writes one whitespace-separated row per sample:
//!
//! ```text
//! # Elapsed time   CPU (%)     Real (MB)   Virtual (MB)
//!        0.000        0.000      23.148     1071.555
//!       15.012       98.600     412.004     2301.117
//! ```

use std::fs;
use std::path::Path;

use crate::core::errors::{Result, SweepError};

const CPU_COLUMN: usize = 1;
const MEM_COLUMN: usize = 2;

/// Peak usage over a sampled run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourcePeak {
    /// Highest CPU sample, in percent
    pub max_cpu: f64,
    /// Highest resident memory sample, in MB
    pub max_mem: f64,
    /// Number of data rows read
    pub samples: usize,
}

/// Compute peak CPU and memory from a resource log's contents
pub fn parse_resource_log(contents: &str, path: &Path) -> Result<ResourcePeak> {
    let mut peak: Option<ResourcePeak> = None;

    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() <= MEM_COLUMN {
            return Err(SweepError::malformed(path, format!(
                "line {}: expected at least {} columns, found {}",
                lineno + 1, MEM_COLUMN + 1, columns.len()
            )));
        }

        let column = |idx: usize| {
            columns[idx].parse::<f64>().map_err(|e| SweepError::malformed(path, format!(
                "line {}: bad value '{}': {}", lineno + 1, columns[idx], e
            )))
        };
        let cpu = column(CPU_COLUMN)?;
        let mem = column(MEM_COLUMN)?;

        peak = Some(match peak {
            None => ResourcePeak { max_cpu: cpu, max_mem: mem, samples: 1 },
            Some(p) => ResourcePeak {
                max_cpu: p.max_cpu.max(cpu),
                max_mem: p.max_mem.max(mem),
                samples: p.samples + 1,
            },
        });
    }

    peak.ok_or_else(|| SweepError::malformed(path, "no samples recorded"))
}

/// Read and parse a resource log
pub fn read_resource_log(path: &Path) -> Result<ResourcePeak> {
    if !path.exists() {
        return Err(SweepError::MissingFile(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    parse_resource_log(&contents, path)
}
