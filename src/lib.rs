//! pruning-sweep: a benchmark sweep harness
//!
//! This crate drives an external build/test command across a grid of
//! pruning parameters (`KEEP_EVERY`, `KEEP_RECENT`), samples the resource
//! usage of the simulation it starts, and summarizes the results.

pub mod core;
pub mod parse;
pub mod runner;
pub mod summary;

// Main types, re-exported for callers
pub use crate::core::{
    BuildCommand, GridCell, ParamRange, Result, ResultRecord, RunMode, SamplerConfig,
    SummaryRow, SweepConfig, SweepError, SweepGrid, SweepResults,
};
pub use crate::runner::{CellOutcome, CellStatus, PlannedCell, PsRecord, RunReport, Runner, Sampler};
pub use crate::summary::{collect, read_csv, write_csv};
