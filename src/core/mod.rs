pub mod config;
pub mod errors;
pub mod grid;
pub mod record;


pub use config::{BuildCommand, RunMode, SamplerConfig, SweepConfig};
pub use errors::{Result, SweepError};
pub use grid::{GridCell, ParamRange, SweepGrid};
pub use record::{ResultRecord, SummaryRow, SweepResults};
