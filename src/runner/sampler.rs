// src/runner/sampler.rs
//! Resource samplers
//!
//! A sampler attaches to a running pid and records its CPU and memory
//! usage to a log file until the process exits.

use std::path::Path;
use std::time::Duration;
use log::{debug, warn};
use tokio::process::Command;

use crate::core::config::SamplerConfig;
use crate::core::errors::{Result, SweepError};

/// Trait implemented by resource samplers
#[allow(async_fn_in_trait)]
pub trait Sampler {
    /// Name shown in logs and dry runs
    fn name(&self) -> &str;

    /// Sample `pid` every `interval`, writing to `log_path`, until the process exits
    async fn sample(&self, pid: u32, log_path: &Path, interval: Duration) -> Result<()>;
}

/// Sampler backed by the `psrecord` utility
#[derive(Debug, Clone)]
pub struct PsRecord {
    program: String,
}

impl PsRecord {
    pub fn new<S: Into<String>>(program: S) -> Self {
        PsRecord { program: program.into() }
    }

    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new(config.program.clone())
    }

    /// Arguments passed to the sampler for a given pid
    pub fn args(pid: u32, log_path: &Path, interval: Duration) -> Vec<String> {
        vec![
            pid.to_string(),
            "--log".to_string(),
            log_path.display().to_string(),
            "--interval".to_string(),
            interval.as_secs().max(1).to_string(),
        ]
    }
}

impl Default for PsRecord {
    fn default() -> Self {
        Self::from_config(&SamplerConfig::default())
    }
}

impl Sampler for PsRecord {
    fn name(&self) -> &str {
        &self.program
    }

    async fn sample(&self, pid: u32, log_path: &Path, interval: Duration) -> Result<()> {
        let args = Self::args(pid, log_path, interval);
        debug!("running {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .await
            .map_err(|e| SweepError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !status.success() {
            warn!("{} for pid {} exited with {}", self.program, pid, status);
        }
        Ok(())
    }
}
