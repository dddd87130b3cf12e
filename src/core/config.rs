//! Sweep configuration
//!
//! Every setting has a default that reproduces the benchmark sweep as it
//! is normally run; a JSON file can override any subset of them.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

use crate::core::errors::{Result, SweepError};
use crate::core::grid::{GridCell, SweepGrid};

/// How each grid cell is executed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Run the build and capture its output only
    Sequential,
    /// Run the build in the background and sample its resource usage
    #[default]
    Sampled,
}

/// The external build/test invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Value passed as `HOME` to the build
    pub home: String,
    /// Keep the harness environment instead of starting from an empty one
    pub inherit_env: bool,
}

impl Default for BuildCommand {
    fn default() -> Self {
        BuildCommand {
            program: "make".to_string(),
            args: vec!["test-sim-benchmark".to_string()],
            home: "/home/ubuntu".to_string(),
            inherit_env: false,
        }
    }
}

impl BuildCommand {
    /// Environment variables set for a given cell
    pub fn env_for(&self, cell: &GridCell) -> Vec<(String, String)> {
        let mut env = vec![
            ("KEEP_EVERY".to_string(), cell.every.to_string()),
            ("KEEP_RECENT".to_string(), cell.recent.to_string()),
        ];
        if let Ok(path) = std::env::var("PATH") {
            env.push(("PATH".to_string(), path));
        }
        env.push(("HOME".to_string(), self.home.clone()));
        env
    }

    /// Human-readable command line
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The external resource sampler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub program: String,
    /// Substring identifying the simulation process in `ps` output
    pub process_name: String,
    pub interval_secs: u64,
    /// How long to wait after launching the build before looking for the pid
    pub discovery_delay_secs: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            program: "psrecord".to_string(),
            process_name: "simapp.test".to_string(),
            interval_secs: 15,
            discovery_delay_secs: 60,
        }
    }
}

/// Complete configuration of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub grid: SweepGrid,
    pub output_dir: PathBuf,
    pub mode: RunMode,
    pub build: BuildCommand,
    pub sampler: SamplerConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            grid: SweepGrid::default(),
            output_dir: PathBuf::from("."),
            mode: RunMode::default(),
            build: BuildCommand::default(),
            sampler: SamplerConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Load a configuration from a JSON file; absent fields keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SweepError::MissingFile(path.to_path_buf()),
            _ => SweepError::Io(e),
        })?;
        let config: SweepConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        if self.build.program.trim().is_empty() {
            return Err(SweepError::Config("build program is empty".to_string()));
        }
        if self.mode == RunMode::Sampled {
            if self.sampler.program.trim().is_empty() {
                return Err(SweepError::Config("sampler program is empty".to_string()));
            }
            if self.sampler.process_name.trim().is_empty() {
                return Err(SweepError::Config("sampler process name is empty".to_string()));
            }
        }
        Ok(())
    }
}
