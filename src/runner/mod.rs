// src/runner/mod.rs
//! Sweep execution
//!
//! The [`Runner`] walks the grid one cell at a time. In sampled mode the
//! build is launched as a background task; after a fixed delay the
//! simulation process is looked up by name and handed to the sampler,
//! which returns once the process exits.

pub mod build;
pub mod locate;
pub mod sampler;

use std::fs;
use std::time::{Duration, Instant};
use chrono::{DateTime, Local};
use log::{error, info, warn};

use crate::core::config::{RunMode, SweepConfig};
use crate::core::errors::{Result, SweepError};
use crate::core::grid::GridCell;

pub use build::run_build;
pub use locate::{locate_pid, parse_ps_output};
pub use sampler::{PsRecord, Sampler};

/// How a cell ended
#[derive(Debug, Clone, PartialEq)]
pub enum CellStatus {
    /// The build ran (whatever its exit code) and, in sampled mode, was sampled
    Completed,
    /// The build ran but the cell could not be sampled
    Skipped(String),
    /// The build could not be run
    Failed(String),
}

/// Outcome of one grid cell
#[derive(Debug, Clone)]
pub struct CellOutcome {
    pub cell: GridCell,
    pub status: CellStatus,
    /// Exit code of the build, if it ran to completion
    pub exit_code: Option<i32>,
    /// Pid that was sampled
    pub pid: Option<u32>,
    pub elapsed: Duration,
}

/// Summary of a whole sweep
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub cells: Vec<CellOutcome>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.cells.iter().filter(|c| c.status == CellStatus::Completed).count()
    }

    pub fn skipped(&self) -> usize {
        self.cells.iter().filter(|c| matches!(c.status, CellStatus::Skipped(_))).count()
    }

    pub fn failed(&self) -> usize {
        self.cells.iter().filter(|c| matches!(c.status, CellStatus::Failed(_))).count()
    }
}

/// A cell as it would be executed, for dry runs
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCell {
    pub cell: GridCell,
    pub env: Vec<(String, String)>,
    pub command: String,
    pub sampler: Option<String>,
}

/// Drives the build and the sampler across the grid
pub struct Runner<S: Sampler = PsRecord> {
    config: SweepConfig,
    sampler: S,
}

impl Runner<PsRecord> {
    /// Create a runner using the configured `psrecord` sampler
    pub fn new(config: SweepConfig) -> Self {
        let sampler = PsRecord::from_config(&config.sampler);
        Runner { config, sampler }
    }
}

impl<S: Sampler> Runner<S> {
    pub fn with_sampler(config: SweepConfig, sampler: S) -> Self {
        Runner { config, sampler }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Describe what `run` would do without spawning anything
    pub fn plan(&self) -> Vec<PlannedCell> {
        let dir = &self.config.output_dir;
        self.config
            .grid
            .cells()
            .into_iter()
            .map(|cell| PlannedCell {
                cell,
                env: self.config.build.env_for(&cell),
                command: format!("{} >> {}", self.config.build.display(), cell.results_path(dir).display()),
                sampler: match self.config.mode {
                    RunMode::Sequential => None,
                    RunMode::Sampled => Some(format!(
                        "{} <pid of {}> --log {} --interval {}",
                        self.sampler.name(),
                        self.config.sampler.process_name,
                        cell.log_path(dir).display(),
                        self.config.sampler.interval_secs,
                    )),
                },
            })
            .collect()
    }

    /// Run every cell of the grid
    pub async fn run(&self) -> Result<RunReport> {
        self.config.validate()?;
        fs::create_dir_all(&self.config.output_dir)?;

        let started_at = Local::now();
        let cells = self.config.grid.cells();
        info!("Sweeping {} cells in {:?} mode", cells.len(), self.config.mode);

        let mut outcomes = Vec::with_capacity(cells.len());
        for cell in cells {
            info!("Running {}", cell.file_stem());
            let outcome = match self.config.mode {
                RunMode::Sequential => self.run_sequential(cell).await,
                RunMode::Sampled => self.run_sampled(cell).await,
            };
            match &outcome.status {
                CellStatus::Completed => {}
                CellStatus::Skipped(reason) => warn!("{}: skipped: {}", cell, reason),
                CellStatus::Failed(reason) => error!("{}: failed: {}", cell, reason),
            }
            outcomes.push(outcome);
        }

        Ok(RunReport {
            started_at,
            finished_at: Local::now(),
            cells: outcomes,
        })
    }

    async fn run_sequential(&self, cell: GridCell) -> CellOutcome {
        let start = Instant::now();
        let result = run_build(cell, &self.config.build, &self.config.output_dir).await;

        let (status, exit_code) = match result {
            Ok(exit) => (CellStatus::Completed, exit.code()),
            Err(e) => (CellStatus::Failed(e.to_string()), None),
        };
        CellOutcome { cell, status, exit_code, pid: None, elapsed: start.elapsed() }
    }

    async fn run_sampled(&self, cell: GridCell) -> CellOutcome {
        let start = Instant::now();
        let sampler_config = &self.config.sampler;

        let build = self.config.build.clone();
        let dir = self.config.output_dir.clone();
        let mut handle = tokio::spawn(async move { run_build(cell, &build, &dir).await });

        // A build that is already gone cannot be sampled; don't look up an unrelated pid
        let delay = Duration::from_secs(sampler_config.discovery_delay_secs);
        if let Ok(joined) = tokio::time::timeout(delay, &mut handle).await {
            let (status, exit_code) = match joined {
                Ok(Ok(exit)) => (
                    CellStatus::Skipped("build exited before the process could be sampled".to_string()),
                    exit.code(),
                ),
                Ok(Err(e)) => (CellStatus::Failed(e.to_string()), None),
                Err(e) => (CellStatus::Failed(SweepError::Task(e.to_string()).to_string()), None),
            };
            return CellOutcome { cell, status, exit_code, pid: None, elapsed: start.elapsed() };
        }

        let sampled = match locate_pid(&sampler_config.process_name).await {
            Ok(pid) => {
                info!("{}: sampling pid {} with {}", cell, pid, self.sampler.name());
                let log_path = cell.log_path(&self.config.output_dir);
                let interval = Duration::from_secs(sampler_config.interval_secs);
                self.sampler.sample(pid, &log_path, interval).await.map(|_| pid)
            }
            Err(e) => Err(e),
        };

        let built = match handle.await {
            Ok(result) => result,
            Err(e) => Err(SweepError::Task(e.to_string())),
        };

        let elapsed = start.elapsed();
        match (built, sampled) {
            (Err(e), _) => CellOutcome {
                cell, status: CellStatus::Failed(e.to_string()), exit_code: None, pid: None, elapsed,
            },
            (Ok(exit), Err(e)) => CellOutcome {
                cell, status: CellStatus::Skipped(e.to_string()), exit_code: exit.code(), pid: None, elapsed,
            },
            (Ok(exit), Ok(pid)) => CellOutcome {
                cell, status: CellStatus::Completed, exit_code: exit.code(), pid: Some(pid), elapsed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;
    use crate::core::config::{BuildCommand, SamplerConfig};
    use crate::core::grid::{ParamRange, SweepGrid};

    /// Sampler that writes a fixed log instead of attaching to the process
    #[derive(Default)]
    struct FakeSampler {
        pids: Mutex<Vec<u32>>,
    }

    impl Sampler for FakeSampler {
        fn name(&self) -> &str {
            "fake"
        }

        async fn sample(&self, pid: u32, log_path: &Path, _interval: Duration) -> Result<()> {
            self.pids.lock().unwrap().push(pid);
            fs::write(log_path, "# Elapsed time   CPU (%)     Real (MB)   Virtual (MB)\n0.0 50.0 100.0 900.0\n")?;
            Ok(())
        }
    }

    fn config(dir: &Path, script: &str, mode: RunMode) -> SweepConfig {
        SweepConfig {
            grid: SweepGrid::new(
                ParamRange::new(1, 3, 1).unwrap(),
                ParamRange::new(0, 100, 50).unwrap(),
            ),
            output_dir: dir.to_path_buf(),
            mode,
            build: BuildCommand {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), script.to_string()],
                ..BuildCommand::default()
            },
            sampler: SamplerConfig {
                process_name: "pruning-sweep-no-such-process".to_string(),
                discovery_delay_secs: 0,
                ..SamplerConfig::default()
            },
        }
    }

    fn ps_available() -> bool {
        std::process::Command::new("ps").args(["-eo", "pid,args"]).output().is_ok()
    }

    #[tokio::test]
    async fn test_sequential_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "printf 'ok\\tpkg\\t%s.5s\\n' \"$KEEP_EVERY\"", RunMode::Sequential);
        let runner = Runner::new(config);

        let report = runner.run().await.unwrap();
        assert_eq!(report.cells.len(), 4);
        assert_eq!(report.completed(), 4);
        assert!(report.cells.iter().all(|c| c.exit_code == Some(0)));

        let contents = fs::read_to_string(dir.path().join("every-2-recent-50.results")).unwrap();
        assert_eq!(contents, "ok\tpkg\t2.5s\n");
    }

    #[tokio::test]
    async fn test_sampled_skips_when_process_missing() {
        if !ps_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "echo done", RunMode::Sampled);
        let sampler = FakeSampler::default();
        let runner = Runner::with_sampler(config, sampler);

        let report = runner.run().await.unwrap();
        assert_eq!(report.skipped(), 4);
        assert!(runner.sampler.pids.lock().unwrap().is_empty());

        // the build still ran to completion
        let contents = fs::read_to_string(dir.path().join("every-1-recent-0.results")).unwrap();
        assert_eq!(contents, "done\n");
        assert!(!dir.path().join("every-1-recent-0.log").exists());
    }

    #[tokio::test]
    async fn test_sampled_finds_build_process() {
        if !ps_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let marker = format!("pruning-sweep-marker-{}", std::process::id());
        let mut config = config(dir.path(), &format!("sleep 3; echo finished # {}", marker), RunMode::Sampled);
        config.grid = SweepGrid::new(ParamRange::new(1, 2, 1).unwrap(), ParamRange::new(0, 1, 1).unwrap());
        config.sampler.process_name = marker;
        config.sampler.discovery_delay_secs = 1;
        let runner = Runner::with_sampler(config, FakeSampler::default());

        let report = runner.run().await.unwrap();
        assert_eq!(report.completed(), 1);
        assert_eq!(report.cells[0].pid, runner.sampler.pids.lock().unwrap().first().copied());
        assert!(dir.path().join("every-1-recent-0.log").exists());
    }

    #[tokio::test]
    async fn test_missing_build_program_fails_cell() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), "", RunMode::Sequential);
        config.build.program = "/nonexistent/make".to_string();
        let report = Runner::new(config).run().await.unwrap();

        assert_eq!(report.failed(), 4);
    }

    #[tokio::test]
    async fn test_sampled_does_not_wait_for_missing_build() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), "", RunMode::Sampled);
        config.build.program = "/nonexistent/make".to_string();
        config.sampler.discovery_delay_secs = 60;
        let runner = Runner::with_sampler(config, FakeSampler::default());

        let report = tokio::time::timeout(Duration::from_secs(20), runner.run())
            .await
            .expect("sweep waited for the discovery delay")
            .unwrap();
        assert_eq!(report.failed(), 4);
        assert!(runner.sampler.pids.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sampled_skips_build_that_already_exited() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), "echo quick", RunMode::Sampled);
        config.sampler.discovery_delay_secs = 60;
        // would match the harness itself if discovery ran
        config.sampler.process_name = "pruning".to_string();
        let runner = Runner::with_sampler(config, FakeSampler::default());

        let report = tokio::time::timeout(Duration::from_secs(20), runner.run())
            .await
            .expect("sweep waited for the discovery delay")
            .unwrap();
        assert_eq!(report.skipped(), 4);
        assert!(report.cells.iter().all(|c| c.exit_code == Some(0) && c.pid.is_none()));
        assert!(runner.sampler.pids.lock().unwrap().is_empty());
    }

    #[test]
    fn test_plan() {
        let config = config(Path::new("out"), "true", RunMode::Sampled);
        let plan = Runner::new(config).plan();

        assert_eq!(plan.len(), 4);
        assert_eq!(plan[1].cell, GridCell::new(1, 50));
        assert!(plan[1].command.ends_with("out/every-1-recent-50.results"));
        assert!(plan[1].env.contains(&("KEEP_RECENT".to_string(), "50".to_string())));
        let sampler = plan[1].sampler.as_deref().unwrap();
        assert!(sampler.starts_with("psrecord"));
        assert!(sampler.contains("--interval 15"));
    }
}
