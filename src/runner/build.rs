// src/runner/build.rs
//! Build invocation for a single grid cell

use std::fs::OpenOptions;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use log::{debug, warn};
use tokio::process::Command;

use crate::core::config::BuildCommand;
use crate::core::errors::{Result, SweepError};
use crate::core::grid::GridCell;

/// Run the build for `cell`, appending stdout and stderr to its results file
pub async fn run_build(cell: GridCell, build: &BuildCommand, output_dir: &Path) -> Result<ExitStatus> {
    let results_path = cell.results_path(output_dir);
    let mut command = prepare(cell, build, &results_path)?;

    debug!("{}: spawning '{}'", cell, build.display());
    let mut child = command.spawn().map_err(|e| SweepError::Spawn {
        program: build.program.clone(),
        source: e,
    })?;

    let status = child.wait().await?;
    if !status.success() {
        warn!("{}: '{}' exited with {}", cell, build.display(), status);
    }
    Ok(status)
}

fn prepare(cell: GridCell, build: &BuildCommand, results_path: &Path) -> Result<Command> {
    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(results_path)?;
    let err_log = log.try_clone()?;

    let mut command = Command::new(&build.program);
    command.args(&build.args);
    if !build.inherit_env {
        command.env_clear();
    }
    command
        .envs(build.env_for(&cell))
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(err_log));
    Ok(command)
}
