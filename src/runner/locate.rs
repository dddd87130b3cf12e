// src/runner/locate.rs
//! Process discovery by name

use log::debug;
use tokio::process::Command;

use crate::core::errors::{Result, SweepError};

/// Find the pid of the first process whose command line contains `process_name`
///
/// `output` is the text printed by `ps -ww -eo pid,args`. The header line and
/// the `exclude` pid are ignored.
pub fn parse_ps_output(output: &str, process_name: &str, exclude: Option<u32>) -> Option<u32> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim_start();
            let (pid, args) = line.split_once(char::is_whitespace)?;
            let pid = pid.parse::<u32>().ok()?;
            Some((pid, args))
        })
        .filter(|(pid, _)| Some(*pid) != exclude)
        .find(|(_, args)| args.contains(process_name))
        .map(|(pid, _)| pid)
}

/// Look up a running process by name through `ps`
pub async fn locate_pid(process_name: &str) -> Result<u32> {
    let output = Command::new("ps")
        .args(["-ww", "-eo", "pid,args"])
        .output()
        .await
        .map_err(|e| SweepError::Spawn {
            program: "ps".to_string(),
            source: e,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let pid = parse_ps_output(&stdout, process_name, Some(std::process::id()))
        .ok_or_else(|| SweepError::ProcessNotFound(process_name.to_string()))?;

    debug!("found '{}' at pid {}", process_name, pid);
    Ok(pid)
}
