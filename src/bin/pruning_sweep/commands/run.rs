// src/bin/pruning_sweep/commands/run.rs
use std::path::PathBuf;
use anyhow::Result;
use log::info;
use pruning_sweep::{Runner, SweepConfig};
use crate::context::Context;

/// Execute the run command
pub fn execute(context: &Context, config: SweepConfig, dry_run: bool, collect_to: Option<PathBuf>) -> Result<()> {
    if context.verbosity() > 0 {
        println!("{}", context.formatter().format_info(&format!("configuration: {:?}", config)));
    }

    let runner = Runner::new(config);

    if dry_run {
        println!("{}", context.formatter().format_plan(&runner.plan())?);
        return Ok(());
    }

    let report = context.runtime().block_on(runner.run())?;
    println!("{}", context.formatter().format_report(&report)?);

    if let Some(csv) = collect_to {
        info!("Collecting results into {}", csv.display());
        super::collect::execute(context, runner.config(), &csv)?;
    }

    Ok(())
}
