// src/bin/pruning_sweep/commands/collect.rs
use std::path::Path;
use anyhow::Result;
use pruning_sweep::{summary, SweepConfig};
use crate::context::Context;

/// Execute the collect command
pub fn execute(context: &Context, config: &SweepConfig, csv: &Path) -> Result<()> {
    let results = summary::collect(&config.grid, &config.output_dir);
    summary::write_csv(&results, csv)?;

    println!("{}", context.formatter().format_results(&results)?);
    println!("{}", context.formatter().format_success(&format!(
        "{} of {} cells written to {}", results.row_count(), config.grid.len(), csv.display()
    )));

    Ok(())
}
