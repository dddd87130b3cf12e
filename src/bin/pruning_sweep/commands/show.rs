// src/bin/pruning_sweep/commands/show.rs
use std::path::Path;
use anyhow::{Context as _, Result};
use pruning_sweep::summary;
use crate::context::Context;

/// Execute the show command
pub fn execute(context: &Context, csv: &Path) -> Result<()> {
    let results = summary::read_csv(csv)
        .with_context(|| format!("reading {}", csv.display()))?;

    if results.is_empty() {
        println!("{}", context.formatter().format_info("summary is empty"));
    } else {
        println!("{}", context.formatter().format_results(&results)?);
    }

    Ok(())
}
