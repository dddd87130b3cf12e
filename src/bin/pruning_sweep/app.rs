// src/bin/pruning_sweep/app.rs
use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use pruning_sweep::{ParamRange, RunMode, SweepConfig};

use crate::commands;
use crate::context::Context;
use crate::formatters::{Formatter, OutputFormat};

#[derive(Parser)]
#[command(name = "pruning-sweep")]
#[command(about = "Benchmark sweep over pruning parameters", long_about = None)]
pub struct Cli {
    /// Verbosity level (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format (text, json, table)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

/// Run mode as accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Run the build only
    Sequential,
    /// Run the build and sample its resource usage
    Sampled,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sequential => RunMode::Sequential,
            ModeArg::Sampled => RunMode::Sampled,
        }
    }
}

/// Options shared by commands that walk the grid
#[derive(Args, Debug, Default)]
pub struct SweepArgs {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Range of KEEP_EVERY values, as start:end:step
    #[arg(long)]
    every: Option<ParamRange>,

    /// Range of KEEP_RECENT values, as start:end:step
    #[arg(long)]
    recent: Option<ParamRange>,

    /// Directory holding the results and resource logs
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl SweepArgs {
    /// Load the configuration file (or defaults) and apply command-line overrides
    pub fn resolve(&self) -> Result<SweepConfig> {
        let mut config = match &self.config {
            Some(path) => SweepConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SweepConfig::default(),
        };
        if let Some(every) = self.every {
            config.grid.every = every;
        }
        if let Some(recent) = self.recent {
            config.grid.recent = recent;
        }
        if let Some(out) = &self.out {
            config.output_dir = out.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the build for every grid cell
    Run {
        #[command(flatten)]
        sweep: SweepArgs,

        /// Run mode
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Print the cells and commands without running anything
        #[arg(long)]
        dry_run: bool,

        /// Collect the summary CSV once the sweep is done
        #[arg(long)]
        collect: bool,

        /// Summary CSV path (defaults to <out>/sweep_results.csv)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Parse results and resource logs into a summary CSV
    Collect {
        #[command(flatten)]
        sweep: SweepArgs,

        /// Summary CSV path (defaults to <out>/sweep_results.csv)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Display a summary CSV
    Show {
        /// CSV file to display
        csv: PathBuf,
    },
}

/// Default location of the summary CSV
pub fn default_csv_path(config: &SweepConfig) -> PathBuf {
    config.output_dir.join("sweep_results.csv")
}

/// Initialize env_logger, using the verbosity count when RUST_LOG is unset
pub fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Run the CLI application, reporting a failed command through the selected formatter
pub fn run(cli: Cli) -> Result<()> {
    let context = Context::new(cli.verbose, cli.format, !cli.no_color)
        .inspect_err(|e| eprintln!("Error: {:#}", e))?;

    let result = dispatch(&context, cli.command);
    if let Err(e) = &result {
        eprintln!("{}", error_message(context.formatter(), e));
    }
    result
}

/// Render a command error, including its causes
pub fn error_message(formatter: &dyn Formatter, error: &anyhow::Error) -> String {
    formatter.format_error(&format!("{:#}", error))
}

fn dispatch(context: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Run { sweep, mode, dry_run, collect, csv } => {
            let mut config = sweep.resolve()?;
            if let Some(mode) = mode {
                config.mode = mode.into();
            }
            let csv = csv.unwrap_or_else(|| default_csv_path(&config));
            commands::run::execute(context, config, dry_run, collect.then_some(csv))
        },
        Commands::Collect { sweep, csv } => {
            let config = sweep.resolve()?;
            let csv = csv.unwrap_or_else(|| default_csv_path(&config));
            commands::collect::execute(context, &config, &csv)
        },
        Commands::Show { csv } => {
            commands::show::execute(context, &csv)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::json::JsonFormatter;
    use crate::formatters::text::TextFormatter;

    #[test]
    fn test_overrides_apply_on_defaults() {
        let args = SweepArgs {
            every: Some(ParamRange::new(1, 3, 1).unwrap()),
            out: Some(PathBuf::from("bench")),
            ..SweepArgs::default()
        };
        let config = args.resolve().unwrap();

        assert_eq!(config.grid.len(), 2 * 5);
        assert_eq!(default_csv_path(&config), PathBuf::from("bench/sweep_results.csv"));
    }

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from([
            "pruning-sweep", "-v", "run", "--every", "1:201:100", "--mode", "sequential", "--dry-run",
        ]).unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Run { sweep, mode, dry_run, collect, .. } => {
                assert_eq!(sweep.every, Some(ParamRange::new(1, 201, 100).unwrap()));
                assert_eq!(mode, Some(ModeArg::Sequential));
                assert!(dry_run);
                assert!(!collect);
            },
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_error_message_uses_formatter() {
        let error = anyhow::anyhow!("no such file").context("reading sweep.csv");

        let text = error_message(&TextFormatter::without_colors(), &error);
        assert_eq!(text, "Error: reading sweep.csv: no such file");

        let json = error_message(&JsonFormatter::new(), &error);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error"], "reading sweep.csv: no such file");
    }

    #[test]
    fn test_bad_range_rejected() {
        assert!(Cli::try_parse_from(["pruning-sweep", "run", "--every", "1:10:0"]).is_err());
    }
}
