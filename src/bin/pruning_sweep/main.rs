mod app;
mod commands;
mod context;
mod formatters;

use std::process::ExitCode;
use clap::Parser;
use log::info;

fn main() -> ExitCode {
    let cli = app::Cli::parse();

    // Initialize the logger; RUST_LOG takes precedence over -v
    app::init_logger(cli.verbose);

    info!("Starting pruning-sweep");

    let result = app::run(cli);

    info!("pruning-sweep finished");

    // app::run has already printed the error through the formatter
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
