//! lockstream: take, hold and probe advisory file locks from the shell.
//!
//! This is the main entry point for the `lockstream` CLI. It parses
//! arguments, sets up logging, dispatches to the appropriate command
//! handler, and handles errors with proper exit codes.

mod cli;
mod commands;

use cli::Cli;
use lockstream::exit_codes;
use log::LevelFilter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

/// Route `log` output to stderr. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
