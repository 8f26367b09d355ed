//! Command implementations for lockstream.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command opens its stream through the library
//! factory with the defaults loaded from `--config`.

mod append;
mod hold;
mod try_lock;

use crate::cli::{Cli, Command};
use lockstream::Config;
use lockstream::error::Result;
use log::debug;

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. The configuration
/// file, when given, is loaded and validated before any file is opened.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    debug!("using configuration {:?}", config);

    match cli.command {
        Command::Hold(args) => hold::cmd_hold(args, &config),
        Command::Try(args) => try_lock::cmd_try(args, &config),
        Command::Append(args) => append::cmd_append(args, &config),
    }
}
