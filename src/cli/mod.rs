//! CLI argument parsing for lockstream.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use lockstream::OpenMode;
use std::path::PathBuf;

/// lockstream: take, hold and probe advisory locks on files.
///
/// Streams opened for writing take exclusive locks, read-only streams take
/// shared locks. Locks are advisory and only exclude cooperating processes.
#[derive(Parser, Debug)]
#[command(name = "lockstream")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// YAML file with stream defaults (block, delete, buffering, ...).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for lockstream.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lock a file and hold the lock for a while.
    ///
    /// Prints `locked` once the lock is held, optionally writes a line,
    /// sleeps, then unlocks and closes.
    Hold(HoldArgs),

    /// Try to lock a file without waiting.
    ///
    /// Prints `acquired` and exits 0 when the lock is free; exits 4 when
    /// another holder has it.
    Try(TryArgs),

    /// Append a line to a file under an exclusive lock.
    ///
    /// Waits for the lock, writes the line and closes the file.
    Append(AppendArgs),
}

/// Arguments for the `hold` command.
#[derive(Parser, Debug)]
pub struct HoldArgs {
    /// File to lock.
    pub path: PathBuf,

    /// Open mode (r, w, a, with optional +, b or t).
    #[arg(short, long, default_value = "a")]
    pub mode: OpenMode,

    /// How long to hold the lock, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub millis: u64,

    /// Line to write while the lock is held.
    #[arg(long)]
    pub write: Option<String>,

    /// Fail instead of waiting when the lock is held elsewhere.
    #[arg(long)]
    pub no_block: bool,

    /// Remove the file when closing it.
    #[arg(long)]
    pub delete: bool,
}

/// Arguments for the `try` command.
#[derive(Parser, Debug)]
pub struct TryArgs {
    /// File to probe.
    pub path: PathBuf,

    /// Open mode; read-only modes probe with a shared lock.
    #[arg(short, long, default_value = "a")]
    pub mode: OpenMode,
}

/// Arguments for the `append` command.
#[derive(Parser, Debug)]
pub struct AppendArgs {
    /// File to append to; created if missing.
    pub path: PathBuf,

    /// Text to append. A trailing newline is added.
    pub text: String,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
