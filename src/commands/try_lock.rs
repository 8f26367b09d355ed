//! Implementation of the `lockstream try` command.
//!
//! A single non-blocking lock attempt. Contention surfaces as
//! `WouldBlock`, which the binary maps to the lock-failure exit code.

use crate::cli::TryArgs;
use lockstream::error::Result;
use lockstream::{Config, open};
use log::info;

/// Execute the `lockstream try` command.
pub fn cmd_try(args: TryArgs, config: &Config) -> Result<()> {
    let mut stream = open(&args.path, args.mode, config)?;
    stream.lock(Some(false))?;
    info!(
        "{} lock on '{}' is free",
        stream.lock_mode(),
        args.path.display()
    );
    println!("acquired");
    stream.close(None)
}
