//! Implementation of the `lockstream hold` command.
//!
//! Takes the lock, reports it on stdout, optionally writes a line, then
//! keeps the lock for the requested time before releasing it. Other
//! processes use this to observe contention.

use crate::cli::HoldArgs;
use lockstream::error::Result;
use lockstream::{Config, open};
use log::info;
use std::io::Write;
use std::thread;
use std::time::Duration;

/// Execute the `lockstream hold` command.
pub fn cmd_hold(args: HoldArgs, config: &Config) -> Result<()> {
    let mut stream = open(&args.path, args.mode, config)?;

    let block = if args.no_block { Some(false) } else { None };
    stream.lock(block)?;
    info!(
        "holding {} lock on '{}' for {} ms",
        stream.lock_mode(),
        args.path.display(),
        args.millis
    );
    println!("locked");

    if let Some(text) = &args.write {
        writeln!(stream, "{}", text)?;
        stream.flush()?;
    }

    thread::sleep(Duration::from_millis(args.millis));

    stream.unlock();
    stream.close(args.delete.then_some(true))?;
    info!("released '{}'", args.path.display());
    Ok(())
}
