//! Implementation of the `lockstream append` command.

use crate::cli::AppendArgs;
use lockstream::error::Result;
use lockstream::stream::{Access, Kind, OpenMode};
use lockstream::{Config, open};
use log::info;
use std::io::Write;

const APPEND_MODE: OpenMode = OpenMode::new(Access::Append, false, Kind::Text);

/// Execute the `lockstream append` command.
///
/// Waits for the exclusive lock (unless the configuration disables
/// blocking), appends `text` plus a newline and closes the file, which
/// releases the lock.
pub fn cmd_append(args: AppendArgs, config: &Config) -> Result<()> {
    let mut stream = open(&args.path, APPEND_MODE, config)?;
    {
        let mut scope = stream.enter()?;
        writeln!(scope, "{}", args.text)?;
    }
    stream.close(None)?;
    info!("appended {} bytes to '{}'", args.text.len() + 1, args.path.display());
    Ok(())
}
