//! Stream factory.
//!
//! Builds the minimal layer chain for an open mode (raw, then buffering
//! unless unbuffered, then text for text modes) and wraps it in a
//! [`LockedStream`]. Every option is validated before the file is opened, so
//! a rejected call never leaves a descriptor or a new file behind.

use crate::config::{Buffering, Config, DEFAULT_BUFFER_SIZE};
use crate::error::{LockStreamError, Result};
use crate::locks::LockedStream;
use crate::stream::{BufferedStream, DynStream, OpenMode, RawFile, TextStream};
use log::debug;
use std::fs::File;
use std::path::Path;

/// Open `path` and wrap it in a locked stream. The lock is not taken yet.
///
/// # Example
///
/// ```no_run
/// use lockstream::{Config, open};
/// use std::io::Write;
///
/// let mut stream = open("/tmp/t.lock", "a".parse()?, &Config::default())?;
/// stream.lock(None)?;
/// stream.write_all(b"hello\n")?;
/// stream.close(None)?;
/// # Ok::<(), lockstream::LockStreamError>(())
/// ```
pub fn open(
    path: impl AsRef<Path>,
    mode: OpenMode,
    config: &Config,
) -> Result<LockedStream<DynStream>> {
    let plan = Plan::new(mode, config)?;
    let raw = RawFile::open(path, mode)?;
    Ok(plan.build(raw))
}

/// Wrap an already open file. Ownership of the descriptor moves into the
/// stream. Such streams have no path, so delete-on-close does nothing.
pub fn open_file(file: File, mode: OpenMode, config: &Config) -> Result<LockedStream<DynStream>> {
    let plan = Plan::new(mode, config)?;
    Ok(plan.build(RawFile::from_file(file, mode)))
}

/// Validated layer choices for one open call.
#[derive(Debug)]
struct Plan<'a> {
    mode: OpenMode,
    config: &'a Config,
}

impl<'a> Plan<'a> {
    fn new(mode: OpenMode, config: &'a Config) -> Result<Self> {
        config.validate()?;

        if mode.is_binary() {
            if let Some(option) = config.text_option_name() {
                return Err(LockStreamError::invalid(format!(
                    "binary mode doesn't take an {option} argument"
                )));
            }
        } else if config.buffering == Buffering::Unbuffered {
            return Err(LockStreamError::invalid("can't have unbuffered text I/O"));
        }

        Ok(Self { mode, config })
    }

    fn build(self, raw: RawFile) -> LockedStream<DynStream> {
        let (capacity, line_buffering) = match self.config.buffering {
            Buffering::Unbuffered => {
                debug!("building unbuffered '{}' stream", self.mode);
                return LockedStream::new(Box::new(raw), self.config);
            }
            Buffering::Default => (default_buffer_size(&raw), raw.is_terminal()),
            Buffering::Line => (default_buffer_size(&raw), true),
            Buffering::Size(size) => (size, false),
        };
        debug!(
            "building '{}' stream with a {} byte buffer",
            self.mode, capacity
        );

        let buffered = BufferedStream::with_capacity(capacity, raw);
        let stream: DynStream = if self.mode.is_binary() {
            Box::new(buffered)
        } else {
            Box::new(TextStream::new(
                buffered,
                self.config.errors.unwrap_or_default(),
                self.config.newline.unwrap_or_default(),
                line_buffering || self.config.line_buffering,
            ))
        };
        LockedStream::new(stream, self.config)
    }
}

fn default_buffer_size(raw: &RawFile) -> usize {
    raw.block_size().unwrap_or(DEFAULT_BUFFER_SIZE)
}
