//! lockstream: file streams with advisory OS locking.
//!
//! A [`LockedStream`] owns an ordinary (optionally buffered, optionally text)
//! file stream and takes a whole-file advisory lock on its descriptor:
//! exclusive for streams that may write, shared for read-only streams. The
//! lock is taken with [`LockedStream::lock`] or by entering a scope with
//! [`LockedStream::enter`], released with [`LockedStream::unlock`], and
//! always released when the stream is closed. Streams can unlink their file
//! on close.
//!
//! The library never configures logging itself; it emits through the `log`
//! facade and takes its defaults from an explicit [`Config`].

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod locks;
pub mod open;
pub mod stream;

pub use config::Config;
pub use error::{LockStreamError, Result};
pub use locks::{LockMode, LockScope, LockedStream};
pub use open::{open, open_file};
pub use stream::{DynStream, OpenMode, Stream};
