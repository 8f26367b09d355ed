//! Stream layers that a `LockedStream` can wrap.
//!
//! The stack mirrors ordinary buffered file I/O:
//! - [`RawFile`]: unbuffered reads and writes on the descriptor
//! - [`BufferedStream`]: read-ahead and write-behind buffering over any layer
//! - [`TextStream`]: UTF-8 text with decode error policy, newline translation
//!   and line buffering
//!
//! Every layer implements [`Stream`], the small capability interface the
//! locking code needs: the descriptor to lock, the path to unlink, the open
//! mode, and an explicit close.

mod buffered;
pub mod mode;
mod raw;
mod text;


use std::fs::File;
use std::io::{self, Read, Seek, Write};
use std::path::Path;

pub use buffered::BufferedStream;
pub use mode::{Access, Kind, OpenMode};
pub use raw::RawFile;
pub use text::TextStream;

/// Capabilities a stream layer must expose to be wrapped by a `LockedStream`.
pub trait Stream: Read + Write + Seek {
    /// The open file backing this stream. Fails once the stream is closed.
    fn file(&self) -> io::Result<&File>;

    /// Path the stream was opened from, if any.
    fn path(&self) -> Option<&Path>;

    fn mode(&self) -> OpenMode;

    fn is_closed(&self) -> bool;

    /// Flush pending data and release the descriptor. Closing an already
    /// closed stream does nothing.
    fn close(&mut self) -> io::Result<()>;
}

/// Type-erased stream as built by the factory.
pub type DynStream = Box<dyn Stream + Send>;

impl<S: Stream + ?Sized> Stream for Box<S> {
    fn file(&self) -> io::Result<&File> {
        (**self).file()
    }

    fn path(&self) -> Option<&Path> {
        (**self).path()
    }

    fn mode(&self) -> OpenMode {
        (**self).mode()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

pub(crate) fn closed_stream() -> io::Error {
    io::Error::other("I/O operation on closed stream")
}

pub(crate) fn unsupported(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, format!("stream is not {what}"))
}
