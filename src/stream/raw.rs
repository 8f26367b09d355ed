//! Unbuffered file layer.

use super::{OpenMode, Stream, closed_stream, unsupported};
use crate::error::{LockStreamError, Result};
use log::debug;
use std::fs::File;
use std::io::{self, IsTerminal, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Direct reads and writes on an owned descriptor.
#[derive(Debug)]
pub struct RawFile {
    file: Option<File>,
    path: Option<PathBuf>,
    mode: OpenMode,
}

impl RawFile {
    /// Open `path` with the flags implied by `mode`.
    ///
    /// Failures keep the OS error kind (`NotFound`, `PermissionDenied`, ...)
    /// inside `LockStreamError::Unavailable`.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        let file = mode
            .open_options()
            .open(path)
            .map_err(|source| LockStreamError::Unavailable {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("opened '{}' with mode '{}'", path.display(), mode);

        Ok(Self {
            file: Some(file),
            path: Some(path.to_path_buf()),
            mode,
        })
    }

    /// Wrap an already open file. The stream takes ownership of the
    /// descriptor, so no other stream can wrap it. `mode` must describe how
    /// `file` was opened.
    pub fn from_file(file: File, mode: OpenMode) -> Self {
        Self {
            file: Some(file),
            path: None,
            mode,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.file.as_ref().is_some_and(|f| f.is_terminal())
    }

    /// Preferred I/O size reported by the file system.
    #[cfg(unix)]
    pub fn block_size(&self) -> Option<usize> {
        use std::os::unix::fs::MetadataExt;

        let metadata = self.file.as_ref()?.metadata().ok()?;
        usize::try_from(metadata.blksize()).ok().filter(|&bs| bs > 1)
    }

    #[cfg(not(unix))]
    pub fn block_size(&self) -> Option<usize> {
        None
    }

    fn open_file(&mut self) -> io::Result<&mut File> {
        self.file.as_mut().ok_or_else(closed_stream)
    }
}

impl Read for RawFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.mode.readable() {
            return Err(unsupported("readable"));
        }
        self.open_file()?.read(buf)
    }
}

impl Write for RawFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.mode.writable() {
            return Err(unsupported("writable"));
        }
        self.open_file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.open_file()?.flush()
    }
}

impl Seek for RawFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.open_file()?.seek(pos)
    }
}

impl Stream for RawFile {
    fn file(&self) -> io::Result<&File> {
        self.file.as_ref().ok_or_else(closed_stream)
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn mode(&self) -> OpenMode {
        self.mode
    }

    fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    fn close(&mut self) -> io::Result<()> {
        // Dropping the descriptor also drops any advisory lock held on it.
        if self.file.take().is_some() {
            debug!("closed raw file {:?}", self.path);
        }
        Ok(())
    }
}
