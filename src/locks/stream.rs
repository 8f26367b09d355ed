//! The lock-aware stream wrapper.

use super::guard::LockScope;
use super::types::LockMode;
use crate::config::Config;
use crate::error::{LockStreamError, Result};
use crate::stream::Stream;
use fs2::FileExt;
use log::{debug, warn};
use std::fmt;
use std::fs;
use std::io::{self, BufRead, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// A stream that carries an advisory lock on its descriptor.
///
/// The lock mode is fixed when the stream is built: streams opened for
/// writing, appending or update take exclusive locks, read-only streams take
/// shared locks. The lock belongs to the descriptor, so closing the stream
/// (explicitly or by dropping it) always releases it.
///
/// # Scope exit keeps the lock
///
/// [`enter`](Self::enter) locks the stream and returns a [`LockScope`].
/// Leaving that scope flushes buffered writes but does **not** unlock. The
/// lock stays held until [`unlock`](Self::unlock) or [`close`](Self::close)
/// is called, or the stream is dropped.
pub struct LockedStream<S: Stream> {
    inner: S,
    lock_mode: LockMode,
    block: bool,
    delete: bool,
    locked: bool,
}

impl<S: Stream> LockedStream<S> {
    /// Wrap `inner`, taking the blocking and delete-on-close defaults from
    /// `config`.
    pub fn new(inner: S, config: &Config) -> Self {
        Self::with_options(inner, config.block, config.delete)
    }

    pub fn with_options(inner: S, block: bool, delete: bool) -> Self {
        let lock_mode = inner.mode().lock_mode();
        Self {
            inner,
            lock_mode,
            block,
            delete,
            locked: false,
        }
    }

    /// Take the advisory lock.
    ///
    /// `block` overrides the configured default when given. A blocking call
    /// waits in the OS with no timeout. A non-blocking call on a held lock
    /// fails with [`LockStreamError::WouldBlock`] and leaves the stream
    /// untouched. A signal interrupting the wait fails with
    /// [`LockStreamError::Interrupted`]; the wait is not retried.
    pub fn lock(&mut self, block: Option<bool>) -> Result<()> {
        let block = block.unwrap_or(self.block);
        debug!("attempting {} lock on {:?} (block: {})", self.lock_mode, self, block);

        let result = {
            let file = self.inner.file().map_err(|_| LockStreamError::Closed)?;
            match (self.lock_mode, block) {
                (LockMode::Exclusive, true) => FileExt::lock_exclusive(file),
                (LockMode::Exclusive, false) => FileExt::try_lock_exclusive(file),
                (LockMode::Shared, true) => FileExt::lock_shared(file),
                (LockMode::Shared, false) => FileExt::try_lock_shared(file),
            }
        };

        match result {
            Ok(()) => {
                self.locked = true;
                debug!("lock acquired for {:?}", self);
                Ok(())
            }
            Err(err) => {
                debug!("lock attempt on {:?} failed: {}", self, err);
                Err(self.lock_error(err))
            }
        }
    }

    /// Release the advisory lock.
    ///
    /// Safe to call at any time: releasing a lock that is not held, or
    /// unlocking a closed stream, does nothing. OS failures are logged and
    /// never returned.
    pub fn unlock(&mut self) {
        if let Ok(file) = self.inner.file() {
            debug!("attempting to unlock {:?}", self);
            match FileExt::unlock(file) {
                Ok(()) => debug!("unlocked {:?}", self),
                Err(err) => warn!("failed to unlock {:?}: {}", self, err),
            }
        }
        self.locked = false;
    }

    /// Close the stream, releasing the descriptor and any lock on it.
    ///
    /// `delete` overrides the configured delete-on-close default. Deletion
    /// happens once, on the transition to closed, and is best-effort: a
    /// missing file, a refused unlink or an unknown path never fails the
    /// close. Buffered data that cannot be flushed is reported, but the
    /// stream is closed either way. Closing a closed stream does nothing.
    pub fn close(&mut self, delete: Option<bool>) -> Result<()> {
        if self.inner.is_closed() {
            return Ok(());
        }

        if delete.unwrap_or(self.delete) {
            self.remove_backing_file();
        }

        debug!("closing {:?}", self);
        let result = self.inner.close();
        self.locked = false;
        result.map_err(LockStreamError::from)
    }

    /// Lock with the default blocking behavior and return a scope guard.
    ///
    /// The guard dereferences to this stream. Dropping it flushes buffered
    /// writes and leaves the lock held; see the type-level docs.
    pub fn enter(&mut self) -> Result<LockScope<'_, S>> {
        self.lock(None)?;
        Ok(LockScope::new(self))
    }

    /// Scope exit: flush what the block wrote, keep the lock.
    pub(super) fn exit_scope(&mut self) {
        if self.inner.is_closed() {
            return;
        }
        if let Err(err) = self.inner.flush() {
            warn!("failed to flush {:?} on scope exit: {}", self, err);
        }
    }

    fn remove_backing_file(&self) {
        match self.inner.path() {
            Some(path) => match fs::remove_file(path) {
                Ok(()) => debug!("removed '{}' on close", path.display()),
                Err(err) => debug!("could not remove '{}' on close: {}", path.display(), err),
            },
            None => debug!("{:?} has no path to remove on close", self),
        }
    }

    pub(super) fn lock_error(&self, source: io::Error) -> LockStreamError {
        let path = self.inner.path().map(Path::to_path_buf);
        let contended = source.kind() == io::ErrorKind::WouldBlock
            || source.raw_os_error() == fs2::lock_contended_error().raw_os_error();

        if contended {
            LockStreamError::WouldBlock { path }
        } else if source.kind() == io::ErrorKind::Interrupted {
            LockStreamError::Interrupted { path }
        } else {
            LockStreamError::Lock { path, source }
        }
    }

    pub fn lock_mode(&self) -> LockMode {
        self.lock_mode
    }

    /// Whether this stream took the lock and has not released it since.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.path()
    }

    pub fn block_default(&self) -> bool {
        self.block
    }

    pub fn delete_on_close(&self) -> bool {
        self.delete
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

impl<S: Stream> Drop for LockedStream<S> {
    fn drop(&mut self) {
        if let Err(err) = self.close(None) {
            warn!("error while closing {:?} on drop: {}", self, err);
        }
    }
}

impl<S: Stream> fmt::Debug for LockedStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedStream")
            .field("path", &self.inner.path())
            .field("mode", &self.inner.mode().to_string())
            .field("lock_mode", &self.lock_mode)
            .field("locked", &self.locked)
            .field("closed", &self.inner.is_closed())
            .finish()
    }
}

impl<S: Stream> Read for LockedStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<S: Stream + BufRead> BufRead for LockedStream<S> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl<S: Stream> Write for LockedStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<S: Stream> Seek for LockedStream<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
