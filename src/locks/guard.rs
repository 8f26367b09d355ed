//! Scope guard returned by `LockedStream::enter`.

use super::stream::LockedStream;
use crate::stream::Stream;
use std::ops::{Deref, DerefMut};

/// A locked stream borrowed for the duration of a block.
///
/// Entering the scope took the lock. Dropping the guard flushes buffered
/// writes and keeps the lock held: release it with `unlock()` or `close()`,
/// either inside the block through the guard or on the stream afterwards.
#[derive(Debug)]
pub struct LockScope<'a, S: Stream> {
    stream: &'a mut LockedStream<S>,
}

impl<'a, S: Stream> LockScope<'a, S> {
    pub(super) fn new(stream: &'a mut LockedStream<S>) -> Self {
        Self { stream }
    }
}

impl<S: Stream> Deref for LockScope<'_, S> {
    type Target = LockedStream<S>;

    fn deref(&self) -> &Self::Target {
        self.stream
    }
}

impl<S: Stream> DerefMut for LockScope<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stream
    }
}

impl<S: Stream> Drop for LockScope<'_, S> {
    fn drop(&mut self) {
        self.stream.exit_scope();
    }
}
