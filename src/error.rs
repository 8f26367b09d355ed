//! Error types for lockstream.
//!
//! Uses thiserror for derive macros. Every variant maps to a CLI exit code.

use crate::exit_codes;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for lockstream operations.
#[derive(Error, Debug)]
pub enum LockStreamError {
    /// Bad construction parameters: invalid mode string, mutually exclusive
    /// options. Always raised before any file is opened.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A non-blocking lock attempt found the lock held elsewhere.
    #[error("lock is held elsewhere{}", describe(.path))]
    WouldBlock { path: Option<PathBuf> },

    /// A blocking lock wait was interrupted by a signal.
    #[error("interrupted while waiting for lock{}", describe(.path))]
    Interrupted { path: Option<PathBuf> },

    /// The backing file could not be opened. The source keeps the OS error
    /// kind (`NotFound`, `PermissionDenied`, ...).
    #[error("failed to open '{}': {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The OS refused the lock operation for a reason other than contention.
    #[error("failed to lock{}: {source}", describe(.path))]
    Lock {
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    /// The stream was already closed.
    #[error("I/O operation on closed stream")]
    Closed,

    /// Read, write, seek or flush failure from the stream layers.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl LockStreamError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LockStreamError::InvalidArgument(_) | LockStreamError::Config(_) => {
                exit_codes::USER_ERROR
            }
            LockStreamError::WouldBlock { .. } | LockStreamError::Lock { .. } => {
                exit_codes::LOCK_FAILURE
            }
            LockStreamError::Interrupted { .. } => exit_codes::INTERRUPTED,
            LockStreamError::Unavailable { .. }
            | LockStreamError::Closed
            | LockStreamError::Io(_) => exit_codes::IO_FAILURE,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        LockStreamError::InvalidArgument(message.into())
    }
}

fn describe(path: &Option<PathBuf>) -> String {
    path.as_deref()
        .map(|p: &Path| format!(" on '{}'", p.display()))
        .unwrap_or_default()
}

/// Result type alias for lockstream operations.
pub type Result<T> = std::result::Result<T, LockStreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_is_user_error() {
        let err = LockStreamError::invalid("invalid mode: 'rw'");
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert_eq!(err.to_string(), "invalid argument: invalid mode: 'rw'");
    }

    #[test]
    fn would_block_is_lock_failure() {
        let err = LockStreamError::WouldBlock {
            path: Some(PathBuf::from("/tmp/t.lock")),
        };
        assert_eq!(err.exit_code(), exit_codes::LOCK_FAILURE);
        assert_eq!(err.to_string(), "lock is held elsewhere on '/tmp/t.lock'");
    }

    #[test]
    fn would_block_without_path() {
        let err = LockStreamError::WouldBlock { path: None };
        assert_eq!(err.to_string(), "lock is held elsewhere");
    }

    #[test]
    fn interrupted_has_its_own_exit_code() {
        let err = LockStreamError::Interrupted { path: None };
        assert_eq!(err.exit_code(), exit_codes::INTERRUPTED);
    }

    #[test]
    fn unavailable_keeps_os_error_kind() {
        let err = LockStreamError::Unavailable {
            path: PathBuf::from("/missing"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.exit_code(), exit_codes::IO_FAILURE);
        assert!(err.to_string().starts_with("failed to open '/missing'"));
        match err {
            LockStreamError::Unavailable { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn io_errors_convert() {
        let err: LockStreamError = io::Error::other("disk on fire").into();
        assert!(matches!(err, LockStreamError::Io(_)));
        assert_eq!(err.to_string(), "disk on fire");
    }
}
