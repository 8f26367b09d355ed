//! Exit code constants for the lockstream CLI.
//!
//! - 0: Success
//! - 1: User error (bad mode string, bad options, bad config)
//! - 2: I/O failure (open, read, write, flush)
//! - 3: Blocking lock wait interrupted by a signal
//! - 4: Lock could not be acquired

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: invalid mode, mutually exclusive options, or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// I/O failure: the file could not be opened, read, written or flushed.
pub const IO_FAILURE: i32 = 2;

/// A blocking lock wait was interrupted by a signal.
pub const INTERRUPTED: i32 = 3;

/// Lock acquisition failure: contention on a non-blocking attempt, or an OS lock error.
pub const LOCK_FAILURE: i32 = 4;
