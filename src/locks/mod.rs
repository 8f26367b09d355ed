//! Locking subsystem for lockstream.
//!
//! This module implements the lock-aware stream: a wrapper that owns a
//! stream layer and takes a whole-file advisory lock on its descriptor.
//!
//! # Lock Modes
//!
//! The mode is derived once, from the stream's open mode:
//! - write, append or update (`+`) opens take an **exclusive** lock
//! - read-only opens take a **shared** lock
//!
//! # Lifecycle
//!
//! - `lock()` blocks or fails fast with `WouldBlock`, per call or per default
//! - `unlock()` never fails and may be called at any time
//! - `close()` is idempotent, optionally unlinks the file first, and releases
//!   the lock by closing the descriptor
//! - `enter()` locks and returns a scope guard; leaving the scope does not
//!   unlock
//!
//! Locks are advisory: they only exclude processes that use the same
//! discipline on the same file.

mod guard;
mod stream;
mod types;


// Re-export public API
pub use guard::LockScope;
pub use stream::LockedStream;
pub use types::LockMode;
