//! Configuration model for lockstream.
//!
//! This module defines the Config struct holding the defaults a stream is
//! built with: blocking behavior, delete-on-close, buffering and text
//! options. It can be built in code or loaded from a YAML file. YAML parsing
//! is forward-compatible (unknown fields are ignored) and values are
//! validated on load.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::Config;
pub use types::{Buffering, DEFAULT_BUFFER_SIZE, DecodeErrors, Newline};
