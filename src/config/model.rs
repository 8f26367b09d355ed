//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Defaults applied to every stream built with this configuration.
///
/// Passed explicitly to the factory and to `LockedStream::new`; nothing in
/// the library reads process-wide state. Unknown fields in the YAML are
/// ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Whether `lock()` waits for a held lock (default: true).
    #[serde(default = "default_true")]
    pub block: bool,

    /// Whether `close()` unlinks the backing file (default: false).
    #[serde(default)]
    pub delete: bool,

    // =========================================================================
    // Buffer settings
    // =========================================================================
    /// Buffering policy for the stream layers.
    #[serde(default)]
    pub buffering: Buffering,

    /// Flush text streams after every write containing a newline.
    #[serde(default)]
    pub line_buffering: bool,

    // =========================================================================
    // Text settings (rejected for binary modes when set)
    // =========================================================================
    /// Text encoding; UTF-8 when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    /// Decode error policy; strict when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<DecodeErrors>,

    /// Newline policy; universal when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newline: Option<Newline>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block: default_true(),
            delete: false,
            buffering: Buffering::default(),
            line_buffering: false,
            encoding: None,
            errors: None,
            newline: None,
        }
    }
}
