//! Configuration types and defaults for lockstream.
//!
//! This module defines the enums and default value functions used by the
//! Config struct.

use crate::error::{LockStreamError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size of the buffer used when the file system does not report a block size.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Buffering policy for streams built by the factory.
///
/// In YAML this is either one of the names `default`, `unbuffered`, `line`,
/// or an integer: `0` is unbuffered, `1` is line buffering, anything larger
/// is a buffer size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "BufferingRepr", into = "BufferingRepr")]
pub enum Buffering {
    /// Block-size buffer; line buffering when the file is a terminal.
    #[default]
    Default,
    /// No buffering layer at all (binary mode only).
    Unbuffered,
    /// Block-size buffer with line buffering.
    Line,
    /// Explicit buffer size in bytes.
    Size(usize),
}

impl FromStr for Buffering {
    type Err = LockStreamError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Self::Default),
            "unbuffered" | "0" => Ok(Self::Unbuffered),
            "line" | "1" => Ok(Self::Line),
            other => other
                .parse::<usize>()
                .map(Self::Size)
                .map_err(|_| LockStreamError::invalid(format!("invalid buffering: '{other}'"))),
        }
    }
}

impl fmt::Display for Buffering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Buffering::Default => f.write_str("default"),
            Buffering::Unbuffered => f.write_str("unbuffered"),
            Buffering::Line => f.write_str("line"),
            Buffering::Size(size) => write!(f, "{size}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum BufferingRepr {
    Size(usize),
    Name(String),
}

impl TryFrom<BufferingRepr> for Buffering {
    type Error = LockStreamError;

    fn try_from(repr: BufferingRepr) -> Result<Self> {
        match repr {
            BufferingRepr::Size(0) => Ok(Buffering::Unbuffered),
            BufferingRepr::Size(1) => Ok(Buffering::Line),
            BufferingRepr::Size(size) => Ok(Buffering::Size(size)),
            BufferingRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Buffering> for BufferingRepr {
    fn from(buffering: Buffering) -> Self {
        match buffering {
            Buffering::Size(size) => BufferingRepr::Size(size),
            other => BufferingRepr::Name(other.to_string()),
        }
    }
}

/// What a text stream does with bytes that are not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecodeErrors {
    /// Fail the read with `InvalidData` (default).
    #[default]
    Strict,
    /// Substitute U+FFFD for each invalid sequence.
    Replace,
    /// Drop invalid sequences.
    Ignore,
}

impl FromStr for DecodeErrors {
    type Err = LockStreamError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(Self::Strict),
            "replace" => Ok(Self::Replace),
            "ignore" => Ok(Self::Ignore),
            other => Err(LockStreamError::invalid(format!(
                "invalid errors policy: '{other}'"
            ))),
        }
    }
}

/// Newline handling for text streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Newline {
    /// Reading turns `\r\n` and `\r` into `\n`; writing leaves `\n` alone.
    #[default]
    Universal,
    /// No translation in either direction.
    Untranslated,
    /// Lines end with `\n`; no translation.
    Lf,
    /// Lines end with `\r`; writing turns `\n` into `\r`.
    Cr,
    /// Lines end with `\r\n`; writing turns `\n` into `\r\n`.
    Crlf,
}

impl Newline {
    /// Terminator written in place of `\n`, if it differs.
    pub(crate) fn write_terminator(self) -> Option<&'static [u8]> {
        match self {
            Newline::Cr => Some(b"\r"),
            Newline::Crlf => Some(b"\r\n"),
            Newline::Universal | Newline::Untranslated | Newline::Lf => None,
        }
    }
}

impl FromStr for Newline {
    type Err = LockStreamError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "universal" => Ok(Self::Universal),
            "" | "untranslated" => Ok(Self::Untranslated),
            "\n" | "lf" => Ok(Self::Lf),
            "\r" | "cr" => Ok(Self::Cr),
            "\r\n" | "crlf" => Ok(Self::Crlf),
            other => Err(LockStreamError::invalid(format!(
                "illegal newline value: {other:?}"
            ))),
        }
    }
}

/// Whether `name` spells an encoding that text streams support.
pub fn is_supported_encoding(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().replace('_', "-").as_str(),
        "utf-8" | "utf8"
    )
}

// Default value functions for serde
pub(crate) fn default_true() -> bool {
    true
}
