//! Open modes: what a stream was opened for, and which lock that implies.

use crate::error::{LockStreamError, Result};
use crate::locks::LockMode;
use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

/// Primary access direction of an open mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// `r`: read an existing file.
    Read,
    /// `w`: create or truncate, then write.
    Write,
    /// `a`: create if missing, write at the end.
    Append,
}

/// Whether a stream carries text or raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    #[default]
    Text,
    Binary,
}

/// A validated open intent.
///
/// Parsed from the familiar mode strings (`"r"`, `"a+"`, `"wb"`, ...). Only
/// consistent combinations can be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    pub access: Access,
    /// `+`: open for both reading and writing.
    pub update: bool,
    pub kind: Kind,
}

impl OpenMode {
    pub const fn new(access: Access, update: bool, kind: Kind) -> Self {
        Self {
            access,
            update,
            kind,
        }
    }

    pub fn readable(&self) -> bool {
        self.access == Access::Read || self.update
    }

    pub fn writable(&self) -> bool {
        self.access != Access::Read || self.update
    }

    pub fn is_binary(&self) -> bool {
        self.kind == Kind::Binary
    }

    /// Lock taken by streams opened with this mode: anything that may write
    /// is exclusive, read-only is shared.
    pub fn lock_mode(&self) -> LockMode {
        if self.writable() {
            LockMode::Exclusive
        } else {
            LockMode::Shared
        }
    }

    pub(crate) fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self.access {
            Access::Read => {
                options.read(true);
            }
            Access::Write => {
                options.write(true).create(true).truncate(true);
            }
            Access::Append => {
                options.append(true).create(true);
            }
        }
        if self.update {
            options.read(true).write(true);
        }
        options
    }
}

impl FromStr for OpenMode {
    type Err = LockStreamError;

    fn from_str(mode: &str) -> Result<Self> {
        let invalid = || LockStreamError::invalid(format!("invalid mode: '{mode}'"));

        let (mut reading, mut writing, mut appending) = (false, false, false);
        let (mut updating, mut text, mut binary, mut universal) = (false, false, false, false);

        for c in mode.chars() {
            let flag = match c {
                'r' => &mut reading,
                'w' => &mut writing,
                'a' => &mut appending,
                '+' => &mut updating,
                't' => &mut text,
                'b' => &mut binary,
                'U' => &mut universal,
                _ => return Err(invalid()),
            };
            if *flag {
                return Err(invalid());
            }
            *flag = true;
        }

        if universal {
            if writing || appending {
                return Err(LockStreamError::invalid(
                    "can't use U and writing mode at once",
                ));
            }
            reading = true;
        }
        if text && binary {
            return Err(LockStreamError::invalid(
                "can't have text and binary mode at once",
            ));
        }

        let access = match (reading, writing, appending) {
            (true, false, false) => Access::Read,
            (false, true, false) => Access::Write,
            (false, false, true) => Access::Append,
            (false, false, false) => {
                return Err(LockStreamError::invalid(
                    "must have exactly one of read/write/append mode",
                ));
            }
            _ => {
                return Err(LockStreamError::invalid(
                    "can't have read/write/append mode at once",
                ));
            }
        };
        let kind = if binary { Kind::Binary } else { Kind::Text };

        Ok(Self::new(access, updating, kind))
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let access = match self.access {
            Access::Read => "r",
            Access::Write => "w",
            Access::Append => "a",
        };
        f.write_str(access)?;
        if self.update {
            f.write_str("+")?;
        }
        if self.is_binary() {
            f.write_str("b")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(mode: &str) -> OpenMode {
        mode.parse().unwrap()
    }

    fn parse_err(mode: &str) -> String {
        match mode.parse::<OpenMode>() {
            Err(LockStreamError::InvalidArgument(message)) => message,
            other => panic!("expected InvalidArgument for {mode:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_basic_modes() {
        assert_eq!(parse("r"), OpenMode::new(Access::Read, false, Kind::Text));
        assert_eq!(parse("wb"), OpenMode::new(Access::Write, false, Kind::Binary));
        assert_eq!(parse("a+"), OpenMode::new(Access::Append, true, Kind::Text));
        assert_eq!(parse("r+b"), OpenMode::new(Access::Read, true, Kind::Binary));
        assert_eq!(parse("bw"), parse("wb"));
        assert_eq!(parse("rt"), parse("r"));
    }

    #[test]
    fn test_universal_flag_implies_read() {
        assert_eq!(parse("U"), OpenMode::new(Access::Read, false, Kind::Text));
        assert_eq!(parse("rU"), parse("r"));
        assert_eq!(parse_err("wU"), "can't use U and writing mode at once");
        assert_eq!(parse_err("aU"), "can't use U and writing mode at once");
    }

    #[test]
    fn test_rejects_unknown_and_repeated_characters() {
        assert_eq!(parse_err("rx"), "invalid mode: 'rx'");
        assert_eq!(parse_err("rr"), "invalid mode: 'rr'");
        assert_eq!(parse_err("w++"), "invalid mode: 'w++'");
    }

    #[test]
    fn test_rejects_conflicting_flags() {
        assert_eq!(parse_err("rtb"), "can't have text and binary mode at once");
        assert_eq!(parse_err("rw"), "can't have read/write/append mode at once");
        assert_eq!(parse_err("wa"), "can't have read/write/append mode at once");
        assert_eq!(parse_err(""), "must have exactly one of read/write/append mode");
        assert_eq!(parse_err("+b"), "must have exactly one of read/write/append mode");
    }

    #[test]
    fn test_lock_mode_derivation() {
        assert_eq!(parse("r").lock_mode(), LockMode::Shared);
        assert_eq!(parse("rb").lock_mode(), LockMode::Shared);
        assert_eq!(parse("r+").lock_mode(), LockMode::Exclusive);
        assert_eq!(parse("w").lock_mode(), LockMode::Exclusive);
        assert_eq!(parse("a").lock_mode(), LockMode::Exclusive);
        assert_eq!(parse("ab").lock_mode(), LockMode::Exclusive);
    }

    #[test]
    fn test_readable_writable() {
        assert!(parse("r").readable() && !parse("r").writable());
        assert!(!parse("w").readable() && parse("w").writable());
        assert!(parse("a+").readable() && parse("a+").writable());
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(parse("b+r").to_string(), "r+b");
        assert_eq!(parse("U").to_string(), "r");
        assert_eq!(parse("at").to_string(), "a");
    }
}
