//! Lock mode definitions.

use std::fmt;

/// Kind of advisory lock a stream takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// At most one holder; conflicts with every other lock on the file.
    Exclusive,
    /// Any number of shared holders; conflicts with exclusive locks.
    Shared,
}

impl LockMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockMode::Exclusive => "exclusive",
            LockMode::Shared => "shared",
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
