//! Memory Access Types.
//!
//! This module defines the classification of trace events. The access type
//! drives two things in the engine:
//! 1. **Statistics:** Selecting the read or write flavour of every counter.
//! 2. **Dirty State:** Writes mark the L1 copy of a block as modified.

use std::fmt;
use std::str::FromStr;

/// Type of memory access operation carried by a trace event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Data read access.
    Read,

    /// Data write access.
    ///
    /// Marks the L1 block dirty; dirtiness reaches L2 only through a later
    /// L1 write-back.
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }

    /// Maps a trace opcode character (`r`/`R`, `w`/`W`) to an access type.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'r' | 'R' => Some(Self::Read),
            'w' | 'W' => Some(Self::Write),
            _ => None,
        }
    }
}

impl FromStr for AccessType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| format!("unknown access type `{s}`")),
            _ => Err(format!("unknown access type `{s}`")),
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "r"),
            Self::Write => write!(f, "w"),
        }
    }
}
