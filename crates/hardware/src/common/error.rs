//! Error definitions for the cache simulator.
//!
//! This module defines every user-visible failure of the simulator. It provides:
//! 1. **Setup Errors:** Geometry invariant violations detected before any cache is allocated.
//! 2. **Trace Errors:** Malformed trace lines and I/O failures while reading a trace.
//! 3. **Simulation Errors:** A single error type for drivers that set up and run a trace.
//!
//! Cache accesses themselves never fail once the geometry is valid.

use std::io;

use thiserror::Error;

use super::constants::{MAX_BLOCK_BITS, MAX_VICTIM_BLOCKS};

/// Cache level named in an error message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// First-level cache.
    L1,
    /// Second-level cache.
    L2,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
        }
    }
}

/// Geometry invariant violated at setup.
///
/// These are never clamped: a bad configuration is rejected before any cache
/// state is allocated.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The victim cache holds more blocks than supported.
    #[error("victim cache size {0} exceeds the maximum of {max} blocks", max = MAX_VICTIM_BLOCKS)]
    VictimCacheTooLarge(u32),

    /// `c < b + s`: the level would have zero sets.
    #[error("{level}: capacity 2^{c} cannot hold 2^{s} ways of 2^{b}-byte blocks (need c >= b + s)")]
    NoSets {
        /// Offending level.
        level: Level,
        /// Capacity exponent.
        c: u32,
        /// Block-size exponent.
        b: u32,
        /// Set-size exponent.
        s: u32,
    },

    /// `c - s >= 64`: no tag bits would remain in a 64-bit address.
    #[error("{level}: c - s = {width} leaves no tag bits in a 64-bit address")]
    NoTagBits {
        /// Offending level.
        level: Level,
        /// Combined index and offset width.
        width: u32,
    },

    /// `c - b` exceeds the supported number of blocks per level.
    ///
    /// This is an allocation guard on the per-level block array, not a
    /// geometry invariant: such a level would be well formed but too large
    /// to simulate.
    #[error("{level}: 2^{bits} blocks exceeds the supported maximum of 2^{max}", max = MAX_BLOCK_BITS)]
    TooManyBlocks {
        /// Offending level.
        level: Level,
        /// `c - b`.
        bits: u32,
    },

    /// An L2 exponent is smaller than the matching L1 exponent.
    #[error("L2 {param}{l2} is smaller than L1 {param}{l1} (L2 must be at least L1 in c, b and s)")]
    L2SmallerThanL1 {
        /// Parameter name (`c`, `b` or `s`).
        param: &'static str,
        /// L1 value.
        l1: u32,
        /// L2 value.
        l2: u32,
    },
}

/// Failure while reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A line could not be parsed as `<op> <address>`.
    #[error("trace line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Human-readable cause.
        reason: String,
    },

    /// The underlying reader failed.
    #[error("trace read failed at line {line}")]
    Io {
        /// 1-based line number of the failed read.
        line: usize,
        /// Source error.
        #[source]
        source: io::Error,
    },
}

/// Top-level error of a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Setup rejected the configuration.
    #[error("invalid cache configuration: {0}")]
    Config(#[from] ConfigError),

    /// The trace could not be read.
    #[error(transparent)]
    Trace(#[from] TraceError),
}
