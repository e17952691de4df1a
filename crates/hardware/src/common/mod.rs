//! Common types shared by every part of the cache simulator.
//!
//! This module provides the building blocks used by the caches, the access
//! engine and the trace driver:
//! 1. **Address Decoding:** Per-level bit masks and tag/index/offset extraction.
//! 2. **Constants:** Address width, recency saturation and victim cache bounds.
//! 3. **Access Types:** Classification of trace events (read or write).
//! 4. **Error Handling:** Setup, trace and simulation error types.

/// Address decomposition into tag, index and offset.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types for setup validation and trace ingestion.
pub mod error;

pub use addr::{BlockAddr, Geometry};
pub use constants::{ADDRESS_BITS, MAX_VICTIM_BLOCKS, RECENCY_MAX};
pub use data::AccessType;
pub use error::{ConfigError, Level, SimError, TraceError};
