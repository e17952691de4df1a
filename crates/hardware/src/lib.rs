//! Trace-driven cache hierarchy simulator library.
//!
//! This crate models a two-level set-associative cache hierarchy with an
//! optional victim cache, tracking tags and state bits only:
//! 1. **Common:** Address decoding, access types, constants and errors.
//! 2. **Configuration:** Per-level `(c, b, s)` geometry, victim cache size and seed.
//! 3. **Core:** L1/L2 caches, recency replacement, victim cache, the access
//!    engine and its write-back cascade.
//! 4. **Simulation:** Trace reader and simulator driver.
//! 5. **Statistics:** Hit/miss/write-back counters and derived rates.

/// Common types and constants (address geometry, access types, errors).
pub mod common;
/// Simulator configuration (defaults, geometry, validation).
pub mod config;
/// Cache hierarchy (caches, replacement, victim cache, access engine).
pub mod core;
/// Trace reader and simulator driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `CacheHierarchyConfig::default()` or deserialize from JSON.
pub use crate::config::CacheHierarchyConfig;
/// Cache hierarchy state and access engine.
pub use crate::core::CacheHierarchy;
/// Trace-driven simulator wrapping a hierarchy and its statistics.
pub use crate::sim::Simulator;
/// Statistics record mutated by every access.
pub use crate::stats::CacheStats;
