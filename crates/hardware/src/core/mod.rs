//! Cache hierarchy implementation.
//!
//! This module contains the cache building blocks and the engine that strings
//! them together: the L1 and L2 set-associative caches, the victim cache, the
//! replacement policy, and the access state machine with its write-back
//! cascade.

/// Access engine and L1-to-L2 write-back cascade.
pub mod hierarchy;

/// Cache units (set-associative cache, replacement policy, victim cache).
pub mod units;

pub use self::hierarchy::{CacheHierarchy, WritebackOutcome};
