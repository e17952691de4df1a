//! Cache units.
//!
//! This module contains the per-level components used by the hierarchy: the
//! set-associative cache with its set probe, the recency replacement policy,
//! and the victim cache.

/// Set-associative cache, replacement policy and victim cache.
pub mod cache;
