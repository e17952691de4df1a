//! Cache Replacement Policy.
//!
//! Implements the saturating-recency replacement used by both cache levels.
//!
//! # Components
//!
//! - `recency`: Per-way 8-bit counters, bumped on every touch, with a
//!   reset-and-randomize fallback once the counters saturate.
//! - `random`: The seeded pseudo-random source consumed by that fallback.

/// Saturating recency counters and victim selection.
pub mod recency;

/// Seeded pseudo-random source for replacement tie-breaks.
pub mod random;

pub use random::{RandomSource, Xorshift64};
pub use recency::{bump, select_replacement_or_reset, select_replacement_sparing};
