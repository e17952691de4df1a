//! Simulator-wide constants.

/// Width of a trace address in bits.
pub const ADDRESS_BITS: u32 = 64;

/// Saturation value of the 8-bit per-way recency counter.
///
/// Once every candidate way of a set sits at this value the counter no longer
/// orders the ways and the replacement falls back to a random pick.
pub const RECENCY_MAX: u8 = u8::MAX;

/// Recency given to a block when it is installed or reloaded.
pub const RECENCY_FILL: u8 = 1;

/// Largest supported victim cache, in blocks.
pub const MAX_VICTIM_BLOCKS: u32 = 4;

/// Upper bound on `c - b` for a level (2^26 blocks per level).
///
/// Caps the memory allocated for one level's ways; geometries above it are
/// otherwise valid.
pub const MAX_BLOCK_BITS: u32 = 26;

/// Seed used when none is configured, or when a zero seed is supplied.
pub const DEFAULT_SEED: u64 = 123_456_789;
