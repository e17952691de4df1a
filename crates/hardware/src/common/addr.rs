//! Address decomposition for one cache level.
//!
//! This module turns a raw 64-bit trace address into the coordinates a cache
//! level works with. It provides the following:
//! 1. **Geometry:** Set/way/block counts and the tag, index and offset bit
//!    widths derived from the `(c, b, s)` exponents.
//! 2. **Masks:** Precomputed bit masks over the 64-bit address space, built
//!    once at setup and immutable afterwards.
//! 3. **Decoding:** Extraction of `(tag, index)` and the reverse composition
//!    used by the write-back cascade and the victim cache.

use crate::common::constants::ADDRESS_BITS;
use crate::config::LevelConfig;

/// Block coordinates of an address inside one cache level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockAddr {
    /// Tag bits, right-aligned.
    pub tag: u64,
    /// Set index.
    pub index: usize,
}

/// Immutable geometry and address masks of one cache level.
///
/// Built from a validated [`LevelConfig`]; every derived count is a power of
/// two and at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Offset field width (`b`).
    pub offset_bits: u32,
    /// Index field width (`c - b - s`).
    pub index_bits: u32,
    /// Tag field width (`64 - (c - s)`).
    pub tag_bits: u32,
    /// Mask selecting the offset field.
    pub offset_mask: u64,
    /// Mask selecting the index field, in place.
    pub index_mask: u64,
    /// Mask selecting the tag field, in place.
    pub tag_mask: u64,
    /// Number of sets (`2^(c-b-s)`).
    pub num_sets: usize,
    /// Ways per set (`2^s`).
    pub ways_per_set: usize,
    /// Block size in bytes (`2^b`).
    pub block_bytes: u64,
}

impl Geometry {
    /// Derives the geometry of a level.
    ///
    /// The caller must have validated `level` (see
    /// [`CacheHierarchyConfig::validate`](crate::config::CacheHierarchyConfig::validate)):
    /// `c >= b + s` and `c - s < 64`.
    pub fn new(level: &LevelConfig) -> Self {
        let offset_bits = level.b;
        let index_bits = level.c - level.b - level.s;
        let tag_shift = offset_bits + index_bits;

        let offset_mask = low_mask(offset_bits);
        let index_mask = low_mask(index_bits) << offset_bits;
        let tag_mask = !low_mask(tag_shift);

        Self {
            offset_bits,
            index_bits,
            tag_bits: ADDRESS_BITS - tag_shift,
            offset_mask,
            index_mask,
            tag_mask,
            num_sets: 1usize << index_bits,
            ways_per_set: 1usize << level.s,
            block_bytes: 1u64 << offset_bits,
        }
    }

    /// Bit position of the least significant tag bit.
    #[inline(always)]
    pub const fn tag_shift(&self) -> u32 {
        self.offset_bits + self.index_bits
    }

    /// Splits `addr` into its tag and set index.
    #[inline(always)]
    pub const fn decode(&self, addr: u64) -> BlockAddr {
        BlockAddr {
            tag: (addr & self.tag_mask) >> self.tag_shift(),
            index: ((addr & self.index_mask) >> self.offset_bits) as usize,
        }
    }

    /// Byte offset of `addr` within its block.
    #[inline(always)]
    pub const fn offset(&self, addr: u64) -> u64 {
        addr & self.offset_mask
    }

    /// Rebuilds the block-aligned address of `block` (offset bits zero).
    #[inline(always)]
    pub const fn compose(&self, block: BlockAddr) -> u64 {
        (block.tag << self.tag_shift()) | ((block.index as u64) << self.offset_bits)
    }

    /// Index-qualified tag used by the fully associative victim cache.
    ///
    /// The set index is appended below the tag so that blocks from different
    /// sets never share a stored tag.
    #[inline(always)]
    pub const fn composite_tag(&self, block: BlockAddr) -> u64 {
        (block.tag << self.index_bits) | block.index as u64
    }
}

/// Mask of the `bits` least significant bits; `bits` may be 0..=64.
#[inline(always)]
const fn low_mask(bits: u32) -> u64 {
    if bits >= ADDRESS_BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
