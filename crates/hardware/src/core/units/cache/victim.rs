//! Victim Cache.
//!
//! A tiny fully associative buffer of single-block slots sitting beside L1.
//! Blocks evicted from L1 are parked here under an index-qualified tag (see
//! [`Geometry::composite_tag`](crate::common::addr::Geometry::composite_tag))
//! so that a conflict miss can swap them back without touching L2.
//!
//! The buffer holds no dirty state: dirty L1 blocks are written back to L2
//! before they are parked.

use tracing::trace;

use crate::common::data::AccessType;
use crate::core::units::cache::Way;

/// One victim cache slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VictimEntry {
    /// Composite tag of the parked block.
    pub tag: u64,
    /// Slot holds nothing.
    pub empty: bool,
}

impl Default for VictimEntry {
    fn default() -> Self {
        Self {
            tag: 0,
            empty: true,
        }
    }
}

/// Result of a victim cache search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VictimSearch {
    /// Slot holding the searched tag.
    pub found: Option<usize>,
    /// First empty slot seen before the scan stopped.
    pub first_empty: Option<usize>,
}

/// Fully associative victim cache with one block per slot.
#[derive(Clone, Debug)]
pub struct VictimCache {
    entries: Vec<VictimEntry>,
}

impl VictimCache {
    /// Creates a victim cache of `blocks` empty slots.
    ///
    /// Returns `None` for a zero-sized cache: callers then skip the victim
    /// cache entirely.
    pub fn new(blocks: usize) -> Option<Self> {
        (blocks > 0).then(|| Self {
            entries: vec![VictimEntry::default(); blocks],
        })
    }

    /// Number of slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: a constructed victim cache has at least one slot.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view of the slots.
    pub fn entries(&self) -> &[VictimEntry] {
        &self.entries
    }

    /// Returns `true` if a non-empty slot holds `composite`.
    pub fn contains(&self, composite: u64) -> bool {
        self.entries.iter().any(|e| !e.empty && e.tag == composite)
    }

    /// Looks up `composite`, stopping at the first match.
    ///
    /// Empty slots never match, whatever tag they last held.
    pub fn search(&self, composite: u64) -> VictimSearch {
        let mut first_empty = None;
        for (slot, entry) in self.entries.iter().enumerate() {
            if entry.empty {
                first_empty = first_empty.or(Some(slot));
            } else if entry.tag == composite {
                return VictimSearch {
                    found: Some(slot),
                    first_empty,
                };
            }
        }
        VictimSearch {
            found: None,
            first_empty,
        }
    }

    /// Parks `composite` in the first empty slot, or in slot 0 when full.
    ///
    /// Returns the slot written.
    pub fn insert(&mut self, composite: u64) -> usize {
        let slot = self.entries.iter().position(|e| e.empty).unwrap_or(0);
        self.entries[slot] = VictimEntry {
            tag: composite,
            empty: false,
        };
        trace!(slot, composite, "victim cache insert");
        slot
    }

    /// Swaps an L1 block with the block parked in `slot`.
    ///
    /// The block leaving L1 is parked under `evicted_composite`. The L1 way
    /// receives `requested_tag` with a fresh recency, dirty only for writes.
    /// The caller must already have written the outgoing block back if it
    /// was dirty, and must mark `way` as the set's last accessed way.
    pub fn exchange(
        &mut self,
        slot: usize,
        evicted_composite: u64,
        way: &mut Way,
        requested_tag: u64,
        access: AccessType,
    ) {
        trace!(
            slot,
            incoming = self.entries[slot].tag,
            outgoing = evicted_composite,
            "victim cache exchange"
        );
        self.entries[slot] = VictimEntry {
            tag: evicted_composite,
            empty: false,
        };
        way.fill(requested_tag, access.is_write());
    }
}
