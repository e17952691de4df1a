//! L1-to-L2 write-back cascade.
//!
//! A dirty block leaving L1 becomes the authoritative copy in L2. Because L2
//! may use larger blocks and more sets, the block's L1 coordinates are
//! rebuilt into an address and decoded again at L2 granularity. The L2 side
//! then ends in exactly one of three ways: the block is already resident and
//! is marked dirty, it is installed in a free way, or it replaces the
//! recency-selected way, whose own dirty contents go to memory. That
//! replacement never takes the way holding the block the current access is
//! about to read from L2, unless the set has no other way to give up.

use tracing::trace;

use super::{Allocation, CacheHierarchy};
use crate::common::addr::BlockAddr;
use crate::core::units::cache::Probe;
use crate::core::units::cache::policies::bump;
use crate::stats::CacheStats;

/// How a write-back was absorbed by L2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WritebackOutcome {
    /// The block was resident in L2 and is now dirty there.
    Updated {
        /// L2 way holding the block.
        way: usize,
    },
    /// The block was installed in a free L2 way.
    Installed {
        /// L2 way filled.
        way: usize,
    },
    /// The block replaced a valid L2 way.
    Replaced {
        /// L2 way overwritten.
        way: usize,
        /// The overwritten block was dirty and went to memory.
        dirty_victim: bool,
    },
}

impl CacheHierarchy {
    /// Writes the dirty L1 block `evicted` (tag and L1 set index) into L2.
    ///
    /// Counts one L1 write-back and one L2 access, plus an L2 write miss when
    /// the block was not resident and an L2 write-back when the replaced L2
    /// block was dirty. The L1 way itself is left untouched.
    pub fn write_back(&mut self, evicted: BlockAddr, stats: &mut CacheStats) -> WritebackOutcome {
        self.write_back_sparing(evicted, None, stats)
    }

    /// Like [`CacheHierarchy::write_back`], but a replacement in L2 avoids the
    /// way holding `requested` (an L2 block address) if it is resident in the
    /// same set.
    pub fn write_back_sparing(
        &mut self,
        evicted: BlockAddr,
        requested: Option<BlockAddr>,
        stats: &mut CacheStats,
    ) -> WritebackOutcome {
        stats.write_back_l1 += 1;
        stats.accesses_l2 += 1;

        let addr = self.l1.geometry().compose(evicted);
        let target = self.l2.decode(addr);

        match self.l2.probe(target.index, target.tag) {
            Probe::Hit { way } => {
                let set = self.l2.set_mut(target.index);
                let resident = &mut set.ways[way];
                bump(resident);
                resident.dirty = true;
                resident.valid = true;
                set.last_accessed = way;
                WritebackOutcome::Updated { way }
            }
            Probe::MissWithFreeWay { way } => {
                stats.write_misses_l2 += 1;
                let (way, _) = self.allocate_l2(target, Allocation::Free(way), true, None, stats);
                WritebackOutcome::Installed { way }
            }
            Probe::MissNeedsEviction { candidate } => {
                stats.write_misses_l2 += 1;
                let spare = requested
                    .filter(|block| block.index == target.index)
                    .and_then(|block| match self.l2.probe(block.index, block.tag) {
                        Probe::Hit { way } => Some(way),
                        _ => None,
                    });
                let (way, dirty_victim) =
                    self.allocate_l2(target, Allocation::Evict(candidate), true, spare, stats);
                if spare.is_some() {
                    trace!(way, ?spare, "write-back spared the requested block");
                }
                WritebackOutcome::Replaced { way, dirty_victim }
            }
        }
    }
}
