//! Two-Level Cache Hierarchy Engine.
//!
//! This module resolves one trace access at a time against L1, the optional
//! victim cache and L2, backed by an unmodelled infinite memory. It performs:
//! 1. **L1 lookup:** Decodes the address and probes the L1 set.
//! 2. **Miss handling:** Fills a free way, or evicts a recency-selected way
//!    after consulting the victim cache.
//! 3. **L2 lookup and fill:** Copies an L2 hit into L1, or allocates the block
//!    in both levels on an L2 miss.
//! 4. **Write-back:** Propagates dirty L1 evictions into L2 (see [`writeback`]),
//!    counting L2's own dirty evictions to memory.
//!
//! Every access runs to completion before the next one starts.

/// L1-to-L2 write-back cascade.
pub mod writeback;

use std::fmt;

use tracing::{debug, trace};

pub use self::writeback::WritebackOutcome;
use crate::common::addr::BlockAddr;
use crate::common::data::AccessType;
use crate::common::error::ConfigError;
use crate::config::CacheHierarchyConfig;
use crate::core::units::cache::policies::{
    RandomSource, Xorshift64, bump, select_replacement_or_reset, select_replacement_sparing,
};
use crate::core::units::cache::victim::VictimCache;
use crate::core::units::cache::{Cache, Probe};
use crate::stats::CacheStats;

/// Where an L2 allocation lands.
#[derive(Clone, Copy, Debug)]
enum Allocation {
    /// An invalid way; nothing is evicted.
    Free(usize),
    /// A full set; the way is chosen from this recency candidate.
    Evict(usize),
}

/// Owned simulator state: both cache levels, the victim cache and the
/// replacement tie-break generator.
pub struct CacheHierarchy {
    l1: Cache,
    l2: Cache,
    victim: Option<VictimCache>,
    rng: Box<dyn RandomSource>,
}

impl fmt::Debug for CacheHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHierarchy")
            .field("l1", self.l1.geometry())
            .field("l2", self.l2.geometry())
            .field("victim_blocks", &self.victim.as_ref().map_or(0, VictimCache::len))
            .finish_non_exhaustive()
    }
}

impl CacheHierarchy {
    /// Validates `config` and allocates both caches and the victim cache,
    /// every block invalid.
    ///
    /// # Errors
    ///
    /// Returns the violated setup invariant; nothing is allocated in that case.
    pub fn new(config: &CacheHierarchyConfig) -> Result<Self, ConfigError> {
        Self::with_random_source(config, Box::new(Xorshift64::new(config.seed)))
    }

    /// Like [`CacheHierarchy::new`], drawing replacement tie-breaks from `rng`
    /// instead of a generator seeded from `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns the violated setup invariant.
    pub fn with_random_source(
        config: &CacheHierarchyConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let l1 = Cache::new(&config.l1);
        let l2 = Cache::new(&config.l2);
        let victim = VictimCache::new(config.victim_blocks as usize);

        debug!(
            l1_sets = l1.geometry().num_sets,
            l1_ways = l1.geometry().ways_per_set,
            l1_block = l1.geometry().block_bytes,
            l2_sets = l2.geometry().num_sets,
            l2_ways = l2.geometry().ways_per_set,
            l2_block = l2.geometry().block_bytes,
            victim_blocks = config.victim_blocks,
            "cache hierarchy ready"
        );

        Ok(Self { l1, l2, victim, rng })
    }

    /// First-level cache.
    pub const fn l1(&self) -> &Cache {
        &self.l1
    }

    /// Second-level cache.
    pub const fn l2(&self) -> &Cache {
        &self.l2
    }

    /// Victim cache, if configured.
    pub const fn victim(&self) -> Option<&VictimCache> {
        self.victim.as_ref()
    }

    /// Resolves one access, updating cache state and `stats` in place.
    pub fn access(&mut self, access: AccessType, addr: u64, stats: &mut CacheStats) {
        stats.accesses += 1;
        match access {
            AccessType::Read => stats.reads += 1,
            AccessType::Write => stats.writes += 1,
        }

        let block = self.l1.decode(addr);
        match self.l1.probe(block.index, block.tag) {
            Probe::Hit { way } => {
                let set = self.l1.set_mut(block.index);
                let hit = &mut set.ways[way];
                bump(hit);
                if access.is_write() {
                    hit.dirty = true;
                }
                set.last_accessed = way;
                trace!(%access, addr, index = block.index, way, "l1 hit");
            }
            Probe::MissWithFreeWay { way } => {
                Self::count_l1_miss(access, stats);
                trace!(%access, addr, index = block.index, way, "l1 miss, free way");
                self.fill_from_l2(access, addr, block, way, stats);
            }
            Probe::MissNeedsEviction { candidate } => {
                Self::count_l1_miss(access, stats);
                self.evict_and_fill(access, addr, block, candidate, stats);
            }
        }
    }

    /// Completion call: computes the derived rates. Cache state is untouched.
    pub fn complete(&self, stats: &mut CacheStats) {
        stats.complete();
    }

    const fn count_l1_miss(access: AccessType, stats: &mut CacheStats) {
        match access {
            AccessType::Read => stats.read_misses_l1 += 1,
            AccessType::Write => stats.write_misses_l1 += 1,
        }
    }

    /// Handles an L1 miss on a full set.
    ///
    /// The evicted way is written back first if dirty, sparing the requested
    /// block's L2 way when the block is about to be read from L2. A victim cache hit
    /// then swaps the two blocks; otherwise the evicted block is parked in
    /// the victim cache and the requested block comes from L2.
    fn evict_and_fill(
        &mut self,
        access: AccessType,
        addr: u64,
        block: BlockAddr,
        candidate: usize,
        stats: &mut CacheStats,
    ) {
        let way = select_replacement_or_reset(
            self.l1.set_mut(block.index),
            candidate,
            self.rng.as_mut(),
        );
        let evicted = self.l1.set(block.index).ways[way];
        let evicted_block = BlockAddr {
            tag: evicted.tag,
            index: block.index,
        };
        let geometry = *self.l1.geometry();
        let evicted_composite = geometry.composite_tag(evicted_block);

        let found = match &self.victim {
            Some(vc) => {
                stats.accesses_vc += 1;
                vc.search(geometry.composite_tag(block)).found
            }
            None => None,
        };

        if evicted.dirty {
            // Without a victim hit the requested block is fetched from L2
            // next, so the write-back must not displace it.
            let requested = found.is_none().then(|| self.l2.decode(addr));
            let outcome = self.write_back_sparing(evicted_block, requested, stats);
            trace!(?outcome, tag = evicted.tag, index = block.index, "l1 write-back");
        }

        if let Some(vc) = self.victim.as_mut() {
            if let Some(slot) = found {
                stats.victim_hits += 1;
                let set = self.l1.set_mut(block.index);
                vc.exchange(slot, evicted_composite, &mut set.ways[way], block.tag, access);
                set.last_accessed = way;
                trace!(%access, addr, index = block.index, way, slot, "victim hit");
                return;
            }
            let _slot = vc.insert(evicted_composite);
        }

        trace!(%access, addr, index = block.index, way, "l1 miss, evicted");
        self.fill_from_l2(access, addr, block, way, stats);
    }

    /// Brings `addr` from L2 (or memory, through L2) into L1 way `l1_way`.
    fn fill_from_l2(
        &mut self,
        access: AccessType,
        addr: u64,
        l1_block: BlockAddr,
        l1_way: usize,
        stats: &mut CacheStats,
    ) {
        stats.accesses_l2 += 1;
        let target = self.l2.decode(addr);

        let dirty = match self.l2.probe(target.index, target.tag) {
            Probe::Hit { way } => {
                let set = self.l2.set_mut(target.index);
                let hit = &mut set.ways[way];
                bump(hit);
                set.last_accessed = way;
                trace!(index = target.index, way, "l2 hit");
                set.ways[way].dirty || access.is_write()
            }
            Probe::MissWithFreeWay { way } => {
                self.fetch_into_l2(access, target, Allocation::Free(way), stats)
            }
            Probe::MissNeedsEviction { candidate } => {
                self.fetch_into_l2(access, target, Allocation::Evict(candidate), stats)
            }
        };

        let set = self.l1.set_mut(l1_block.index);
        set.ways[l1_way].fill(l1_block.tag, dirty);
        set.last_accessed = l1_way;
    }

    /// Handles an L2 miss of a primary access: the block comes from memory
    /// into L2 clean. Returns the dirty bit the L1 copy gets.
    fn fetch_into_l2(
        &mut self,
        access: AccessType,
        target: BlockAddr,
        allocation: Allocation,
        stats: &mut CacheStats,
    ) -> bool {
        match access {
            AccessType::Read => stats.read_misses_l2 += 1,
            AccessType::Write => stats.write_misses_l2 += 1,
        }
        let (way, dirty_victim) = self.allocate_l2(target, allocation, false, None, stats);
        trace!(index = target.index, way, dirty_victim, "l2 miss, filled from memory");
        access.is_write()
    }

    /// Installs `target` in L2 and returns the way used, and whether a dirty
    /// block was evicted from it.
    ///
    /// On a full set the way comes from the recency policy, which avoids the
    /// `spare` way when it can; evicting a dirty block counts one write-back
    /// to memory.
    fn allocate_l2(
        &mut self,
        target: BlockAddr,
        allocation: Allocation,
        dirty: bool,
        spare: Option<usize>,
        stats: &mut CacheStats,
    ) -> (usize, bool) {
        let set = self.l2.set_mut(target.index);
        let (way, dirty_victim) = match allocation {
            Allocation::Free(way) => (way, false),
            Allocation::Evict(candidate) => {
                let way = select_replacement_sparing(set, candidate, spare, self.rng.as_mut());
                let dirty_victim = set.ways[way].dirty;
                if dirty_victim {
                    stats.write_back_l2 += 1;
                }
                (way, dirty_victim)
            }
        };
        set.ways[way].fill(target.tag, dirty);
        set.last_accessed = way;
        (way, dirty_victim)
    }
}
