//! Set-Associative Cache Model.
//!
//! This module implements one level of a set-associative cache that tracks
//! only tags and state bits (no payload). It provides:
//! 1. **Storage:** Owned, bounds-checked sets of ways created invalid at setup.
//! 2. **Set Probe:** Associative search returning a tagged [`Probe`] outcome.
//! 3. **Replacement:** Saturating recency counters with a randomized reset
//!    (see [`policies`]).
//! 4. **Victim Cache:** A small fully associative buffer behind L1 (see [`victim`]).

/// Recency replacement policy and its random tie-break source.
pub mod policies;

/// Fully associative victim cache.
pub mod victim;

use crate::common::addr::{BlockAddr, Geometry};
use crate::common::constants::RECENCY_FILL;
use crate::config::LevelConfig;

/// One block slot of a set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Way {
    /// Stored tag (meaningful only when `valid`).
    pub tag: u64,
    /// Slot holds a block.
    pub valid: bool,
    /// Block was modified since it was brought into this level.
    pub dirty: bool,
    /// Saturating recency counter.
    pub recency: u8,
}

impl Way {
    /// Installs a fresh block: valid, recency reset to the fill value.
    #[inline]
    pub const fn fill(&mut self, tag: u64, dirty: bool) {
        self.tag = tag;
        self.valid = true;
        self.dirty = dirty;
        self.recency = RECENCY_FILL;
    }
}

/// A cache set (line): its ways and the way touched last.
#[derive(Clone, Debug)]
pub struct CacheSet {
    /// Ways of the set, in way order.
    pub ways: Vec<Way>,
    /// Way filled or hit most recently; never chosen for eviction or reuse
    /// while another choice exists.
    pub last_accessed: usize,
}

impl CacheSet {
    fn new(ways: usize) -> Self {
        Self {
            ways: vec![Way::default(); ways],
            last_accessed: 0,
        }
    }

    /// Number of ways in the set.
    #[inline]
    pub const fn len(&self) -> usize {
        self.ways.len()
    }

    /// `true` when the set has no ways (never the case for a built cache).
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.ways.is_empty()
    }

    /// Searches the set for `tag`.
    ///
    /// Invalid ways are free; among valid ways the one with the lowest
    /// recency (lowest way number on ties) is the eviction candidate. The
    /// last accessed way is skipped for both roles unless it is the only way
    /// that qualifies. The scan stops at the first tag match.
    pub fn probe(&self, tag: u64) -> Probe {
        let last = self.last_accessed;
        let mut free: Option<usize> = None;
        let mut last_is_free = false;
        let mut candidate: Option<usize> = None;

        for (i, way) in self.ways.iter().enumerate() {
            if !way.valid {
                if i == last {
                    last_is_free = true;
                } else if free.is_none() {
                    free = Some(i);
                }
                continue;
            }
            if way.tag == tag {
                return Probe::Hit { way: i };
            }
            if i != last && candidate.is_none_or(|c| way.recency < self.ways[c].recency) {
                candidate = Some(i);
            }
        }

        if let Some(way) = free.or_else(|| last_is_free.then_some(last)) {
            return Probe::MissWithFreeWay { way };
        }

        // A full set always yields a candidate: either some way other than
        // the last accessed one, or the last accessed way of a 1-way set.
        debug_assert!(candidate.is_some() || self.ways.len() == 1);
        Probe::MissNeedsEviction {
            candidate: candidate.unwrap_or(last),
        }
    }
}

/// Outcome of a set probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// Tag present in `way`.
    Hit {
        /// Way holding the tag.
        way: usize,
    },
    /// Tag absent; `way` is invalid and can be filled without eviction.
    MissWithFreeWay {
        /// Free way to fill.
        way: usize,
    },
    /// Tag absent and every way is valid.
    MissNeedsEviction {
        /// Least recent way, before the saturation check.
        candidate: usize,
    },
}

/// One cache level: geometry plus `num_sets` sets of `ways_per_set` ways.
#[derive(Clone, Debug)]
pub struct Cache {
    geometry: Geometry,
    sets: Vec<CacheSet>,
}

impl Cache {
    /// Allocates a level with every way invalid.
    ///
    /// `level` must already be validated.
    pub fn new(level: &LevelConfig) -> Self {
        let geometry = Geometry::new(level);
        Self {
            sets: (0..geometry.num_sets)
                .map(|_| CacheSet::new(geometry.ways_per_set))
                .collect(),
            geometry,
        }
    }

    /// Geometry and masks of this level.
    #[inline]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Tag and set index of `addr` at this level.
    #[inline]
    pub const fn decode(&self, addr: u64) -> BlockAddr {
        self.geometry.decode(addr)
    }

    /// Probes the set `index` for `tag`.
    #[inline]
    pub fn probe(&self, index: usize, tag: u64) -> Probe {
        self.sets[index].probe(tag)
    }

    /// Shared view of a set.
    #[inline]
    pub fn set(&self, index: usize) -> &CacheSet {
        &self.sets[index]
    }

    /// Mutable view of a set.
    #[inline]
    pub fn set_mut(&mut self, index: usize) -> &mut CacheSet {
        &mut self.sets[index]
    }

    /// Returns `true` if `addr`'s block is resident at this level.
    pub fn contains(&self, addr: u64) -> bool {
        let block = self.decode(addr);
        matches!(self.probe(block.index, block.tag), Probe::Hit { .. })
    }

    /// Returns the resident way holding `addr`, if any.
    pub fn lookup(&self, addr: u64) -> Option<&Way> {
        let block = self.decode(addr);
        match self.probe(block.index, block.tag) {
            Probe::Hit { way } => Some(&self.sets[block.index].ways[way]),
            _ => None,
        }
    }

    /// Number of valid ways across the whole level.
    pub fn occupancy(&self) -> usize {
        self.sets
            .iter()
            .map(|set| set.ways.iter().filter(|w| w.valid).count())
            .sum()
    }
}
