//! Saturating Recency Replacement.
//!
//! Each way carries an 8-bit counter that is bumped on every touch and reset
//! to 1 on fill. The probe nominates the valid way with the lowest counter as
//! the eviction candidate. When even that minimum has saturated, the counters
//! carry no ordering any more: every way is reset to 0 (the last accessed way
//! to 1) and the victim is drawn uniformly from the ways other than the last
//! accessed one.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `bump()`: O(1)
//!   - `select_replacement_or_reset()`: O(1), or O(W) on a reset
//!   - `select_replacement_sparing()`: O(W) when the spared way is the candidate
//! - **Space Complexity:** one byte per way
//! - **Best Case:** Working sets with clear reuse frequency differences
//! - **Worst Case:** Hot sets where every way saturates and the pick turns random

use tracing::debug;

use super::random::RandomSource;
use crate::common::constants::RECENCY_MAX;
use crate::core::units::cache::{CacheSet, Way};

/// Increments the recency of `way`, clamping at [`RECENCY_MAX`].
#[inline]
pub const fn bump(way: &mut Way) {
    way.recency = way.recency.saturating_add(1);
}

/// Confirms `candidate` as the victim of `set`, or runs the saturation reset.
///
/// Returns `candidate` unchanged unless its recency is saturated. On
/// saturation every way's recency is cleared (the last accessed way is set to
/// 1) and a way other than the last accessed one is drawn from `rng`. A
/// single-way set has no alternative and keeps `candidate`.
pub fn select_replacement_or_reset(
    set: &mut CacheSet,
    candidate: usize,
    rng: &mut dyn RandomSource,
) -> usize {
    select_replacement_sparing(set, candidate, None, rng)
}

/// Like [`select_replacement_or_reset`], but never returns `spare` while any
/// other way besides the last accessed one is available.
///
/// A `spare` candidate is replaced by the lowest-recency remaining way (ties
/// to the lowest index), and a saturation draw skips `spare` as well. When
/// `spare` is the last accessed way, or the set has no third way to fall
/// back on, the selection is the plain one.
pub fn select_replacement_sparing(
    set: &mut CacheSet,
    candidate: usize,
    spare: Option<usize>,
    rng: &mut dyn RandomSource,
) -> usize {
    let last = set.last_accessed;
    let spare = spare.filter(|&way| way != last && set.len() > 2);
    let excluded = |i: usize| i == last || Some(i) == spare;

    let candidate = match spare {
        Some(way) if way == candidate => set
            .ways
            .iter()
            .enumerate()
            .filter(|&(i, _)| !excluded(i))
            .min_by_key(|&(i, w)| (w.recency, i))
            .map_or(candidate, |(i, _)| i),
        _ => candidate,
    };

    if set.ways[candidate].recency != RECENCY_MAX {
        return candidate;
    }

    for (i, way) in set.ways.iter_mut().enumerate() {
        way.recency = u8::from(i == last);
    }

    let eligible = set.len() - 1 - usize::from(spare.is_some());
    if eligible == 0 {
        return candidate;
    }

    // Draw among the eligible ways, stepping over the excluded ones.
    let pick = rng.next_below(eligible);
    let victim = (0..set.len())
        .filter(|&i| !excluded(i))
        .nth(pick)
        .unwrap_or(candidate);
    debug!(candidate, victim, last, ?spare, "recency saturated, reset set");
    victim
}
