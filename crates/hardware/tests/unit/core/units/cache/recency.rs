//! Recency Replacement Tests.
//!
//! Verifies the saturating recency counters, the reset performed when the
//! chosen candidate has saturated and the random re-selection that follows.

use cachesim_core::common::RECENCY_MAX;
use cachesim_core::core::units::cache::policies::{
    RandomSource, Xorshift64, bump, select_replacement_or_reset, select_replacement_sparing,
};
use cachesim_core::core::units::cache::{CacheSet, Way};
use mockall::predicate::eq;
use proptest::prelude::*;

use crate::common::MockRng;

fn full_set(recency: &[u8], last: usize) -> CacheSet {
    CacheSet {
        ways: recency
            .iter()
            .enumerate()
            .map(|(i, &recency)| Way {
                tag: i as u64,
                valid: true,
                dirty: false,
                recency,
            })
            .collect(),
        last_accessed: last,
    }
}

fn recencies(set: &CacheSet) -> Vec<u8> {
    set.ways.iter().map(|w| w.recency).collect()
}

// ══════════════════════════════════════════════════════════
// 1. Counters
// ══════════════════════════════════════════════════════════

#[test]
fn bump_saturates() {
    let mut way = Way {
        recency: RECENCY_MAX - 1,
        ..Way::default()
    };
    bump(&mut way);
    assert_eq!(way.recency, RECENCY_MAX);
    bump(&mut way);
    assert_eq!(way.recency, RECENCY_MAX);
}

#[test]
fn fill_resets_recency() {
    let mut way = Way {
        tag: 1,
        valid: true,
        dirty: true,
        recency: 200,
    };
    way.fill(9, false);
    assert_eq!(
        way,
        Way {
            tag: 9,
            valid: true,
            dirty: false,
            recency: 1
        }
    );
}

// ══════════════════════════════════════════════════════════
// 2. Selection
// ══════════════════════════════════════════════════════════

/// An unsaturated candidate is used as is, without drawing.
#[test]
fn unsaturated_candidate_is_kept() {
    let mut rng = MockRng::new();
    let _expectation = rng.expect_next_below().never();
    let mut set = full_set(&[254, 255, 3, 255], 1);

    assert_eq!(select_replacement_or_reset(&mut set, 0, &mut rng), 0);
    assert_eq!(recencies(&set), vec![254, 255, 3, 255]);
}

/// A saturated candidate resets the set and draws among the other ways;
/// a draw at or above the last accessed way skips over it.
#[test]
fn saturated_candidate_resets_and_skips_last() {
    let mut rng = MockRng::new();
    let _expectation = rng
        .expect_next_below()
        .with(eq(3))
        .times(1)
        .return_const(2usize);
    let mut set = full_set(&[255; 4], 2);

    assert_eq!(select_replacement_or_reset(&mut set, 0, &mut rng), 3);
    assert_eq!(recencies(&set), vec![0, 0, 1, 0]);
}

#[test]
fn saturated_draw_below_last_is_used_directly() {
    let mut rng = MockRng::new();
    let _expectation = rng
        .expect_next_below()
        .with(eq(3))
        .times(1)
        .return_const(1usize);
    let mut set = full_set(&[255; 4], 2);

    assert_eq!(select_replacement_or_reset(&mut set, 0, &mut rng), 1);
}

/// A single-way set has nothing to draw from: it resets and evicts its only way.
#[test]
fn saturated_single_way() {
    let mut rng = MockRng::new();
    let _expectation = rng.expect_next_below().never();
    let mut set = full_set(&[255], 0);

    assert_eq!(select_replacement_or_reset(&mut set, 0, &mut rng), 0);
    assert_eq!(recencies(&set), vec![1]);
}

// ══════════════════════════════════════════════════════════
// 3. Sparing a way
// ══════════════════════════════════════════════════════════

/// A spared candidate gives way to the next-lowest recency.
#[test]
fn spared_candidate_falls_to_next_lowest() {
    let mut rng = MockRng::new();
    let _expectation = rng.expect_next_below().never();
    let mut set = full_set(&[5, 1, 2, 2], 0);

    assert_eq!(select_replacement_sparing(&mut set, 1, Some(1), &mut rng), 2);
}

/// A saturation draw skips both the last accessed and the spared way.
#[test]
fn saturated_draw_skips_spared_way() {
    let mut rng = MockRng::new();
    let _expectation = rng
        .expect_next_below()
        .with(eq(2))
        .times(1)
        .return_const(1usize);
    let mut set = full_set(&[255; 4], 0);

    assert_eq!(select_replacement_sparing(&mut set, 1, Some(2), &mut rng), 3);
    assert_eq!(recencies(&set), vec![1, 0, 0, 0]);
}

/// With two ways the only non-last way is the spared one: it is evicted.
#[test]
fn two_way_set_cannot_spare() {
    let mut rng = MockRng::new();
    let _expectation = rng.expect_next_below().never();
    let mut set = full_set(&[1, 1], 0);

    assert_eq!(select_replacement_sparing(&mut set, 1, Some(1), &mut rng), 1);
}

#[test]
fn sparing_nothing_matches_plain_selection() {
    let mut rng = MockRng::new();
    let _expectation = rng.expect_next_below().never();
    let mut set = full_set(&[4, 3, 9, 7], 2);

    assert_eq!(select_replacement_sparing(&mut set, 1, None, &mut rng), 1);
    assert_eq!(select_replacement_sparing(&mut set, 1, Some(2), &mut rng), 1);
}

// ══════════════════════════════════════════════════════════
// 4. Tie-break generator
// ══════════════════════════════════════════════════════════

#[test]
fn xorshift_is_deterministic() {
    let mut a = Xorshift64::new(42);
    let mut b = Xorshift64::new(42);
    for _ in 0..100 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

/// Zero is a fixed point of xorshift and is replaced by the default seed.
#[test]
fn zero_seed_uses_default() {
    let mut zero = Xorshift64::new(0);
    let mut default = Xorshift64::default();
    for _ in 0..4 {
        let value = zero.next_u64();
        assert_ne!(value, 0);
        assert_eq!(value, default.next_u64());
    }
}

proptest! {
    #[test]
    fn draws_stay_in_range(seed in any::<u64>(), bound in 1usize..64) {
        let mut rng = Xorshift64::new(seed);
        for _ in 0..32 {
            prop_assert!(rng.next_below(bound) < bound);
        }
    }

    /// Whatever the draw, a saturated multi-way set never evicts its last
    /// accessed way.
    #[test]
    fn reset_never_evicts_last(seed in any::<u64>(), s in 1u32..5, last_seed in any::<usize>()) {
        let ways = 1usize << s;
        let last = last_seed % ways;
        let mut set = full_set(&vec![RECENCY_MAX; ways], last);
        let candidate = usize::from(last == 0);
        let mut rng = Xorshift64::new(seed);

        let victim = select_replacement_or_reset(&mut set, candidate, &mut rng);
        prop_assert!(victim < ways);
        prop_assert_ne!(victim, last);
        prop_assert_eq!(set.ways[last].recency, 1);
    }

    /// With at least four ways, neither the last accessed nor the spared way
    /// is ever chosen.
    #[test]
    fn sparing_avoids_last_and_spare(
        seed in any::<u64>(),
        s in 2u32..5,
        raw in prop::collection::vec(250u8..=255, 16),
        picks in any::<(usize, usize, usize)>(),
    ) {
        let ways = 1usize << s;
        let last = picks.0 % ways;
        let spare = (last + 1 + picks.1 % (ways - 1)) % ways;
        let candidate = (last + 1 + picks.2 % (ways - 1)) % ways;
        let mut set = full_set(&raw[..ways], last);
        let mut rng = Xorshift64::new(seed);

        let victim = select_replacement_sparing(&mut set, candidate, Some(spare), &mut rng);
        prop_assert_ne!(victim, last);
        prop_assert_ne!(victim, spare);
    }
}
