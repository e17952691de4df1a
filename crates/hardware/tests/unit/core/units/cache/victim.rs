//! Victim Cache Tests.
//!
//! Verifies slot search, insertion order, the slot-0 overwrite when full and
//! the exchange of an L1 block with a parked one.

use cachesim_core::common::AccessType;
use cachesim_core::core::units::cache::Way;
use cachesim_core::core::units::cache::victim::{VictimCache, VictimEntry, VictimSearch};

fn parked(tag: u64) -> VictimEntry {
    VictimEntry { tag, empty: false }
}

#[test]
fn zero_blocks_disables_the_cache() {
    assert!(VictimCache::new(0).is_none());
}

#[test]
fn starts_empty() {
    let vc = VictimCache::new(3).unwrap();
    assert_eq!(vc.len(), 3);
    assert!(!vc.is_empty());
    assert!(vc.entries().iter().all(|e| e.empty));
}

/// An empty slot never matches, not even composite tag 0.
#[test]
fn empty_slots_never_match() {
    let vc = VictimCache::new(2).unwrap();
    assert_eq!(
        vc.search(0),
        VictimSearch {
            found: None,
            first_empty: Some(0)
        }
    );
    assert!(!vc.contains(0));
}

#[test]
fn inserts_fill_slots_in_order() {
    let mut vc = VictimCache::new(3).unwrap();
    assert_eq!(vc.insert(10), 0);
    assert_eq!(vc.insert(11), 1);
    assert_eq!(vc.insert(12), 2);
    assert_eq!(vc.entries(), &[parked(10), parked(11), parked(12)]);
}

/// A full cache overwrites slot 0.
#[test]
fn full_cache_overwrites_slot_zero() {
    let mut vc = VictimCache::new(2).unwrap();
    let _a = vc.insert(1);
    let _b = vc.insert(2);

    assert_eq!(vc.insert(3), 0);
    assert_eq!(vc.entries(), &[parked(3), parked(2)]);
    assert!(!vc.contains(1));
}

#[test]
fn search_finds_parked_block() {
    let mut vc = VictimCache::new(4).unwrap();
    let _a = vc.insert(7);
    let _b = vc.insert(8);

    assert_eq!(
        vc.search(8),
        VictimSearch {
            found: Some(1),
            first_empty: None
        }
    );
    assert_eq!(
        vc.search(9),
        VictimSearch {
            found: None,
            first_empty: Some(2)
        }
    );
}

/// The outgoing L1 block takes the slot; the incoming one lands in the way
/// with a fresh recency, dirty only for writes.
#[test]
fn exchange_swaps_blocks() {
    let mut vc = VictimCache::new(2).unwrap();
    let slot = vc.insert(0x55);
    let mut way = Way {
        tag: 0x3,
        valid: true,
        dirty: true,
        recency: 40,
    };

    vc.exchange(slot, 0x66, &mut way, 0x5, AccessType::Read);

    assert_eq!(vc.entries()[slot], parked(0x66));
    assert_eq!(
        way,
        Way {
            tag: 0x5,
            valid: true,
            dirty: false,
            recency: 1
        }
    );

    vc.exchange(slot, 0x77, &mut way, 0x6, AccessType::Write);
    assert!(way.dirty);
}
