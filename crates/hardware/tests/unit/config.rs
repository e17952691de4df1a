//! Configuration Tests.
//!
//! Verifies the defaults, the setup invariants enforced by `validate` and
//! loading a hierarchy from JSON.

use cachesim_core::common::{ConfigError, Level};
use cachesim_core::config::{CacheHierarchyConfig, LevelConfig};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn defaults_are_valid() {
    let config = CacheHierarchyConfig::default();

    assert_eq!(config.l1, LevelConfig::new(12, 5, 3));
    assert_eq!(config.l2, LevelConfig::new(15, 6, 5));
    assert_eq!(config.victim_blocks, 3);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn from_params_matches_fields() {
    let config = CacheHierarchyConfig::from_params(10, 4, 0, 2, 12, 4, 1);

    assert_eq!(config.l1, LevelConfig::new(10, 4, 0));
    assert_eq!(config.l2, LevelConfig::new(12, 4, 1));
    assert_eq!(config.victim_blocks, 2);
    assert_eq!(config.seed, CacheHierarchyConfig::default().seed);
}

// ══════════════════════════════════════════════════════════
// 2. Setup invariants
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::victim_too_large(
    CacheHierarchyConfig::from_params(12, 5, 3, 5, 15, 6, 5),
    ConfigError::VictimCacheTooLarge(5)
)]
#[case::l1_without_sets(
    CacheHierarchyConfig::from_params(4, 4, 1, 0, 15, 6, 5),
    ConfigError::NoSets { level: Level::L1, c: 4, b: 4, s: 1 }
)]
#[case::l2_without_tag_bits(
    CacheHierarchyConfig::from_params(12, 5, 3, 0, 64, 40, 0),
    ConfigError::NoTagBits { level: Level::L2, width: 64 }
)]
#[case::l1_too_many_blocks(
    CacheHierarchyConfig::from_params(40, 4, 0, 0, 40, 4, 0),
    ConfigError::TooManyBlocks { level: Level::L1, bits: 36 }
)]
#[case::l2_smaller_capacity(
    CacheHierarchyConfig::from_params(12, 5, 3, 0, 11, 5, 3),
    ConfigError::L2SmallerThanL1 { param: "c", l1: 12, l2: 11 }
)]
#[case::l2_smaller_blocks(
    CacheHierarchyConfig::from_params(12, 5, 3, 0, 15, 4, 3),
    ConfigError::L2SmallerThanL1 { param: "b", l1: 5, l2: 4 }
)]
#[case::l2_less_associative(
    CacheHierarchyConfig::from_params(12, 5, 3, 0, 15, 6, 2),
    ConfigError::L2SmallerThanL1 { param: "s", l1: 3, l2: 2 }
)]
fn rejects_invalid_geometry(#[case] config: CacheHierarchyConfig, #[case] expected: ConfigError) {
    assert_eq!(config.validate(), Err(expected));
}

#[rstest]
#[case::no_victim_cache(CacheHierarchyConfig::from_params(12, 5, 3, 0, 15, 6, 5))]
#[case::max_victim_cache(CacheHierarchyConfig::from_params(12, 5, 3, 4, 15, 6, 5))]
#[case::equal_levels(CacheHierarchyConfig::from_params(10, 4, 0, 1, 10, 4, 0))]
#[case::single_block(CacheHierarchyConfig::from_params(4, 4, 0, 0, 4, 4, 0))]
#[case::fully_associative(CacheHierarchyConfig::from_params(8, 4, 4, 2, 10, 4, 6))]
fn accepts_boundary_geometry(#[case] config: CacheHierarchyConfig) {
    assert_eq!(config.validate(), Ok(()));
}

/// `b + s` overflowing `u32` is reported as a level without sets.
#[test]
fn huge_exponents_do_not_overflow() {
    let config = CacheHierarchyConfig::from_params(12, u32::MAX, 1, 0, 15, 6, 5);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NoSets { level: Level::L1, .. })
    ));
}

/// The block-count cap sits just above 2^26 blocks per level, independent
/// of the other geometry rules: `c = 32, b = 5` is well formed but too big.
#[test]
fn block_count_cap_is_an_allocation_limit() {
    let at_cap = CacheHierarchyConfig::from_params(31, 5, 0, 0, 31, 5, 0);
    assert_eq!(at_cap.validate(), Ok(()));

    let over_cap = CacheHierarchyConfig::from_params(32, 5, 0, 0, 32, 5, 0);
    let err = over_cap.validate().unwrap_err();
    assert_eq!(err, ConfigError::TooManyBlocks { level: Level::L1, bits: 27 });
    assert!(err.to_string().contains("2^27 blocks"), "got: {err}");
}

// ══════════════════════════════════════════════════════════
// 3. JSON
// ══════════════════════════════════════════════════════════

#[test]
fn json_fills_missing_fields_with_defaults() {
    let config: CacheHierarchyConfig =
        serde_json::from_str(r#"{ "victim_blocks": 0 }"#).unwrap();

    assert_eq!(
        config,
        CacheHierarchyConfig {
            victim_blocks: 0,
            ..CacheHierarchyConfig::default()
        }
    );
}

#[test]
fn json_round_trip() {
    let config = CacheHierarchyConfig {
        seed: 42,
        ..CacheHierarchyConfig::from_params(10, 4, 0, 2, 12, 4, 1)
    };
    let text = serde_json::to_string(&config).unwrap();
    let back: CacheHierarchyConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, config);
}

#[test]
fn json_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hierarchy.json");
    std::fs::write(
        &path,
        r#"{ "l1": { "c": 10, "b": 4, "s": 0 }, "l2": { "c": 12, "b": 4, "s": 1 }, "victim_blocks": 2 }"#,
    )
    .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let config: CacheHierarchyConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(config, CacheHierarchyConfig::from_params(10, 4, 0, 2, 12, 4, 1));
}
