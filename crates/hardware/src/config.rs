//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize the
//! hierarchy. It provides:
//! 1. **Defaults:** Baseline geometry constants for L1, L2 and the victim cache.
//! 2. **Structures:** Per-level `(c, b, s)` exponents and the hierarchy config.
//! 3. **Validation:** The setup invariants checked before any cache is allocated.
//!
//! Configuration is supplied as JSON (see the `cachesim` CLI `--config` flag)
//! or built with `CacheHierarchyConfig::default()`.

use serde::{Deserialize, Serialize};

use crate::common::constants::{ADDRESS_BITS, DEFAULT_SEED, MAX_BLOCK_BITS, MAX_VICTIM_BLOCKS};
use crate::common::error::{ConfigError, Level};

/// Default configuration constants for the simulator.
mod defaults {
    /// L1 capacity exponent (4 KiB).
    pub const C1: u32 = 12;
    /// L1 block-size exponent (32-byte blocks).
    pub const B1: u32 = 5;
    /// L1 set-size exponent (8 ways).
    pub const S1: u32 = 3;

    /// Victim cache size in blocks.
    pub const V: u32 = 3;

    /// L2 capacity exponent (32 KiB).
    pub const C2: u32 = 15;
    /// L2 block-size exponent (64-byte blocks).
    pub const B2: u32 = 6;
    /// L2 set-size exponent (32 ways).
    pub const S2: u32 = 5;
}

/// Geometry exponents of one cache level.
///
/// The level stores `2^c` bytes in `2^b`-byte blocks, grouped `2^s` blocks
/// per set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Capacity exponent
    pub c: u32,
    /// Block-size exponent
    pub b: u32,
    /// Set-size exponent (associativity)
    pub s: u32,
}

impl LevelConfig {
    /// Creates a level from its three exponents.
    pub const fn new(c: u32, b: u32, s: u32) -> Self {
        Self { c, b, s }
    }

    /// Default L1 geometry.
    pub const fn default_l1() -> Self {
        Self::new(defaults::C1, defaults::B1, defaults::S1)
    }

    /// Default L2 geometry.
    pub const fn default_l2() -> Self {
        Self::new(defaults::C2, defaults::B2, defaults::S2)
    }

    fn validate(&self, level: Level) -> Result<(), ConfigError> {
        let Self { c, b, s } = *self;
        if b.checked_add(s).is_none_or(|bs| c < bs) {
            return Err(ConfigError::NoSets { level, c, b, s });
        }
        if c - s >= ADDRESS_BITS {
            return Err(ConfigError::NoTagBits { level, width: c - s });
        }
        // Allocation cap, not a geometry rule.
        if c - b > MAX_BLOCK_BITS {
            return Err(ConfigError::TooManyBlocks { level, bits: c - b });
        }
        Ok(())
    }
}

/// Root configuration of the cache hierarchy.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{CacheHierarchyConfig, LevelConfig};
///
/// let json = r#"{
///     "l1": { "c": 10, "b": 4, "s": 0 },
///     "l2": { "c": 12, "b": 4, "s": 1 },
///     "victim_blocks": 2
/// }"#;
///
/// let config: CacheHierarchyConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.l1, LevelConfig::new(10, 4, 0));
/// assert_eq!(config.victim_blocks, 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheHierarchyConfig {
    /// First-level cache geometry
    #[serde(default = "LevelConfig::default_l1")]
    pub l1: LevelConfig,

    /// Second-level cache geometry
    #[serde(default = "LevelConfig::default_l2")]
    pub l2: LevelConfig,

    /// Victim cache size in blocks (0 disables it)
    #[serde(default = "CacheHierarchyConfig::default_victim_blocks")]
    pub victim_blocks: u32,

    /// Seed for the replacement tie-break generator
    #[serde(default = "CacheHierarchyConfig::default_seed")]
    pub seed: u64,
}

impl CacheHierarchyConfig {
    /// Returns the default victim cache size in blocks.
    const fn default_victim_blocks() -> u32 {
        defaults::V
    }

    /// Returns the default random seed.
    const fn default_seed() -> u64 {
        DEFAULT_SEED
    }

    /// Builds a configuration from the classic `(c1, b1, s1, v, c2, b2, s2)`
    /// parameter list, with the default seed.
    pub const fn from_params(c1: u32, b1: u32, s1: u32, v: u32, c2: u32, b2: u32, s2: u32) -> Self {
        Self {
            l1: LevelConfig::new(c1, b1, s1),
            l2: LevelConfig::new(c2, b2, s2),
            victim_blocks: v,
            seed: DEFAULT_SEED,
        }
    }

    /// Checks every setup invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: victim cache larger than four
    /// blocks, a level with no sets or no tag bits, a level too large to
    /// allocate, or an L2 exponent smaller than its L1 counterpart.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.victim_blocks > MAX_VICTIM_BLOCKS {
            return Err(ConfigError::VictimCacheTooLarge(self.victim_blocks));
        }
        self.l1.validate(Level::L1)?;
        self.l2.validate(Level::L2)?;

        for (param, l1, l2) in [
            ("c", self.l1.c, self.l2.c),
            ("b", self.l1.b, self.l2.b),
            ("s", self.l1.s, self.l2.s),
        ] {
            if l2 < l1 {
                return Err(ConfigError::L2SmallerThanL1 { param, l1, l2 });
            }
        }
        Ok(())
    }
}

impl Default for CacheHierarchyConfig {
    fn default() -> Self {
        Self {
            l1: LevelConfig::default_l1(),
            l2: LevelConfig::default_l2(),
            victim_blocks: defaults::V,
            seed: DEFAULT_SEED,
        }
    }
}
