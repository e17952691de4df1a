//! Random Tie-Break Source.
//!
//! The replacement fallback draws a way uniformly at random once recency no
//! longer discriminates. The draw comes from a generator seeded once when the
//! hierarchy is built and never reseeded, so a given seed always replays the
//! same run. A simple xorshift generator is enough here.

use crate::common::constants::DEFAULT_SEED;

/// Source of uniformly distributed way numbers.
pub trait RandomSource: Send + Sync {
    /// Returns a value in `0..bound`. `bound` is never zero.
    fn next_below(&mut self, bound: usize) -> usize;
}

/// 64-bit xorshift generator.
#[derive(Clone, Debug)]
pub struct Xorshift64 {
    /// Internal state; never zero.
    state: u64,
}

impl Xorshift64 {
    /// Creates a generator; a zero seed is replaced by the default seed.
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    /// Advances the generator and returns the next raw value.
    pub const fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl Default for Xorshift64 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomSource for Xorshift64 {
    fn next_below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        (self.next_u64() % bound as u64) as usize
    }
}
