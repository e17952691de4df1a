//! Simulator: owns the cache hierarchy and runs traces through it.
//!
//! Wraps the three calls of the hierarchy (setup, access, completion) so a
//! driver only has to supply a configuration and a trace.

use std::io::BufRead;

use tracing::{debug, info};

use super::trace::{TraceEvent, TraceReader};
use crate::common::data::AccessType;
use crate::common::error::{ConfigError, SimError};
use crate::config::CacheHierarchyConfig;
use crate::core::CacheHierarchy;
use crate::stats::CacheStats;

/// Top-level simulator: cache state plus the statistics it produces.
#[derive(Debug)]
pub struct Simulator {
    /// Cache hierarchy under simulation.
    pub hierarchy: CacheHierarchy,
    /// Counters accumulated so far.
    pub stats: CacheStats,
}

impl Simulator {
    /// Sets up a simulator for `config`.
    ///
    /// # Errors
    ///
    /// Returns the violated setup invariant.
    pub fn new(config: &CacheHierarchyConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_hierarchy(CacheHierarchy::new(config)?))
    }

    /// Wraps an already built hierarchy, with zeroed statistics.
    pub fn from_hierarchy(hierarchy: CacheHierarchy) -> Self {
        Self {
            hierarchy,
            stats: CacheStats::default(),
        }
    }

    /// Resolves one access.
    pub fn access(&mut self, access: AccessType, addr: u64) {
        self.hierarchy.access(access, addr, &mut self.stats);
    }

    /// Resolves one trace event.
    pub fn step(&mut self, event: TraceEvent) {
        self.access(event.access, event.addr);
    }

    /// Computes the derived rates.
    pub fn complete(&mut self) {
        self.hierarchy.complete(&mut self.stats);
    }

    /// Feeds every event of a text trace, then runs the completion call.
    ///
    /// Returns a copy of the final statistics.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed line or read failure. Events before it
    /// have already been applied.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<CacheStats, SimError> {
        let mut events = TraceReader::new(reader);
        for event in events.by_ref() {
            self.step(event?);
        }
        debug!(lines = events.lines_read(), "trace exhausted");

        self.complete();
        info!(
            accesses = self.stats.accesses,
            l1_misses = self.stats.misses_l1(),
            l2_misses = self.stats.misses_l2(),
            victim_hits = self.stats.victim_hits,
            "simulation complete"
        );
        Ok(self.stats.clone())
    }
}
