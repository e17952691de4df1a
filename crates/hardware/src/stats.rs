//! Simulation statistics collection and reporting.
//!
//! This module tracks the aggregate behaviour of the cache hierarchy. It provides:
//! 1. **Access mix:** Total accesses split into reads and writes.
//! 2. **L1 and L2:** Read/write misses, L2 accesses and write-backs per level.
//! 3. **Victim cache:** Searches and hits.
//! 4. **Derived rates:** Miss and hit rates filled in by the completion call.
//!
//! The engine only increments counters; it never reads them back to make a
//! decision.

use std::io::{self, Write};

use serde::Serialize;

/// Rates derived from the raw counters once the trace is exhausted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DerivedStats {
    /// L1 misses per access.
    pub l1_miss_rate: f64,
    /// L1 misses that the victim cache did not absorb, per access.
    pub l1_effective_miss_rate: f64,
    /// L2 misses per L2 access.
    pub l2_miss_rate: f64,
    /// Victim cache hits per victim cache search.
    pub victim_hit_rate: f64,
}

/// Cache hierarchy statistics.
///
/// Owned by the caller and mutated in place by every access.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Trace events processed.
    pub accesses: u64,
    /// Trace reads.
    pub reads: u64,
    /// Trace writes. L1 write-backs into L2 are not counted here; see
    /// `write_back_l1`.
    pub writes: u64,
    /// Reads that missed L1.
    pub read_misses_l1: u64,
    /// Writes that missed L1.
    pub write_misses_l1: u64,
    /// L2 probes, from primary misses and from L1 write-backs.
    pub accesses_l2: u64,
    /// Primary reads that missed L2.
    pub read_misses_l2: u64,
    /// Primary writes and L1 write-backs that missed L2.
    pub write_misses_l2: u64,
    /// Dirty blocks written back from L1 to L2.
    pub write_back_l1: u64,
    /// Dirty blocks written back from L2 to memory.
    pub write_back_l2: u64,
    /// Victim cache searches.
    pub accesses_vc: u64,
    /// Victim cache searches that found the block.
    pub victim_hits: u64,

    /// Rates computed by the completion call.
    pub derived: DerivedStats,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"l1"`, `"victim"`, `"l2"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "l1", "victim", "l2"];

/// `num / den`, or 0.0 when nothing was counted.
fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl CacheStats {
    /// Total L1 misses.
    pub const fn misses_l1(&self) -> u64 {
        self.read_misses_l1 + self.write_misses_l1
    }

    /// Total L2 misses.
    pub const fn misses_l2(&self) -> u64 {
        self.read_misses_l2 + self.write_misses_l2
    }

    /// Computes the derived rates from the counters.
    ///
    /// Performs no cache work; calling it again recomputes the same values.
    pub fn complete(&mut self) {
        let l1_misses = self.misses_l1();
        self.derived = DerivedStats {
            l1_miss_rate: ratio(l1_misses, self.accesses),
            l1_effective_miss_rate: ratio(l1_misses.saturating_sub(self.victim_hits), self.accesses),
            l2_miss_rate: ratio(self.misses_l2(), self.accesses_l2),
            victim_hit_rate: ratio(self.victim_hits, self.accesses_vc),
        };
    }

    /// Writes the requested sections of the plain-text report to `out`.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]; an
    /// empty slice selects all of them.
    ///
    /// # Errors
    ///
    /// Propagates any write failure from `out`.
    pub fn write_sections<W: Write>(&self, out: &mut W, sections: &[String]) -> io::Result<()> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        writeln!(out, "==========================================================")?;
        writeln!(out, "CACHE HIERARCHY SIMULATION STATISTICS")?;
        writeln!(out, "==========================================================")?;
        if want("summary") {
            writeln!(out, "accesses                 {}", self.accesses)?;
            writeln!(out, "reads                    {}", self.reads)?;
            writeln!(out, "writes                   {}", self.writes)?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("l1") {
            writeln!(out, "L1")?;
            writeln!(out, "  read_misses            {}", self.read_misses_l1)?;
            writeln!(out, "  write_misses           {}", self.write_misses_l1)?;
            writeln!(out, "  write_backs            {}", self.write_back_l1)?;
            writeln!(out, "  miss_rate              {:.6}", self.derived.l1_miss_rate)?;
            writeln!(out, "  effective_miss_rate    {:.6}", self.derived.l1_effective_miss_rate)?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("victim") {
            writeln!(out, "VICTIM CACHE")?;
            writeln!(out, "  accesses               {}", self.accesses_vc)?;
            writeln!(out, "  hits                   {}", self.victim_hits)?;
            writeln!(out, "  hit_rate               {:.6}", self.derived.victim_hit_rate)?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("l2") {
            writeln!(out, "L2")?;
            writeln!(out, "  accesses               {}", self.accesses_l2)?;
            writeln!(out, "  read_misses            {}", self.read_misses_l2)?;
            writeln!(out, "  write_misses           {}", self.write_misses_l2)?;
            writeln!(out, "  write_backs            {}", self.write_back_l2)?;
            writeln!(out, "  miss_rate              {:.6}", self.derived.l2_miss_rate)?;
        }
        writeln!(out, "==========================================================")
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Errors
    ///
    /// Fails if stdout cannot be written.
    pub fn print_sections(&self, sections: &[String]) -> io::Result<()> {
        let stdout = io::stdout();
        self.write_sections(&mut stdout.lock(), sections)
    }

    /// Prints all statistics sections to stdout.
    ///
    /// # Errors
    ///
    /// Fails if stdout cannot be written.
    pub fn print(&self) -> io::Result<()> {
        self.print_sections(&[])
    }
}
