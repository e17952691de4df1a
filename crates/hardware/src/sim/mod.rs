//! Simulation driver and trace ingestion.
//!
//! Provides the trace reader that turns text traces into access events and
//! the simulator that feeds them through a cache hierarchy.

/// Owned simulator: hierarchy plus statistics, driven by a trace.
pub mod simulator;

/// Text trace parsing.
pub mod trace;

pub use simulator::Simulator;
pub use trace::{TraceEvent, TraceReader};
