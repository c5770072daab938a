//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Parsing `<enter|exit>:<name>` events
//! - Building and validating root-wrapped traces
//! - Defining output schema

pub mod event;
pub mod schema;
pub mod trace;

// Re-export main types
pub use event::{parse_event, Event, EventKind, RawEvent, Symbol};
pub use schema::{CoverageDistribution, PatternReport, PatternSummary, TraceSummary};
pub use trace::{read_trace, Trace};
