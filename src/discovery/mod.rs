//! Pattern discovery engine.
//!
//! Consumes a root-wrapped trace and produces the initial set of accepted
//! pattern records, each with its occurrence count, reference bounds,
//! disjoint occurrence intervals and total span.

pub mod finder;
pub mod frame;

pub use finder::{find_patterns, DiscoveryStats, PatternFinder};
pub use frame::{FrameId, PatternFrame};
