//! Aggregation of discovered patterns into shapes, collapsed stacks and metrics.
//!
//! This module transforms accepted pattern frames into:
//! - Nested call structure (for pattern viewers)
//! - Collapsed stack format (for flamegraph generation)
//! - Coverage statistics and span rankings

pub mod event_tree;
pub mod metrics;
pub mod stack_builder;

// Re-export main types and functions
pub use event_tree::{build_pattern_shape, build_pattern_shapes, PatternEvent, PatternShape};
pub use metrics::{
    calculate_coverage_distribution, pattern_coverage, summarize_pattern, summarize_patterns,
    top_patterns,
};
pub use stack_builder::{build_collapsed_stacks, pattern_label, CollapsedStack};
