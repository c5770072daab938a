//! Redundancy filters over discovered patterns.
//!
//! This module handles:
//! - Collapsing cyclic rotations of one repeating structure
//! - Dropping patterns that only ever occur nested in another
//! - Chaining the enabled stages

pub mod pipeline;
pub mod rotation;
pub mod split;
pub mod subsumption;

pub use pipeline::{apply_filters, FilterPipeline};
pub use rotation::{canonical_phase, RotationFilter};
pub use split::{compare_rotations, split_points};
pub use subsumption::{PartialPatternFilter, SubPatternFilter};
