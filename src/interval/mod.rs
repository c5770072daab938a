//! Interval algebra shared by discovery and every filter.
//!
//! All span comparisons in the crate go through these operations over
//! ascending, disjoint, half-open `[lo, hi)` interval sequences.

pub mod algebra;

pub use algebra::{
    intersect_span, is_covered, merge, normalize, squish, total_span, Interval,
};
