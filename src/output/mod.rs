//! Output writers for pattern reports and flamegraphs.
//!
//! This module handles writing data to disk in various formats:
//! - JSON pattern reports
//! - SVG flamegraphs

pub mod json;
pub mod svg;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
pub use svg::write_svg;
