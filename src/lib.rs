//! Trace Pattern Studio
//!
//! Repeated call-pattern mining for execution traces.
//!
//! A trace is a sequence of `enter:<fn>` / `exit:<fn>` events. This crate
//! finds every balanced call-stack shape that repeats in a trace, drops the
//! redundant ones (self-overlapping repeats, rotations, patterns nested in
//! larger patterns) and reports the rest as JSON, text and flamegraphs.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install trace-pattern-studio
//! trace-patterns analyze data/processed_data --summary
//! ```
//!
//! As a library:
//!
//! ```ignore
//! let trace = Trace::from_raw("enter:a,enter:b,exit:b,exit:a,enter:a,enter:b,exit:b,exit:a")?;
//! let frames = find_patterns(&trace, &AnalysisConfig::default());
//! let frames = apply_filters(&trace, frames, FilterConfig::enabled());
//! ```

pub mod aggregator;
pub mod commands;
pub mod discovery;
pub mod filters;
pub mod flamegraph;
pub mod interval;
pub mod output;
pub mod parser;
pub mod utils;

pub use discovery::{find_patterns, PatternFinder, PatternFrame};
pub use filters::{apply_filters, FilterPipeline};
pub use parser::{read_trace, Trace};
pub use utils::config::{AnalysisConfig, FilterConfig, SubsumptionMode};
