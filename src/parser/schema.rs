//! Output JSON schema definitions for pattern reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::event_tree::PatternShape;
use crate::utils::config::{AnalysisConfig, FilterConfig, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// The analyzed trace
    pub trace: TraceSummary,

    /// Discovery parameters the report was produced with
    pub config: AnalysisConfig,

    /// Filter stages that ran after discovery
    pub filters: FilterConfig,

    /// Number of frames that survived filtering
    pub frame_count: usize,

    /// How much of the trace the surviving frames explain
    pub coverage: CoverageDistribution,

    /// Reported patterns (ranked by span)
    pub patterns: Vec<PatternSummary>,

    /// Call structure of the whole trace, then of each reported pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<PatternShape>>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

impl PatternReport {
    /// Assemble a report stamped with the current schema version and time
    pub fn new(
        trace: TraceSummary,
        config: AnalysisConfig,
        filters: FilterConfig,
        frame_count: usize,
        coverage: CoverageDistribution,
        patterns: Vec<PatternSummary>,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            trace,
            config,
            filters,
            frame_count,
            coverage,
            patterns,
            shapes: None,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Attach pattern shapes for viewers
    pub fn with_shapes(mut self, shapes: Vec<PatternShape>) -> Self {
        self.shapes = Some(shapes);
        self
    }
}

/// Where the trace came from and how big it is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Input path, or a label for in-memory traces
    pub source: String,

    /// Event count including the synthetic root frame
    pub trace_length: usize,

    /// Distinct function names including `root`
    pub function_count: usize,
}

/// One reported pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSummary {
    /// Index before the reference occurrence's body
    pub start: usize,

    /// Index of the reference occurrence's last event
    pub end: usize,

    /// Body length in events
    pub length: usize,

    /// Raw occurrence count at discovery time
    pub count: usize,

    /// Trace events covered by all occurrences
    pub span: usize,

    /// Span as a percentage of the trace length
    pub coverage_percent: f64,

    /// Discovered frames folded into this one by rotation collapse
    pub merged_from: usize,

    /// Occurrence intervals as `[lo, hi)` pairs
    pub intervals: Vec<[usize; 2]>,

    /// Textual body, e.g. `"enter:main"`
    pub body: Vec<String>,
}

/// Coverage statistics over a set of frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageDistribution {
    /// Number of frames measured
    pub frame_count: usize,

    /// Sum of every frame's span (occurrences of different frames may overlap)
    pub total_span: usize,

    /// Mean span per frame
    pub mean_span: usize,

    /// Median span per frame
    pub median_span: usize,

    /// Trace events inside at least one occurrence
    pub covered_events: usize,

    /// Covered events as a percentage of the trace length
    pub covered_percent: f64,
}
