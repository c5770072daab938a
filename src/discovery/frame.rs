//! Accepted pattern records.

use crate::interval::{total_span, Interval};
use crate::parser::{Event, Trace};
use serde::{Deserialize, Serialize};

/// Position of a frame in the `Vec<PatternFrame>` a pipeline stage owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub usize);

/// One distinct accepted pattern
///
/// `start`/`end` bound one reference occurrence: `trace[start+1 ..= end]` is
/// the pattern's balanced body. `intervals` covers every occurrence after
/// self-overlapping repeats were collapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFrame {
    pub start: usize,
    pub end: usize,

    /// Ascending, non-overlapping occurrence intervals
    ///
    /// Back-to-back repeats keep their own intervals, so neighbours may touch.
    /// Only merged coverage (`interval::merge`) is fully disjoint.
    pub intervals: Vec<Interval>,

    /// Sum of interval lengths
    pub span: usize,

    /// Raw occurrence count at discovery time. Not updated by merges.
    pub count: usize,

    /// Cleared by the subsumption filters, never set back
    pub valid: bool,

    /// How many discovered frames this record stands for
    pub merged_from: usize,
}

impl PatternFrame {
    pub fn new(start: usize, end: usize, count: usize, intervals: Vec<Interval>) -> Self {
        let span = total_span(&intervals);
        Self {
            start,
            end,
            intervals,
            span,
            count,
            valid: true,
            merged_from: 1,
        }
    }

    /// Body length in events
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// A zero-length body; filters skip these
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn body<'t>(&self, trace: &'t Trace) -> &'t [Event] {
        trace.body(self.start, self.end)
    }

    /// Textual body, e.g. `["enter:a", "exit:a"]`
    pub fn render_body(&self, trace: &Trace) -> Vec<String> {
        self.body(trace)
            .iter()
            .map(|e| trace.render_event(*e))
            .collect()
    }

    pub fn recompute_span(&mut self) {
        self.span = total_span(&self.intervals);
    }
}
