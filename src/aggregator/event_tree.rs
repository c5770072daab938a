//! Replay a pattern body into its nested call structure.
//!
//! Viewers draw a pattern as one bar per call: where it starts, where it ends
//! and how deep it sits. Bodies are balanced, so a single stack walk yields
//! every call.

use crate::discovery::PatternFrame;
use crate::parser::{EventKind, Trace};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One complete call inside a pattern body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEvent {
    pub function: String,

    /// Body index of the enter event
    pub start_index: usize,

    /// Body index just before the exit event
    pub end_index: usize,

    /// 1 for the outermost calls of the body
    pub depth: usize,
}

/// The nested call structure of one pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternShape {
    pub count: usize,
    pub max_stack_depth: usize,
    pub pattern_length: usize,

    /// Calls in the order they exit
    pub events: Vec<PatternEvent>,

    pub functions: BTreeSet<String>,
}

/// Build the call structure of `frame`'s reference occurrence
///
/// **Public** - main entry point for pattern conversion
///
/// # Arguments
/// * `trace` - Trace the frame was discovered in
/// * `frame` - Frame whose body `trace[start+1 ..= end]` is replayed
///
/// # Returns
/// Shape with one `PatternEvent` per call, in exit order
pub fn build_pattern_shape(trace: &Trace, frame: &PatternFrame) -> PatternShape {
    let body = frame.body(trace);

    let mut open: Vec<PatternEvent> = Vec::new();
    let mut events = Vec::new();
    let mut functions = BTreeSet::new();
    let mut max_stack_depth = 0;

    for (i, event) in body.iter().enumerate() {
        let name = trace.name(event.function);
        functions.insert(name.to_string());

        match event.kind {
            EventKind::Enter => open.push(PatternEvent {
                function: name.to_string(),
                start_index: i,
                end_index: i,
                depth: open.len() + 1,
            }),
            EventKind::Exit => {
                if let Some(mut call) = open.pop() {
                    call.end_index = i.saturating_sub(1);
                    events.push(call);
                }
            }
        }

        max_stack_depth = max_stack_depth.max(open.len());
    }

    PatternShape {
        count: frame.count,
        max_stack_depth,
        pattern_length: body.len(),
        events,
        functions,
    }
}

/// Pseudo frame covering the whole unwrapped trace
fn whole_trace_frame(trace: &Trace) -> PatternFrame {
    let end = trace.len().saturating_sub(2);
    PatternFrame::new(0, end, 1, Vec::new())
}

/// Shapes of the whole trace followed by every frame
pub fn build_pattern_shapes(trace: &Trace, frames: &[PatternFrame]) -> Vec<PatternShape> {
    let whole = whole_trace_frame(trace);
    let shapes: Vec<PatternShape> = std::iter::once(&whole)
        .chain(frames)
        .map(|frame| build_pattern_shape(trace, frame))
        .collect();

    debug!("Converted {} patterns into shapes", shapes.len());
    shapes
}
