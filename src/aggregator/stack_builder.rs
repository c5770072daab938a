//! Build collapsed stack format from pattern bodies.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "parent;child;grandchild weight"
//!
//! Example: "pattern[0..4];main;parse 2"
//! Every body event is one step, attributed to the call stack it enters or
//! exits, so a leaf call weighs 2 and a caller weighs its own 2 plus its
//! callees'.

use crate::discovery::PatternFrame;
use crate::parser::{EventKind, Trace};
use log::debug;
use std::collections::HashMap;

/// A single collapsed stack entry
///
/// **Public** - used by flamegraph generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string
    pub stack: String,

    /// Weight (steps spent in this stack)
    pub weight: u64,
}

impl CollapsedStack {
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// One line of collapsed-stack input
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Label a pattern gets as the base frame of its stacks
pub fn pattern_label(frame: &PatternFrame) -> String {
    format!("pattern[{}..{}]", frame.start, frame.end)
}

/// Build collapsed stacks for a set of patterns
///
/// **Public** - main entry point for stack building
///
/// # Arguments
/// * `trace` - Trace the frames were discovered in
/// * `frames` - Patterns to render, each under its own [`pattern_label`]
///
/// # Returns
/// Vector of collapsed stacks, one per unique stack, heaviest first
///
/// # Algorithm
/// 1. Replay each body with a call stack
/// 2. Attribute one step to the stack current after an enter, or before an exit
/// 3. Aggregate by unique stack (sum weights)
pub fn build_collapsed_stacks(trace: &Trace, frames: &[PatternFrame]) -> Vec<CollapsedStack> {
    let mut stack_map: HashMap<String, u64> = HashMap::new();

    for frame in frames {
        let mut call_stack: Vec<&str> = vec![];
        let label = pattern_label(frame);

        for event in frame.body(trace) {
            let name = trace.name(event.function);
            if event.kind == EventKind::Enter {
                call_stack.push(name);
            }

            let stack_str = if call_stack.is_empty() {
                label.clone()
            } else {
                format!("{};{}", label, call_stack.join(";"))
            };
            *stack_map.entry(stack_str).or_insert(0) += 1;

            if event.kind == EventKind::Exit {
                call_stack.pop();
            }
        }
    }

    let mut stacks: Vec<CollapsedStack> = stack_map
        .into_iter()
        .map(|(stack, weight)| CollapsedStack::new(stack, weight))
        .collect();

    // ties by name so output is stable
    stacks.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.stack.cmp(&b.stack)));

    debug!(
        "Built {} unique collapsed stacks from {} patterns",
        stacks.len(),
        frames.len()
    );

    stacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapsed_stack_to_line() {
        let stack = CollapsedStack::new("main;execute;parse".to_string(), 10);
        assert_eq!(stack.to_line(), "main;execute;parse 10");
    }

    #[test]
    fn test_nested_body_weights() {
        let trace = Trace::from_entries(["enter:a", "enter:b", "exit:b", "exit:a"]).unwrap();
        let frame = PatternFrame::new(0, 4, 1, vec![Interval::new(0, 4)]);

        let stacks = build_collapsed_stacks(&trace, &[frame]);

        assert_eq!(
            stacks,
            vec![
                CollapsedStack::new("pattern[0..4];a".to_string(), 2),
                CollapsedStack::new("pattern[0..4];a;b".to_string(), 2),
            ]
        );
    }
}
