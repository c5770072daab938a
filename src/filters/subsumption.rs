//! Sub-pattern and partial-pattern subsumption.
//!
//! A pattern that only ever occurs nested inside another pattern's
//! occurrences adds nothing to the report. Every frame is read from each of
//! its split points, and the readers are partitioned by the events they see,
//! exactly like discovery partitions starts. A reader for a frame's unrotated
//! body that finishes its body while still grouped with a reader of another
//! frame has found its body embedded in that frame; if its intervals are also
//! covered by that frame's intervals, it is subsumed. A final sweep then
//! clears any frame still covered by another surviving frame, which catches
//! bodies nested below a container's depth-0 split points.
//!
//! The two variants differ in how a reader continues past its split point:
//! - [`SubPatternFilter`] wraps around the container's body (rotation view);
//! - [`PartialPatternFilter`] keeps reading the trace after the reference
//!   occurrence (embedding view).

use super::split::split_points;
use crate::discovery::{FrameId, PatternFrame};
use crate::interval::is_covered;
use crate::parser::{Event, Trace};
use log::debug;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    Cyclic,
    Linear,
}

/// One reader of a frame's body, from one split point
#[derive(Debug, Clone)]
struct SplitCandidate {
    frame: FrameId,
    start: usize,
    cycle_length: usize,
    split: usize,
}

impl SplitCandidate {
    fn is_unrotated(&self) -> bool {
        self.split == 0
    }

    /// Trace index of the `offset`-th event read (1-based)
    fn index(&self, offset: usize, traversal: Traversal) -> usize {
        match traversal {
            Traversal::Cyclic => self.start + (self.split + offset - 1) % self.cycle_length + 1,
            Traversal::Linear => self.start + self.split + offset,
        }
    }
}

/// Readers sharing the same `offset` events
struct SplitGroup {
    offset: usize,
    members: Vec<usize>,
}

struct SubsumptionEngine<'t> {
    trace: &'t Trace,
    traversal: Traversal,
}

impl<'t> SubsumptionEngine<'t> {
    fn mark_subsumed(&self, frames: &mut [PatternFrame]) -> usize {
        let candidates: Vec<SplitCandidate> = frames
            .iter()
            .enumerate()
            .filter(|(_, frame)| {
                if frame.is_empty() {
                    debug!("Skipping zero-length frame at {}", frame.start);
                }
                !frame.is_empty()
            })
            .flat_map(|(i, frame)| {
                split_points(frame.body(self.trace))
                    .into_iter()
                    .map(move |split| SplitCandidate {
                        frame: FrameId(i),
                        start: frame.start,
                        cycle_length: frame.len(),
                        split,
                    })
            })
            .collect();

        let mut invalidated = 0;
        let mut work = vec![SplitGroup {
            offset: 0,
            members: (0..candidates.len()).collect(),
        }];

        while let Some(group) = work.pop() {
            if !spans_several_frames(&candidates, &group.members) {
                continue;
            }

            let next = group.offset + 1;
            let mut completed: Vec<usize> = Vec::new();
            let mut partition: BTreeMap<Event, Vec<usize>> = BTreeMap::new();

            for &ci in &group.members {
                let candidate = &candidates[ci];
                if next > candidate.cycle_length {
                    completed.push(ci);
                    continue;
                }

                let index = candidate.index(next, self.traversal);
                if let Some(event) = self.trace.event(index) {
                    partition.entry(event).or_default().push(ci);
                }
            }

            for &ci in &completed {
                let candidate = &candidates[ci];
                if !candidate.is_unrotated() {
                    continue;
                }

                let FrameId(inner) = candidate.frame;
                if !frames[inner].valid {
                    continue;
                }

                let container = group.members.iter().map(|&hi| candidates[hi].frame).find(
                    |&FrameId(outer)| outer != inner && contains(&frames[outer], &frames[inner], outer, inner),
                );

                if let Some(FrameId(outer)) = container {
                    debug!(
                        "Frame ({}, {}) is subsumed by frame ({}, {})",
                        frames[inner].start, frames[inner].end, frames[outer].start, frames[outer].end
                    );
                    frames[inner].valid = false;
                    invalidated += 1;
                }
            }

            work.extend(partition.into_values().map(|members| SplitGroup {
                offset: next,
                members,
            }));
        }

        invalidated + sweep_covered(frames)
    }

    fn apply(&self, mut frames: Vec<PatternFrame>) -> Vec<PatternFrame> {
        let input = frames.len();
        self.mark_subsumed(&mut frames);
        frames.retain(|f| f.valid && !f.is_empty());

        debug!(
            "{:?} subsumption: {} frames in, {} frames out",
            self.traversal,
            input,
            frames.len()
        );

        frames
    }
}

/// `outer` covers every occurrence of `inner`
///
/// Two frames with identical coverage cover each other; only the later one
/// gives way so that one of them survives.
fn contains(outer: &PatternFrame, inner: &PatternFrame, outer_id: usize, inner_id: usize) -> bool {
    if !is_covered(&inner.intervals, &outer.intervals) {
        return false;
    }

    outer.intervals != inner.intervals || outer_id < inner_id
}

/// Clear every valid frame still covered by another valid frame
///
/// Readers only start at depth-0 split points, so an occurrence nested
/// deeper inside a container, or straddling two of its repeats, is never
/// grouped with it. Containment is transitive, so afterwards no valid frame
/// is covered by another valid frame.
fn sweep_covered(frames: &mut [PatternFrame]) -> usize {
    let mut invalidated = 0;

    for inner in 0..frames.len() {
        if !frames[inner].valid || frames[inner].is_empty() {
            continue;
        }

        let container = (0..frames.len()).find(|&outer| {
            outer != inner
                && frames[outer].valid
                && !frames[outer].is_empty()
                && contains(&frames[outer], &frames[inner], outer, inner)
        });

        if let Some(outer) = container {
            debug!(
                "Frame ({}, {}) lies inside frame ({}, {})",
                frames[inner].start, frames[inner].end, frames[outer].start, frames[outer].end
            );
            frames[inner].valid = false;
            invalidated += 1;
        }
    }

    invalidated
}

fn spans_several_frames(candidates: &[SplitCandidate], members: &[usize]) -> bool {
    let mut frames = members.iter().map(|&ci| candidates[ci].frame);
    match frames.next() {
        Some(first) => frames.any(|f| f != first),
        None => false,
    }
}

/// Subsumption through rotation split points
pub struct SubPatternFilter<'t> {
    engine: SubsumptionEngine<'t>,
}

impl<'t> SubPatternFilter<'t> {
    pub fn new(trace: &'t Trace) -> Self {
        Self {
            engine: SubsumptionEngine {
                trace,
                traversal: Traversal::Cyclic,
            },
        }
    }

    /// Clear `valid` on every subsumed frame, returning how many were cleared
    pub fn mark_subsumed(&self, frames: &mut [PatternFrame]) -> usize {
        self.engine.mark_subsumed(frames)
    }

    /// Keep only the frames that are not subsumed
    pub fn apply(&self, frames: Vec<PatternFrame>) -> Vec<PatternFrame> {
        self.engine.apply(frames)
    }
}

/// Subsumption through any depth-0 split point of a container's occurrence
pub struct PartialPatternFilter<'t> {
    engine: SubsumptionEngine<'t>,
}

impl<'t> PartialPatternFilter<'t> {
    pub fn new(trace: &'t Trace) -> Self {
        Self {
            engine: SubsumptionEngine {
                trace,
                traversal: Traversal::Linear,
            },
        }
    }

    /// Clear `valid` on every subsumed frame, returning how many were cleared
    pub fn mark_subsumed(&self, frames: &mut [PatternFrame]) -> usize {
        self.engine.mark_subsumed(frames)
    }

    /// Keep only the frames that are not subsumed
    pub fn apply(&self, frames: Vec<PatternFrame>) -> Vec<PatternFrame> {
        self.engine.apply(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;
    use pretty_assertions::assert_eq;

    fn abc_trace() -> Trace {
        let unit = ["enter:a", "exit:a", "enter:b", "exit:b", "enter:c", "exit:c"];
        Trace::from_entries(unit.iter().cycle().take(12)).unwrap()
    }

    fn long_and_short() -> Vec<PatternFrame> {
        vec![
            PatternFrame::new(0, 6, 2, vec![Interval::new(0, 6), Interval::new(6, 12)]),
            PatternFrame::new(2, 6, 2, vec![Interval::new(2, 6), Interval::new(8, 12)]),
        ]
    }

    #[test]
    fn test_cyclic_index_wraps() {
        let candidate = SplitCandidate {
            frame: FrameId(0),
            start: 0,
            cycle_length: 6,
            split: 4,
        };
        assert_eq!(candidate.index(1, Traversal::Cyclic), 5);
        assert_eq!(candidate.index(3, Traversal::Cyclic), 1);
        assert_eq!(candidate.index(3, Traversal::Linear), 7);
    }

    #[test]
    fn test_sub_pattern_invalidates_nested() {
        let trace = abc_trace();
        let mut frames = long_and_short();

        let cleared = SubPatternFilter::new(&trace).mark_subsumed(&mut frames);

        assert_eq!(cleared, 1);
        assert!(frames[0].valid);
        assert!(!frames[1].valid);
    }

    #[test]
    fn test_partial_invalidates_nested() {
        let trace = abc_trace();
        let kept = PartialPatternFilter::new(&trace).apply(long_and_short());

        assert_eq!(kept.len(), 1);
        assert_eq!((kept[0].start, kept[0].end), (0, 6));
    }

    #[test]
    fn test_uncovered_pattern_survives() {
        let trace = abc_trace();
        let mut frames = long_and_short();
        // an extra occurrence outside the long pattern
        frames[1].intervals.push(Interval::new(20, 24));
        frames[1].recompute_span();

        let kept = SubPatternFilter::new(&trace).apply(frames);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_body_nested_below_split_points_is_subsumed() {
        // f0() f1( f1() f2() ) repeated; the inner f1() f2() never starts at
        // a depth-0 split point of the container
        let unit = [
            "enter:f0", "exit:f0", "enter:f1", "enter:f1", "exit:f1", "enter:f2", "exit:f2", "exit:f1",
        ];
        let trace = Trace::from_entries(unit.iter().cycle().take(16)).unwrap();
        let outer = PatternFrame::new(0, 8, 2, vec![Interval::new(0, 8), Interval::new(8, 16)]);
        let inner = PatternFrame::new(3, 7, 2, vec![Interval::new(3, 7), Interval::new(11, 15)]);

        for partial in [false, true] {
            let mut frames = vec![outer.clone(), inner.clone()];
            let cleared = if partial {
                PartialPatternFilter::new(&trace).mark_subsumed(&mut frames)
            } else {
                SubPatternFilter::new(&trace).mark_subsumed(&mut frames)
            };

            assert_eq!(cleared, 1);
            assert!(frames[0].valid);
            assert!(!frames[1].valid);
        }
    }

    #[test]
    fn test_identical_coverage_keeps_earlier_frame() {
        let trace = abc_trace();
        let first = PatternFrame::new(0, 6, 2, vec![Interval::new(0, 6), Interval::new(6, 12)]);
        let mut frames = vec![first.clone(), first];

        let cleared = sweep_covered(&mut frames);

        assert_eq!(cleared, 1);
        assert!(frames[0].valid);
        assert!(!frames[1].valid);
        assert_eq!(SubPatternFilter::new(&trace).apply(frames).len(), 1);
    }

    #[test]
    fn test_single_frame_untouched() {
        let trace = abc_trace();
        let frame = long_and_short().remove(0);
        let kept = SubPatternFilter::new(&trace).apply(vec![frame.clone()]);
        assert_eq!(kept, vec![frame]);
    }
}
