//! Rotation collapse.
//!
//! A repeating unit `A;B` that the finder first meets mid-cycle shows up a
//! second time as `B;A`: same length, same structure, different phase. Each
//! frame is walked from a canonical phase, frames are partitioned by the events
//! they read, and frames that come back around to their canonical phase inside
//! the same group are the same cycle and get merged.
//!
//! Note that with this algorithm we momentarily double the number of interval
//! objects while merging.

use super::split::{compare_rotations, split_points};
use crate::discovery::{FrameId, PatternFrame};
use crate::interval::merge;
use crate::parser::{Event, Trace};
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Frame walked around its body from the canonical phase
#[derive(Debug, Clone)]
struct RotationCandidate {
    frame: FrameId,
    start: usize,
    cycle_length: usize,
    canonical: usize,
    phase: usize,
}

impl RotationCandidate {
    /// Phases run `1..=cycle_length`, wrapping
    fn advance(&mut self) {
        self.phase += 1;
        if self.phase > self.cycle_length {
            self.phase = 1;
        }
    }

    fn is_complete(&self) -> bool {
        self.phase == self.canonical
    }
}

/// Collapses frames that are cyclic rotations of each other
pub struct RotationFilter<'t> {
    trace: &'t Trace,
}

impl<'t> RotationFilter<'t> {
    pub fn new(trace: &'t Trace) -> Self {
        Self { trace }
    }

    /// Merge every family of rotation-equivalent frames into one representative
    ///
    /// The representative's intervals are the union of its family's intervals
    /// and `merged_from` counts the family. Zero-length frames are dropped.
    pub fn apply(&self, frames: Vec<PatternFrame>) -> Vec<PatternFrame> {
        let input = frames.len();
        let mut frames: Vec<PatternFrame> = frames
            .into_iter()
            .filter(|f| {
                if f.is_empty() {
                    debug!("Skipping zero-length frame at {}", f.start);
                }
                !f.is_empty()
            })
            .collect();

        if frames.is_empty() {
            return frames;
        }

        let mut candidates: Vec<RotationCandidate> = frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                let canonical = canonical_phase(self.trace, frame);
                RotationCandidate {
                    frame: FrameId(i),
                    start: frame.start,
                    cycle_length: frame.len(),
                    canonical,
                    phase: canonical,
                }
            })
            .collect();

        let mut kept: Vec<FrameId> = Vec::new();
        let mut work: Vec<Vec<usize>> = vec![(0..candidates.len()).collect()];

        while let Some(group) = work.pop() {
            if group.len() == 1 {
                kept.push(candidates[group[0]].frame);
                continue;
            }

            let mut completed: Vec<FrameId> = Vec::new();
            let mut partition: BTreeMap<Event, Vec<usize>> = BTreeMap::new();

            for ci in group {
                let candidate = &mut candidates[ci];
                candidate.advance();
                if candidate.is_complete() {
                    completed.push(candidate.frame);
                    continue;
                }

                match self.trace.event(candidate.start + candidate.phase) {
                    Some(event) => partition.entry(event).or_default().push(ci),
                    None => kept.push(candidate.frame),
                }
            }

            if let Some((&representative, rest)) = completed.split_first() {
                merge_into(&mut frames, representative, rest);
                kept.push(representative);
            }

            work.extend(partition.into_values());
        }

        let mut slots: Vec<Option<PatternFrame>> = frames.into_iter().map(Some).collect();
        let mut filtered: Vec<PatternFrame> = kept
            .into_iter()
            .filter_map(|FrameId(i)| slots.get_mut(i).and_then(Option::take))
            .collect();
        filtered.sort_by_key(|f| (f.start, f.end));

        debug!(
            "Rotation filter: {} frames in, {} frames out",
            input,
            filtered.len()
        );

        filtered
    }
}

/// Union the intervals of `others` into `representative`
fn merge_into(frames: &mut [PatternFrame], representative: FrameId, others: &[FrameId]) {
    for &FrameId(other) in others {
        let intervals = std::mem::take(&mut frames[other].intervals);
        let absorbed = frames[other].merged_from;

        let rep = &mut frames[representative.0];
        rep.intervals = merge(&rep.intervals, &intervals);
        rep.merged_from += absorbed;
    }

    frames[representative.0].recompute_span();
}

/// Split point at which the frame's body rotation is lexicographically least
///
/// Only depth-0 split points are considered. Returned as a phase in
/// `1..=len`, where `len` stands for the unrotated start.
pub fn canonical_phase(trace: &Trace, frame: &PatternFrame) -> usize {
    let body = frame.body(trace);
    let len = body.len();
    if len == 0 {
        return 0;
    }

    let best = split_points(body)
        .into_iter()
        .reduce(|best, split| match compare_rotations(body, split, best) {
            Ordering::Less => split,
            _ => best,
        })
        .unwrap_or(0);

    if best == 0 {
        len
    } else {
        best
    }
}
