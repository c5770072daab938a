//! Extend-and-partition pattern discovery.
//!
//! Consider every index `x` of the trace as the start of an empty body. The
//! finder extends all bodies one event at a time and partitions the starts by
//! the event just read, so every group shares the exact same body, and every
//! place in the trace carrying that body is in the group. This builds a trie of
//! bodies online without enumerating shapes.
//!
//! Each group also carries the relative stack depth of its body. A body is a
//! complete call stack exactly when that depth is back at 0, and a start at
//! depth 0 whose next event is an exit would leave its own base function, so it
//! is discarded rather than extended.
//!
//! Two refinements sit on top of the plain trie walk:
//! - cluster collapse: repeats of a body that overlap or sit back-to-back are
//!   one repeating region, not pairs and triples of the unit, so they are
//!   recorded and dropped from further extension;
//! - span rejection: a body whose occurrences are mostly covered by longer
//!   extensions of itself is a redundant generalization and is not accepted.
//!
//! The walk runs on an explicit work stack, so host stack depth does not grow
//! with pattern length.

use super::frame::PatternFrame;
use crate::interval::{intersect_span, merge, normalize, total_span, Interval};
use crate::parser::{Event, Trace};
use crate::utils::config::AnalysisConfig;
use log::debug;
use std::collections::BTreeMap;

/// Starts sharing a body of length `offset` at relative depth `stack_depth`
#[derive(Debug, Clone)]
struct CandidateSet {
    offset: usize,
    stack_depth: usize,
    starts: Vec<usize>,
}

/// A complete body waiting on its extensions before the accept decision
#[derive(Debug)]
struct PendingPattern {
    start: usize,
    end: usize,
    count: usize,
    own: Vec<Interval>,
    span: usize,
}

/// An expanded trie node whose children are still being processed
#[derive(Debug, Default)]
struct Node {
    pending: Option<PendingPattern>,
    extended: Vec<Interval>,
}

enum Task {
    Expand(CandidateSet),
    Finish,
}

/// Walk counters, logged at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscoveryStats {
    pub nodes: usize,
    pub candidates: usize,
    pub accepted: usize,
}

/// Pattern discovery over one trace
pub struct PatternFinder<'t> {
    trace: &'t Trace,
    config: AnalysisConfig,
    stats: DiscoveryStats,
}

impl<'t> PatternFinder<'t> {
    pub fn new(trace: &'t Trace, config: AnalysisConfig) -> Self {
        Self {
            trace,
            config,
            stats: DiscoveryStats::default(),
        }
    }

    pub fn stats(&self) -> DiscoveryStats {
        self.stats
    }

    /// Find every accepted pattern of the trace
    ///
    /// # Returns
    /// Accepted frames in no particular order. Each has a balanced body of at
    /// least `min_pattern_length` events, ascending disjoint intervals and
    /// `valid == true`.
    ///
    /// # Algorithm
    /// 1. Start one candidate set with every index in `[0, L-2]`
    /// 2. Expand a set: record a pattern candidate if its body is complete,
    ///    then partition the surviving starts by their next event
    /// 3. Once all children are finished, accept or reject the candidate
    ///    against the coverage of its extensions and hand
    ///    `extended ∪ own` up to the parent
    pub fn find(&mut self) -> Vec<PatternFrame> {
        let len = self.trace.len();
        let mut frames = Vec::new();
        if len < 2 {
            return frames;
        }

        let root = CandidateSet {
            offset: 0,
            stack_depth: 0,
            starts: (0..len - 1).collect(),
        };

        // Nodes form the chain of ancestors of whatever is being expanded: a node
        // is finished before any of its siblings is expanded.
        let mut nodes: Vec<Node> = Vec::new();
        let mut tasks = vec![Task::Expand(root)];

        while let Some(task) = tasks.pop() {
            match task {
                Task::Expand(set) => {
                    if set.starts.len() <= 1 || set.offset > self.config.max_pattern_length {
                        continue;
                    }

                    let (node, children) = self.expand(set);
                    nodes.push(node);
                    tasks.push(Task::Finish);
                    tasks.extend(children.into_iter().map(Task::Expand));
                }
                Task::Finish => {
                    let Some(node) = nodes.pop() else {
                        continue;
                    };

                    let coverage = self.finish(node, &mut frames);
                    if let Some(parent) = nodes.last_mut() {
                        parent.extended.extend(coverage);
                    }
                }
            }
        }

        debug!(
            "Discovery visited {} nodes, {} pattern candidates, accepted {}",
            self.stats.nodes, self.stats.candidates, self.stats.accepted
        );

        frames
    }

    fn expand(&mut self, set: CandidateSet) -> (Node, Vec<CandidateSet>) {
        self.stats.nodes += 1;

        let CandidateSet {
            offset,
            stack_depth,
            mut starts,
        } = set;

        let is_pattern =
            stack_depth == 0 && offset >= self.config.min_pattern_length.max(1);

        let pending = if is_pattern {
            self.stats.candidates += 1;
            Some(collapse_clusters(offset, &mut starts))
        } else {
            None
        };

        let next = offset + 1;
        let mut groups: BTreeMap<Event, CandidateSet> = BTreeMap::new();

        for start in starts {
            let Some(event) = self.trace.event(start + next) else {
                continue;
            };

            // an exit at depth 0 leaves the body's own base function
            let Some(depth) = event.step_depth(stack_depth) else {
                continue;
            };

            groups
                .entry(event)
                .or_insert_with(|| CandidateSet {
                    offset: next,
                    stack_depth: depth,
                    starts: Vec::new(),
                })
                .starts
                .push(start);
        }

        let node = Node {
            pending,
            extended: Vec::new(),
        };

        (node, groups.into_values().collect())
    }

    fn finish(&mut self, node: Node, frames: &mut Vec<PatternFrame>) -> Vec<Interval> {
        let mut extended = node.extended;
        normalize(&mut extended);

        let Some(pattern) = node.pending else {
            return extended;
        };

        let shared = intersect_span(&pattern.own, &extended);
        let ratio = shared as f64 / pattern.span as f64;
        let coverage = merge(&extended, &pattern.own);

        if ratio < self.config.common_span_threshold {
            self.stats.accepted += 1;
            frames.push(PatternFrame::new(
                pattern.start,
                pattern.end,
                pattern.count,
                pattern.own,
            ));
        }

        coverage
    }
}

/// Record a complete body's occurrences and drop repeat runs from extension
///
/// Starts no further apart than `offset` are repeats of the same unit (they
/// overlap, or follow each other back-to-back). Every start in such a run is
/// removed from `starts`. Overlapping neighbours share one interval,
/// back-to-back neighbours keep their own. Isolated starts stay extendable.
fn collapse_clusters(offset: usize, starts: &mut Vec<usize>) -> PendingPattern {
    let count = starts.len();
    let first = starts[0];
    let mut own = Vec::new();
    let mut survivors = Vec::with_capacity(starts.len());

    let mut i = 0;
    while i < starts.len() {
        let mut j = i;
        while j + 1 < starts.len() && starts[j + 1] - starts[j] <= offset {
            j += 1;
        }

        if i == j {
            survivors.push(starts[i]);
            own.push(Interval::new(starts[i], starts[i] + offset));
        } else {
            let mut lo = starts[i];
            for k in i..j {
                if starts[k + 1] - starts[k] == offset {
                    own.push(Interval::new(lo, starts[k] + offset));
                    lo = starts[k + 1];
                }
            }
            own.push(Interval::new(lo, starts[j] + offset));
        }

        i = j + 1;
    }

    *starts = survivors;
    let span = total_span(&own);

    PendingPattern {
        start: first,
        end: first + offset,
        count,
        own,
        span,
    }
}

/// Convenience wrapper: run discovery with the given config
pub fn find_patterns(trace: &Trace, config: &AnalysisConfig) -> Vec<PatternFrame> {
    PatternFinder::new(trace, *config).find()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ivs(pairs: &[(usize, usize)]) -> Vec<Interval> {
        pairs.iter().map(|&(lo, hi)| Interval::new(lo, hi)).collect()
    }

    #[test]
    fn test_collapse_isolated_starts() {
        let mut starts = vec![0, 10, 20];
        let pattern = collapse_clusters(4, &mut starts);
        assert_eq!(starts, vec![0, 10, 20]);
        assert_eq!(pattern.own, ivs(&[(0, 4), (10, 14), (20, 24)]));
        assert_eq!(pattern.span, 12);
        assert_eq!(pattern.count, 3);
    }

    #[test]
    fn test_collapse_back_to_back_run() {
        let mut starts = vec![0, 4, 8];
        let pattern = collapse_clusters(4, &mut starts);
        assert!(starts.is_empty());
        assert_eq!(pattern.own, ivs(&[(0, 4), (4, 8), (8, 12)]));
        assert_eq!(pattern.span, 12);
    }

    #[test]
    fn test_collapse_overlapping_run() {
        let mut starts = vec![0, 2, 30];
        let pattern = collapse_clusters(4, &mut starts);
        assert_eq!(starts, vec![30]);
        assert_eq!(pattern.own, ivs(&[(0, 6), (30, 34)]));
        assert_eq!(pattern.start, 0);
        assert_eq!(pattern.end, 4);
    }

    #[test]
    fn test_find_on_root_only_trace() {
        let trace = Trace::empty();
        let frames = find_patterns(&trace, &AnalysisConfig::default());
        assert!(frames.is_empty());
    }

    #[test]
    fn test_find_repeated_unit() {
        let unit = ["enter:a", "enter:b", "exit:b", "exit:a"];
        let trace = Trace::from_entries(unit.iter().cycle().take(12)).unwrap();

        let mut finder = PatternFinder::new(&trace, AnalysisConfig::default());
        let frames = finder.find();

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].start, 0);
        assert_eq!(frames[0].end, 4);
        assert_eq!(frames[0].count, 3);
        assert_eq!(frames[0].intervals, ivs(&[(0, 4), (4, 8), (8, 12)]));
        assert_eq!(finder.stats().accepted, 1);
    }
}
