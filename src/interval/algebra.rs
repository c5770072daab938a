//! Operations over sorted, disjoint, half-open interval sequences.
//!
//! Every sequence handed to these functions is ascending by `lo`. `merge`,
//! `intersect_span` and `is_covered` additionally require their inputs to be
//! pairwise disjoint; `squish` is how an overlapping sequence gets there.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open range `[lo, hi)` of trace indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub lo: usize,
    pub hi: usize,
}

impl Interval {
    pub fn new(lo: usize, hi: usize) -> Self {
        debug_assert!(lo <= hi, "interval bounds inverted: [{lo}, {hi})");
        Self { lo, hi }
    }

    pub fn len(&self) -> usize {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lo, self.hi)
    }
}

/// Sum of interval lengths
pub fn total_span(intervals: &[Interval]) -> usize {
    intervals.iter().map(Interval::len).sum()
}

/// Disjoint ascending union of two disjoint ascending sequences
///
/// Intervals that overlap or touch are coalesced.
pub fn merge(a: &[Interval], b: &[Interval]) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        let next = match (a.get(i), b.get(j)) {
            (Some(x), Some(y)) if x.lo <= y.lo => {
                i += 1;
                *x
            }
            (Some(_), Some(y)) => {
                j += 1;
                *y
            }
            (Some(x), None) => {
                i += 1;
                *x
            }
            (None, Some(y)) => {
                j += 1;
                *y
            }
            (None, None) => break,
        };

        push_coalesced(&mut merged, next);
    }

    merged
}

/// Coalesce an ascending, possibly overlapping sequence in place
pub fn squish(intervals: &mut Vec<Interval>) {
    let mut write = 0;
    for read in 0..intervals.len() {
        let current = intervals[read];
        if write > 0 && current.lo <= intervals[write - 1].hi {
            let last = &mut intervals[write - 1];
            last.hi = last.hi.max(current.hi);
        } else {
            intervals[write] = current;
            write += 1;
        }
    }

    intervals.truncate(write);
}

/// Sort by `lo` then squish
pub fn normalize(intervals: &mut Vec<Interval>) {
    intervals.sort_unstable();
    squish(intervals);
}

/// Length of the intersection of two disjoint ascending sequences
///
/// Two-pointer sweep, the intersection itself is never built.
pub fn intersect_span(a: &[Interval], b: &[Interval]) -> usize {
    let mut span = 0;
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let (x, y) = (a[i], b[j]);
        let lo = x.lo.max(y.lo);
        let hi = x.hi.min(y.hi);
        if lo < hi {
            span += hi - lo;
        }

        // whichever ends first cannot meet anything further along the other side
        if x.hi <= y.hi {
            i += 1;
        } else {
            j += 1;
        }
    }

    span
}

/// Every interval of `inner` lies inside a single interval of `outer`
///
/// Both sequences must be ascending and disjoint. An empty `inner` is covered.
pub fn is_covered(inner: &[Interval], outer: &[Interval]) -> bool {
    let mut j = 0;

    for iv in inner {
        while j < outer.len() && outer[j].hi < iv.hi {
            j += 1;
        }

        match outer.get(j) {
            Some(o) if o.lo <= iv.lo => {}
            _ => return false,
        }
    }

    true
}

fn push_coalesced(out: &mut Vec<Interval>, next: Interval) {
    match out.last_mut() {
        Some(last) if next.lo <= last.hi => last.hi = last.hi.max(next.hi),
        _ => out.push(next),
    }
}
