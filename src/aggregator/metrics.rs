//! Calculate coverage metrics and pattern rankings.
//!
//! The patterns that explain the most of the trace are the primary
//! targets for a reader, so reports rank by span.

use crate::discovery::PatternFrame;
use crate::interval::{normalize, total_span, Interval};
use crate::parser::schema::{CoverageDistribution, PatternSummary};
use crate::parser::Trace;
use log::debug;

/// Span of `frame` as a percentage of `trace_length`
pub fn pattern_coverage(frame: &PatternFrame, trace_length: usize) -> f64 {
    if trace_length == 0 {
        return 0.0;
    }
    (frame.span as f64 / trace_length as f64) * 100.0
}

/// Rank frames by span, largest first
///
/// **Public** - main entry point for ranking
///
/// # Arguments
/// * `frames` - Frames after filtering
/// * `top_n` - Number of frames to return
///
/// # Returns
/// At most `top_n` frames; ties keep the earlier reference occurrence first
pub fn top_patterns(frames: &[PatternFrame], top_n: usize) -> Vec<&PatternFrame> {
    let mut ranked: Vec<&PatternFrame> = frames.iter().collect();
    ranked.sort_by(|a, b| {
        b.span
            .cmp(&a.span)
            .then_with(|| a.start.cmp(&b.start))
            .then_with(|| a.end.cmp(&b.end))
    });
    ranked.truncate(top_n);
    ranked
}

/// Convert a frame into its report entry
pub fn summarize_pattern(trace: &Trace, frame: &PatternFrame) -> PatternSummary {
    PatternSummary {
        start: frame.start,
        end: frame.end,
        length: frame.len(),
        count: frame.count,
        span: frame.span,
        coverage_percent: pattern_coverage(frame, trace.len()),
        merged_from: frame.merged_from,
        intervals: frame.intervals.iter().map(|iv| [iv.lo, iv.hi]).collect(),
        body: frame.render_body(trace),
    }
}

/// Report entries for the `top_n` frames with the largest span
pub fn summarize_patterns(trace: &Trace, frames: &[PatternFrame], top_n: usize) -> Vec<PatternSummary> {
    debug!("Summarizing top {} of {} patterns", top_n, frames.len());

    top_patterns(frames, top_n)
        .into_iter()
        .map(|frame| summarize_pattern(trace, frame))
        .collect()
}

/// Calculate coverage statistics
///
/// **Public** - provides summary statistics
///
/// # Arguments
/// * `frames` - Frames after filtering
/// * `trace_length` - Length of the trace they were found in
///
/// # Returns
/// Statistics about how the trace is covered
pub fn calculate_coverage_distribution(
    frames: &[PatternFrame],
    trace_length: usize,
) -> CoverageDistribution {
    if frames.is_empty() {
        return CoverageDistribution::default();
    }

    let frame_count = frames.len();
    let span_sum: usize = frames.iter().map(|f| f.span).sum();
    let mean_span = span_sum / frame_count;

    let mut spans: Vec<usize> = frames.iter().map(|f| f.span).collect();
    spans.sort_unstable();
    let median_span = spans[spans.len() / 2];

    let mut covered: Vec<Interval> = frames
        .iter()
        .flat_map(|f| f.intervals.iter().copied())
        .collect();
    normalize(&mut covered);
    let covered_events = total_span(&covered);

    CoverageDistribution {
        frame_count,
        total_span: span_sum,
        mean_span,
        median_span,
        covered_events,
        covered_percent: if trace_length > 0 {
            (covered_events as f64 / trace_length as f64) * 100.0
        } else {
            0.0
        },
    }
}

impl CoverageDistribution {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and the text summary
    pub fn summary(&self) -> String {
        format!(
            "Frames: {} | Total span: {} | Mean: {} | Median: {} | Covered: {} events ({:.1}%)",
            self.frame_count,
            self.total_span,
            self.mean_span,
            self.median_span,
            self.covered_events,
            self.covered_percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(start: usize, end: usize, intervals: &[(usize, usize)]) -> PatternFrame {
        let intervals: Vec<Interval> =
            intervals.iter().map(|&(lo, hi)| Interval::new(lo, hi)).collect();
        PatternFrame::new(start, end, intervals.len(), intervals)
    }

    #[test]
    fn test_top_patterns_by_span() {
        let frames = vec![
            frame(0, 4, &[(0, 4)]),
            frame(10, 16, &[(10, 16), (20, 26)]),
            frame(30, 34, &[(30, 34), (40, 44)]),
        ];

        let top = top_patterns(&frames, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].start, 10);
        assert_eq!(top[1].start, 30);
    }

    #[test]
    fn test_coverage_distribution() {
        let frames = vec![frame(0, 4, &[(0, 4), (4, 8)]), frame(2, 6, &[(2, 6)])];

        let dist = calculate_coverage_distribution(&frames, 20);

        assert_eq!(dist.frame_count, 2);
        assert_eq!(dist.total_span, 12);
        assert_eq!(dist.mean_span, 6);
        assert_eq!(dist.median_span, 8);
        assert_eq!(dist.covered_events, 8);
        assert_eq!(dist.covered_percent, 40.0);
    }

    #[test]
    fn test_coverage_distribution_empty() {
        let dist = calculate_coverage_distribution(&[], 20);
        assert_eq!(dist.frame_count, 0);
        assert_eq!(dist.covered_events, 0);
    }

    #[test]
    fn test_pattern_coverage() {
        let f = frame(0, 4, &[(0, 4), (10, 14)]);
        assert_eq!(pattern_coverage(&f, 16), 50.0);
        assert_eq!(pattern_coverage(&f, 0), 0.0);
    }
}
