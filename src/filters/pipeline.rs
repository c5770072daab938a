//! Filter stages chained after discovery.

use super::rotation::RotationFilter;
use super::subsumption::{PartialPatternFilter, SubPatternFilter};
use crate::discovery::PatternFrame;
use crate::parser::Trace;
use crate::utils::config::{FilterConfig, SubsumptionMode};
use log::debug;

/// Rotation collapse, then whichever subsumption variant is configured
///
/// Frames move through the stages by value, so each stage owns every frame
/// while it runs.
pub struct FilterPipeline<'t> {
    trace: &'t Trace,
    config: FilterConfig,
}

impl<'t> FilterPipeline<'t> {
    pub fn new(trace: &'t Trace, config: FilterConfig) -> Self {
        Self { trace, config }
    }

    pub fn config(&self) -> FilterConfig {
        self.config
    }

    /// Run the enabled stages over the discovered frames
    ///
    /// # Returns
    /// Surviving frames sorted by reference occurrence `(start, end)`
    pub fn run(&self, frames: Vec<PatternFrame>) -> Vec<PatternFrame> {
        let mut frames = frames;

        if self.config.rotation {
            frames = RotationFilter::new(self.trace).apply(frames);
        }

        frames = match self.config.subsumption {
            SubsumptionMode::None => frames,
            SubsumptionMode::Partial => PartialPatternFilter::new(self.trace).apply(frames),
            SubsumptionMode::SubPattern => SubPatternFilter::new(self.trace).apply(frames),
        };

        frames.sort_by_key(|f| (f.start, f.end));
        debug!("Filter pipeline kept {} frames", frames.len());

        frames
    }
}

/// Convenience wrapper: run the configured filter stages
pub fn apply_filters(
    trace: &Trace,
    frames: Vec<PatternFrame>,
    config: FilterConfig,
) -> Vec<PatternFrame> {
    FilterPipeline::new(trace, config).run(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;

    #[test]
    fn test_disabled_pipeline_only_sorts() {
        let trace = Trace::from_entries(["enter:a", "exit:a", "enter:b", "exit:b"]).unwrap();
        let frames = vec![
            PatternFrame::new(2, 4, 1, vec![Interval::new(2, 4)]),
            PatternFrame::new(0, 4, 1, vec![Interval::new(0, 4)]),
        ];

        let out = apply_filters(&trace, frames, FilterConfig::disabled());

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].start, 0);
        assert_eq!(out[1].start, 2);
    }
}
