//! SVG flamegraph generation through inferno.
//!
//! Pattern bodies are turned into collapsed stacks by the aggregator and
//! handed to `inferno::flamegraph` line by line. Each pattern sits on its own
//! base frame, so several patterns can share one graph.

use crate::aggregator::stack_builder::CollapsedStack;
use crate::parser::schema::PatternSummary;
use crate::utils::error::FlamegraphError;
use inferno::flamegraph::color::{BasicPalette, Palette};
use inferno::flamegraph::{self, Options};
use log::info;

/// Colour scheme of the rendered graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlamegraphPalette {
    #[default]
    Hot,
    Aqua,
    Blue,
}

impl FlamegraphPalette {
    fn to_inferno(self) -> Palette {
        match self {
            FlamegraphPalette::Hot => Palette::Basic(BasicPalette::Hot),
            FlamegraphPalette::Aqua => Palette::Basic(BasicPalette::Aqua),
            FlamegraphPalette::Blue => Palette::Basic(BasicPalette::Blue),
        }
    }
}

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
    pub palette: FlamegraphPalette,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Call Trace Patterns".to_string(),
            width: 1200,
            palette: FlamegraphPalette::default(),
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_palette(mut self, palette: FlamegraphPalette) -> Self {
        self.palette = palette;
        self
    }
}

/// Generate SVG flamegraph from collapsed stacks
///
/// **Public** - main entry point for flamegraph rendering
///
/// # Arguments
/// * `stacks` - Collapsed stacks from the stack builder
/// * `config` - Rendering options; defaults when `None`
///
/// # Returns
/// The SVG document as a string
///
/// # Errors
/// * `FlamegraphError::EmptyStacks` - nothing to draw
/// * `FlamegraphError::RenderFailed` - inferno rejected the input
pub fn generate_flamegraph(
    stacks: &[CollapsedStack],
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    if stacks.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    let config = config.cloned().unwrap_or_default();
    info!("Generating flamegraph with {} stacks", stacks.len());

    let mut options = Options::default();
    options.title = config.title.clone();
    options.count_name = "steps".to_string();
    options.image_width = Some(config.width);
    options.colors = config.palette.to_inferno();

    let lines: Vec<String> = stacks.iter().map(CollapsedStack::to_line).collect();
    let mut svg = Vec::new();
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| FlamegraphError::RenderFailed(e.to_string()))?;

    let svg = String::from_utf8(svg)?;
    info!("Flamegraph generated successfully ({} bytes)", svg.len());

    Ok(svg)
}

/// Create a text summary table of the reported patterns
pub fn generate_text_summary(patterns: &[PatternSummary], max_lines: usize) -> String {
    let mut lines = Vec::new();

    lines.push("  REPEATED CALL PATTERNS".to_string());
    lines.push(format!(
        "  {:>4}  {:<18} {:>7} {:>7} {:>9} {:>8}",
        "#", "Occurrence", "Length", "Count", "Span", "%"
    ));
    lines.push(format!("  {}", "-".repeat(58)));

    for (rank, pattern) in patterns.iter().take(max_lines).enumerate() {
        lines.push(format!(
            "  {:>4}  {:<18} {:>7} {:>7} {:>9} {:>7.1}%",
            rank + 1,
            format!("[{}..{}]", pattern.start, pattern.end),
            pattern.length,
            pattern.count,
            pattern.span,
            pattern.coverage_percent
        ));
    }

    if patterns.is_empty() {
        lines.push("  (no patterns found)".to_string());
    }

    if let Some(top) = patterns.first() {
        lines.push(String::new());
        lines.push(format!("  Top pattern body ({} events):", top.length));
        for event in top.body.iter().take(12) {
            lines.push(format!("    {}", event));
        }
        if top.body.len() > 12 {
            lines.push(format!("    ... {} more", top.body.len() - 12));
        }
    }

    if patterns.len() > max_lines {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} patterns)",
            max_lines,
            patterns.len()
        ));
    }

    lines.join("\n")
}
