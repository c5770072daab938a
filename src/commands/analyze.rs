//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads and validates the trace
//! 2. Loads discovery parameters
//! 3. Discovers patterns
//! 4. Runs the filter stages
//! 5. Calculates metrics and renders the flamegraph
//! 6. Writes output files

use super::models::AnalyzeArgs;
use crate::aggregator::{
    build_collapsed_stacks, build_pattern_shapes, calculate_coverage_distribution, summarize_patterns,
    top_patterns,
};
use crate::discovery::{DiscoveryStats, PatternFinder, PatternFrame};
use crate::filters::FilterPipeline;
use crate::flamegraph::{generate_flamegraph, generate_text_summary};
use crate::output::{write_report, write_svg};
use crate::parser::{read_trace, PatternReport, Trace, TraceSummary};
use crate::utils::config::{load_config, AnalysisConfig, FilterConfig};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Frames that survived filtering, plus what it took to get them
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub frames: Vec<PatternFrame>,

    /// Frames accepted by discovery, before filtering
    pub discovered: usize,

    pub stats: DiscoveryStats,
}

/// Discovery followed by the configured filter stages
///
/// **Public** - the batch pipeline without any file I/O
pub fn run_analysis(trace: &Trace, config: &AnalysisConfig, filters: FilterConfig) -> AnalysisOutcome {
    let mut finder = PatternFinder::new(trace, *config);
    let frames = finder.find();
    let discovered = frames.len();

    let frames = FilterPipeline::new(trace, filters).run(frames);

    AnalysisOutcome {
        frames,
        discovered,
        stats: finder.stats(),
    }
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Analyze command arguments
///
/// # Returns
/// The report that was written
///
/// # Errors
/// * Trace read or validation errors
/// * Config parse errors
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = AnalyzeArgs {
///     input: PathBuf::from("data/processed_data"),
///     print_summary: true,
///     ..Default::default()
/// };
///
/// let report = execute_analyze(args)?;
/// ```
pub fn execute_analyze(args: AnalyzeArgs) -> Result<PatternReport> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.input.display());

    // Step 1: Read trace
    info!("Step 1/6: Reading trace...");
    let trace = read_trace(&args.input)
        .with_context(|| format!("Failed to read trace from {}", args.input.display()))?;

    debug!(
        "Trace: {} events, {} functions",
        trace.len(),
        trace.names().len()
    );

    // Step 2: Load config
    info!("Step 2/6: Loading analysis config...");
    let config = match &args.config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    debug!("Analysis config: {:?}", config);

    // Steps 3 and 4: Discover and filter
    info!("Step 3/6: Discovering patterns...");
    info!("Step 4/6: Filtering patterns ({:?})...", args.filters);
    let outcome = run_analysis(&trace, &config, args.filters);

    info!(
        "Found {} patterns ({} discovered before filtering)",
        outcome.frames.len(),
        outcome.discovered
    );

    // Step 5: Metrics and flamegraph
    info!("Step 5/6: Calculating metrics...");
    let coverage = calculate_coverage_distribution(&outcome.frames, trace.len());
    info!("Coverage: {}", coverage.summary());

    let patterns = summarize_patterns(&trace, &outcome.frames, args.top_patterns);
    let top: Vec<PatternFrame> = top_patterns(&outcome.frames, args.top_patterns)
        .into_iter()
        .cloned()
        .collect();

    let svg_content = if args.output_svg.is_some() {
        let stacks = build_collapsed_stacks(&trace, &top);

        if stacks.is_empty() {
            info!("No patterns to draw, skipping flamegraph");
            None
        } else {
            let svg = generate_flamegraph(&stacks, args.flamegraph_config.as_ref())
                .context("Failed to generate flamegraph")?;
            Some(svg)
        }
    } else {
        debug!("Skipping flamegraph generation (not requested)");
        None
    };

    // Step 6: Write outputs
    info!("Step 6/6: Writing output files...");
    let report = PatternReport::new(
        TraceSummary {
            source: args.input.display().to_string(),
            trace_length: trace.len(),
            function_count: trace.names().len(),
        },
        config,
        args.filters,
        outcome.frames.len(),
        coverage,
        patterns,
    );
    let report = if args.include_shapes {
        report.with_shapes(build_pattern_shapes(&trace, &top))
    } else {
        report
    };

    write_report(&report, &args.output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    if let (Some(svg), Some(svg_path)) = (svg_content, &args.output_svg) {
        write_svg(&svg, svg_path).context("Failed to write flamegraph SVG")?;
        info!("✓ Flamegraph written to: {}", svg_path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("PATTERN SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Trace:    {}", report.trace.source);
        println!("Events:   {}", report.trace.trace_length);
        println!("Patterns: {}", report.frame_count);
        println!("Coverage: {:.1}%", report.coverage.covered_percent);
        println!("\n{}", generate_text_summary(&report.patterns, 10));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.top_patterns == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top_patterns > 1000 {
        anyhow::bail!("top is too large (max 1000)");
    }

    if args.output_svg.as_ref() == Some(&args.output_json) {
        anyhow::bail!("JSON report and flamegraph cannot share an output path");
    }

    if args.output_json == args.input {
        anyhow::bail!("Report would overwrite the input trace");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_args_default() {
        assert!(validate_args(&AnalyzeArgs::default()).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        let args = AnalyzeArgs {
            input: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_zero() {
        let args = AnalyzeArgs {
            top_patterns: 0,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_too_large() {
        let args = AnalyzeArgs {
            top_patterns: 2000,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_shared_output() {
        let args = AnalyzeArgs {
            output_svg: Some(PathBuf::from("patterns.json")),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_run_analysis_without_filters() {
        let unit = ["enter:a", "enter:b", "exit:b", "exit:a"];
        let trace = Trace::from_entries(unit.iter().cycle().take(12)).unwrap();

        let outcome = run_analysis(&trace, &AnalysisConfig::default(), FilterConfig::disabled());

        assert_eq!(outcome.discovered, 1);
        assert_eq!(outcome.frames.len(), 1);
        assert_eq!(outcome.stats.accepted, 1);
    }
}
