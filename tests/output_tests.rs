use trace_pattern_studio::aggregator::{
    build_collapsed_stacks, build_pattern_shapes, calculate_coverage_distribution, summarize_patterns,
};
use trace_pattern_studio::discovery::find_patterns;
use trace_pattern_studio::flamegraph::{generate_flamegraph, generate_text_summary};
use trace_pattern_studio::output::{read_report, write_report, write_svg};
use trace_pattern_studio::parser::{PatternReport, Trace, TraceSummary};
use trace_pattern_studio::utils::config::{AnalysisConfig, FilterConfig};

fn repeated_trace() -> Trace {
    let unit = ["enter:main", "enter:io", "exit:io", "enter:calc", "exit:calc", "exit:main"];
    Trace::from_entries(unit.iter().cycle().take(unit.len() * 3)).unwrap()
}

#[test]
fn test_report_round_trip_from_discovery() {
    let trace = repeated_trace();
    let config = AnalysisConfig::default();
    let frames = find_patterns(&trace, &config);

    let coverage = calculate_coverage_distribution(&frames, trace.len());
    let patterns = summarize_patterns(&trace, &frames, 10);
    let report = PatternReport::new(
        TraceSummary {
            source: "memory".to_string(),
            trace_length: trace.len(),
            function_count: trace.names().len(),
        },
        config,
        FilterConfig::disabled(),
        frames.len(),
        coverage,
        patterns,
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    write_report(&report, &path).unwrap();
    let loaded = read_report(&path).unwrap();

    assert_eq!(loaded.frame_count, frames.len());
    assert_eq!(loaded.coverage, report.coverage);
    assert_eq!(loaded.patterns[0].body.len(), loaded.patterns[0].length);
    assert_eq!(loaded.patterns[0].body[0], "enter:main");
}

#[test]
fn test_shapes_and_flamegraph_from_discovery() {
    let trace = repeated_trace();
    let frames = find_patterns(&trace, &AnalysisConfig::default());

    let shapes = build_pattern_shapes(&trace, &frames);
    assert_eq!(shapes.len(), frames.len() + 1);
    assert_eq!(shapes[0].pattern_length, 18);
    assert_eq!(shapes.iter().skip(1).map(|s| s.max_stack_depth).max(), Some(2));

    let stacks = build_collapsed_stacks(&trace, &frames);
    let total: u64 = stacks.iter().map(|s| s.weight).sum();
    assert_eq!(total as usize, frames.iter().map(|f| f.len()).sum::<usize>());

    let svg = generate_flamegraph(&stacks, None).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patterns.svg");
    write_svg(&svg, &path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_text_summary_lists_patterns() {
    let trace = repeated_trace();
    let frames = find_patterns(&trace, &AnalysisConfig::default());
    let patterns = summarize_patterns(&trace, &frames, 10);

    let text = generate_text_summary(&patterns, 10);

    assert!(text.contains("REPEATED CALL PATTERNS"));
    assert!(text.contains("enter:main"));
}
