use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a pattern report JSON file
pub fn validate_report_file(file_path: impl AsRef<Path>) -> Result<()> {
    let file_path = file_path.as_ref();
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        log::warn!(
            "Report schema v{} differs from current v{}",
            report.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Trace: {}", report.trace.source);
    println!("  Trace Length: {}", report.trace.trace_length);
    println!("  Patterns: {}", report.frame_count);
    println!("  Coverage: {:.1}%", report.coverage.covered_percent);

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Trace Pattern Studio Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  trace: object              - Analyzed trace");
        println!("    source: string           - Input path");
        println!("    trace_length: number     - Events including the root frame");
        println!("    function_count: number   - Distinct function names");
        println!("  config: object             - Discovery parameters");
        println!("  filters: object            - Filter stages that ran");
        println!("  frame_count: number        - Patterns surviving the filters");
        println!("  coverage: object           - Span statistics over all patterns");
        println!("  patterns: array            - Top patterns ranked by span");
        println!("    start, end: number       - Reference occurrence bounds");
        println!("    length: number           - Body length in events");
        println!("    count: number            - Raw occurrence count");
        println!("    span: number             - Events covered by all occurrences");
        println!("    coverage_percent: number - Span as percentage of the trace");
        println!("    merged_from: number      - Rotations folded into this pattern");
        println!("    intervals: array         - Occurrence intervals [lo, hi)");
        println!("    body: array              - Events of the reference occurrence");
        println!("  shapes: array (optional)   - Call structure of the trace, then of each pattern");
        println!("  generated_at: string       - RFC 3339 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Trace Pattern Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Repeated call-pattern mining for execution traces.");
}
