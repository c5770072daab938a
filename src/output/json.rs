//! JSON report output writer.
//!
//! Writes PatternReport structs to JSON files with proper formatting.

use crate::parser::schema::PatternReport;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Report data to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = PatternReport::new(trace_summary, config, filters, n, coverage, patterns);
/// write_report(&report, "patterns.json")?;
/// ```
pub fn write_report(report: &PatternReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());
    prepare_output_path(output_path)?;

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;

    info!(
        "Report written successfully ({} bytes)",
        std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0)
    );

    Ok(())
}

/// Serialize a report to a pretty JSON string
pub fn report_to_string(report: &PatternReport) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Read a report from a JSON file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<PatternReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path)?;
    let report: PatternReport = serde_json::from_reader(file)?;

    debug!(
        "Report loaded: version {}, {} patterns from {}",
        report.version,
        report.patterns.len(),
        report.trace.source
    );

    Ok(report)
}

/// Reject unusable paths and create missing parent directories
///
/// **Internal** - shared by the JSON and SVG writers
pub(crate) fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{CoverageDistribution, PatternSummary, TraceSummary};
    use crate::utils::config::{AnalysisConfig, FilterConfig};
    use tempfile::NamedTempFile;

    fn create_test_report() -> PatternReport {
        PatternReport::new(
            TraceSummary {
                source: "test".to_string(),
                trace_length: 14,
                function_count: 3,
            },
            AnalysisConfig::default(),
            FilterConfig::enabled(),
            1,
            CoverageDistribution::default(),
            vec![PatternSummary {
                start: 0,
                end: 4,
                length: 4,
                count: 3,
                span: 12,
                coverage_percent: 85.7,
                merged_from: 1,
                intervals: vec![[0, 4], [4, 8], [8, 12]],
                body: vec![
                    "enter:a".to_string(),
                    "enter:b".to_string(),
                    "exit:b".to_string(),
                    "exit:a".to_string(),
                ],
            }],
        )
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_report(&report, path).unwrap();
        let loaded = read_report(path).unwrap();

        assert_eq!(loaded.version, report.version);
        assert_eq!(loaded.trace, report.trace);
        assert_eq!(loaded.patterns, report.patterns);
        assert_eq!(loaded.filters, report.filters);
    }

    #[test]
    fn test_report_to_string() {
        let json = report_to_string(&create_test_report()).unwrap();
        assert!(json.contains("\"frame_count\": 1"));
        assert!(json.contains("\"subsumption\": \"sub-pattern\""));
    }

    #[test]
    fn test_prepare_output_path_empty() {
        assert!(prepare_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_prepare_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(prepare_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/patterns.json");

        write_report(&create_test_report(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_read_missing_report() {
        let result = read_report("/nonexistent/patterns.json");
        assert!(matches!(result, Err(OutputError::WriteFailed(_))));
    }
}
