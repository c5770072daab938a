use crate::flamegraph::FlamegraphConfig;
use crate::utils::config::{FilterConfig, DEFAULT_TRACE_PATH};
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Comma-separated trace file
    pub input: PathBuf,

    /// TOML file with discovery parameters (optional)
    pub config_path: Option<PathBuf>,

    /// Filter stages to run after discovery
    pub filters: FilterConfig,

    /// Output path for JSON report
    pub output_json: PathBuf,

    /// Output path for SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Number of top patterns to include in the report
    pub top_patterns: usize,

    /// Flamegraph configuration
    pub flamegraph_config: Option<FlamegraphConfig>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Embed the call structure of each reported pattern in the report
    pub include_shapes: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_TRACE_PATH),
            config_path: None,
            filters: FilterConfig::enabled(),
            output_json: PathBuf::from("patterns.json"),
            output_svg: None,
            top_patterns: 20,
            flamegraph_config: None,
            print_summary: false,
            include_shapes: false,
        }
    }
}
