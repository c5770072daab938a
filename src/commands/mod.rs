//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analyze, run_analysis, validate_args, AnalysisOutcome};
pub use models::AnalyzeArgs;
pub use utils::{display_schema, display_version, validate_report_file};
