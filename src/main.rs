//! Trace Pattern Studio CLI
//!
//! Mines execution traces for repeated call patterns.
//! Writes JSON reports and flamegraphs of the patterns found.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use trace_pattern_studio::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs,
};
use trace_pattern_studio::flamegraph::FlamegraphConfig;
use trace_pattern_studio::utils::config::{FilterConfig, SubsumptionMode, DEFAULT_TRACE_PATH};

/// Trace Pattern Studio - repeated call-pattern mining
#[derive(Parser, Debug)]
#[command(name = "trace-patterns")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover repeated patterns in a trace
    Analyze {
        /// Comma-separated `<enter|exit>:<name>` trace file
        #[arg(default_value = DEFAULT_TRACE_PATH)]
        input: PathBuf,

        /// TOML file with discovery parameters
        #[arg(short, long, env = "TRACE_PATTERNS_CONFIG")]
        config: Option<PathBuf>,

        /// Report raw discovery output (no rotation or subsumption filtering)
        #[arg(long)]
        no_filters: bool,

        /// Subsumption variant to run after rotation collapse
        #[arg(long, value_enum, default_value_t = SubsumptionMode::SubPattern)]
        subsumption: SubsumptionMode,

        /// Output path for JSON report
        #[arg(short, long, default_value = "patterns.json")]
        output: PathBuf,

        /// Output path for SVG flamegraph (optional)
        #[arg(short, long)]
        flamegraph: Option<PathBuf>,

        /// Number of top patterns to report
        #[arg(long, default_value = "20")]
        top: usize,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Include the call structure of each reported pattern in the report
        #[arg(long)]
        shapes: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            no_filters,
            subsumption,
            output,
            flamegraph,
            top,
            title,
            width,
            summary,
            shapes,
        } => {
            let filters = if no_filters {
                FilterConfig::disabled()
            } else {
                FilterConfig::enabled().with_subsumption(subsumption)
            };

            let fg_config = flamegraph.as_ref().map(|_| {
                let config = FlamegraphConfig::new().with_width(width);
                match title {
                    Some(title) => config.with_title(title),
                    None => config,
                }
            });

            let args = AnalyzeArgs {
                input,
                config_path: config,
                filters,
                output_json: output,
                output_svg: flamegraph,
                top_patterns: top,
                flamegraph_config: fg_config,
                print_summary: summary,
                include_shapes: shapes,
            };

            validate_args(&args)?;
            let report = execute_analyze(args)?;
            println!("{} patterns", report.frame_count);
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
