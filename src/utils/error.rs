//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while building a trace
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Malformed event at index {index}: {entry:?} (expected <enter|exit>:<name>)")]
    MalformedEvent { index: usize, entry: String },

    #[error("Unbalanced trace at index {index}: {reason}")]
    UnbalancedTrace { index: usize, reason: String },

    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading analysis configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid analysis configuration: {0}")]
    Invalid(String),

    #[error("Config TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Empty stack data")]
    EmptyStacks,

    #[error("Failed to render flamegraph: {0}")]
    RenderFailed(String),

    #[error("Flamegraph output is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
