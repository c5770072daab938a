//! Configuration and constants for pattern analysis.

use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Where the batch entry point looks for a trace when none is given
pub const DEFAULT_TRACE_PATH: &str = "data/processed_data";

/// Function name of the synthetic frame wrapped around every trace
pub const ROOT_FUNCTION: &str = "root";

// Keep this above 0, the empty pattern occurs everywhere and tells us nothing.
pub const DEFAULT_MIN_PATTERN_LENGTH: usize = 4;

// Caps recursion depth and fan-out. Most real patterns are a few hundred events at most.
pub const DEFAULT_MAX_PATTERN_LENGTH: usize = 200;

/// A pattern whose span is at least this fraction explained by longer
/// extensions is treated as a redundant generalization.
pub const DEFAULT_COMMON_SPAN_THRESHOLD: f64 = 0.75;

/// Tuning parameters for the pattern finder
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Shortest body (in events) that may be accepted as a pattern
    pub min_pattern_length: usize,

    /// Longest body (in events) the finder will extend to
    pub max_pattern_length: usize,

    /// Rejection threshold for the extended-coverage ratio
    pub common_span_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_pattern_length: DEFAULT_MIN_PATTERN_LENGTH,
            max_pattern_length: DEFAULT_MAX_PATTERN_LENGTH,
            common_span_threshold: DEFAULT_COMMON_SPAN_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_pattern_length(mut self, length: usize) -> Self {
        self.min_pattern_length = length;
        self
    }

    pub fn with_max_pattern_length(mut self, length: usize) -> Self {
        self.max_pattern_length = length;
        self
    }

    pub fn with_common_span_threshold(mut self, threshold: f64) -> Self {
        self.common_span_threshold = threshold;
        self
    }

    /// Check the parameters describe a meaningful search
    ///
    /// # Errors
    /// * `ConfigError::Invalid` - zero minimum length, inverted bounds,
    ///   or a threshold outside (0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_pattern_length == 0 {
            return Err(ConfigError::Invalid(
                "min_pattern_length must be at least 1 (empty bodies are degenerate)".to_string(),
            ));
        }

        if self.max_pattern_length < self.min_pattern_length {
            return Err(ConfigError::Invalid(format!(
                "max_pattern_length ({}) is below min_pattern_length ({})",
                self.max_pattern_length, self.min_pattern_length
            )));
        }

        let threshold = self.common_span_threshold;
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "common_span_threshold must be in (0, 1], got {}",
                threshold
            )));
        }

        Ok(())
    }
}

/// Which subsumption variant runs after rotation collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SubsumptionMode {
    /// Skip subsumption filtering
    None,
    /// Embedding at any depth-0 split point, read linearly through the trace
    Partial,
    /// Embedding at a rotation split point, read cyclically through the body
    #[default]
    SubPattern,
}

/// Filter stages applied after discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Collapse cyclic rotations of the same repeating structure
    pub rotation: bool,

    /// Drop patterns that only ever occur nested in another
    pub subsumption: SubsumptionMode,
}

impl FilterConfig {
    /// Every filter stage on
    pub fn enabled() -> Self {
        Self {
            rotation: true,
            subsumption: SubsumptionMode::SubPattern,
        }
    }

    /// Raw discovery output
    pub fn disabled() -> Self {
        Self {
            rotation: false,
            subsumption: SubsumptionMode::None,
        }
    }

    pub fn with_subsumption(mut self, mode: SubsumptionMode) -> Self {
        self.subsumption = mode;
        self
    }

    pub fn is_disabled(&self) -> bool {
        !self.rotation && self.subsumption == SubsumptionMode::None
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::enabled()
    }
}

/// Load analysis parameters from a TOML file
///
/// Keys that are absent keep their defaults. The loaded config is validated.
///
/// # Example
/// ```ignore
/// let config = load_config("analysis.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AnalysisConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert_eq!(config.min_pattern_length, 4);
        assert_eq!(config.max_pattern_length, 200);
        assert_eq!(config.common_span_threshold, 0.75);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_min_length_rejected() {
        let config = AnalysisConfig::new().with_min_pattern_length(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = AnalysisConfig::new()
            .with_min_pattern_length(10)
            .with_max_pattern_length(5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(AnalysisConfig::new().with_common_span_threshold(0.0).validate().is_err());
        assert!(AnalysisConfig::new().with_common_span_threshold(1.5).validate().is_err());
        assert!(AnalysisConfig::new().with_common_span_threshold(f64::NAN).validate().is_err());
        assert!(AnalysisConfig::new().with_common_span_threshold(1.0).validate().is_ok());
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "min_pattern_length = 6").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.min_pattern_length, 6);
        assert_eq!(config.max_pattern_length, DEFAULT_MAX_PATTERN_LENGTH);
    }

    #[test]
    fn test_load_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "common_span_threshold = 2.0").unwrap();

        assert!(matches!(load_config(file.path()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_filter_config_toggle() {
        assert!(FilterConfig::disabled().is_disabled());
        assert!(!FilterConfig::enabled().is_disabled());
        assert_eq!(FilterConfig::default(), FilterConfig::enabled());
    }
}
