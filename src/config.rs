//! Local-search configuration.
//!
//! # Examples
//!
//! ```
//! use u_tours::config::LocalSearchConfig;
//!
//! let config = LocalSearchConfig::from_json_str(r#"{
//!     "max_seq_len": 4,
//!     "wrap_sequences": true,
//!     "seed": 7
//! }"#).unwrap();
//!
//! assert_eq!(config.max_seq_len, 4);
//! assert_eq!(config.min_seq_len, 2);
//! assert_eq!(config.seed, Some(7));
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables of the local-search operators and the descent driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    /// Smallest gain that counts as an improvement.
    pub epsilon: f64,

    /// Shortest window tried by sequence moves.
    pub min_seq_len: usize,

    /// Longest window tried by sequence moves.
    pub max_seq_len: usize,

    /// Whether sequence windows may cross the seam of closed tours.
    pub wrap_sequences: bool,

    /// Whether windows that cannot pay for their removal are skipped.
    pub prune_sequences: bool,

    /// Upper bound on descent passes.
    pub max_passes: usize,

    /// Largest cache drift tolerated silently when reconciling.
    pub drift_tolerance: f64,

    /// Seed for shuffling the tour-pair order; `None` keeps index order.
    pub seed: Option<u64>,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            min_seq_len: 2,
            max_seq_len: 3,
            wrap_sequences: false,
            prune_sequences: true,
            max_passes: 100,
            drift_tolerance: 5.0,
            seed: None,
        }
    }
}

impl LocalSearchConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parses and validates configuration from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values are usable together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.epsilon.is_nan() || self.epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "epsilon must be non-negative, got {}",
                self.epsilon
            )));
        }
        if self.min_seq_len < 2 {
            return Err(ConfigError::Invalid(
                "min_seq_len must be at least 2; single visits use the plain moves".into(),
            ));
        }
        if self.max_seq_len < self.min_seq_len {
            return Err(ConfigError::Invalid(format!(
                "max_seq_len ({}) is below min_seq_len ({})",
                self.max_seq_len, self.min_seq_len
            )));
        }
        if self.drift_tolerance.is_nan() || self.drift_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "drift_tolerance must be non-negative, got {}",
                self.drift_tolerance
            )));
        }
        Ok(())
    }

    /// Sets the improvement threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the window length range of sequence moves.
    pub fn with_seq_len(mut self, min: usize, max: usize) -> Self {
        self.min_seq_len = min;
        self.max_seq_len = max;
        self
    }

    /// Allows or forbids windows across closed-tour seams.
    pub fn with_wrap_sequences(mut self, wrap: bool) -> Self {
        self.wrap_sequences = wrap;
        self
    }

    /// Turns window pruning on or off.
    pub fn with_prune_sequences(mut self, prune: bool) -> Self {
        self.prune_sequences = prune;
        self
    }

    /// Sets the pass limit.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Sets the reconciliation drift tolerance.
    pub fn with_drift_tolerance(mut self, tolerance: f64) -> Self {
        self.drift_tolerance = tolerance;
        self
    }

    /// Sets the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LocalSearchConfig::default();
        assert_eq!(config.epsilon, 1e-6);
        assert_eq!((config.min_seq_len, config.max_seq_len), (2, 3));
        assert!(!config.wrap_sequences);
        assert!(config.prune_sequences);
        assert_eq!(config.max_passes, 100);
        assert_eq!(config.drift_tolerance, 5.0);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = LocalSearchConfig::from_json_str("{}").expect("valid");
        assert_eq!(config, LocalSearchConfig::default());
    }

    #[test]
    fn test_builder() {
        let config = LocalSearchConfig::new()
            .with_epsilon(1e-3)
            .with_seq_len(2, 5)
            .with_wrap_sequences(true)
            .with_prune_sequences(false)
            .with_max_passes(7)
            .with_drift_tolerance(0.5)
            .with_seed(11);
        assert_eq!(config.max_seq_len, 5);
        assert!(config.wrap_sequences);
        assert!(!config.prune_sequences);
        assert_eq!(config.seed, Some(11));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_lengths() {
        let err = LocalSearchConfig::from_json_str(r#"{ "min_seq_len": 4, "max_seq_len": 3 }"#)
            .expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));
        let config = LocalSearchConfig::new().with_seq_len(1, 3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_json() {
        let err = LocalSearchConfig::from_json_str("{ epsilon: }").expect_err("invalid");
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = LocalSearchConfig::from_json_file("/nonexistent/local_search.json")
            .expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = LocalSearchConfig::new().with_seed(3);
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(LocalSearchConfig::from_json_str(&json).expect("parse"), config);
    }
}
