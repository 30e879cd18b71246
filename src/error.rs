//! Error types for loading and validating analyzer configuration.
//!
//! The classifiers themselves never fail: degenerate input maps to defaults.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("opinion fallback {0:?} is not a category of the taxonomy")]
    UnknownFallback(String),

    #[error("journey stage table is empty")]
    EmptyStageTable,

    #[error("invalid keyword settings: {0}")]
    InvalidKeywordSettings(String),
}

impl AnalyzerError {
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }
}
