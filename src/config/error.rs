//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::metrics::MetricError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Prior weight is neither a non-negative number nor `mean`.
    #[error("invalid RATING_PRIOR_WEIGHT '{value}': {source}")]
    InvalidPriorWeight {
        value: String,
        #[source]
        source: MetricError,
    },

    /// Default metric name is not one the engine knows.
    #[error("invalid RATING_DEFAULT_METRIC '{value}': {source}")]
    InvalidMetric {
        value: String,
        #[source]
        source: MetricError,
    },

    /// Default direction is not `asc`/`desc`.
    #[error("invalid RATING_DEFAULT_DIRECTION '{value}': expected asc or desc")]
    InvalidDirection { value: String },

    /// A numeric variable could not be parsed.
    #[error("failed to parse {name} '{value}': {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
