//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RATING_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::constants::DEFAULT_CACHE_CAPACITY;
use crate::metrics::{Metric, PriorWeight};
use crate::ranking::Direction;

/// Engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RATING_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Prior weight `m` of the estimate metric. Default: `2.0`.
    pub prior_weight: PriorWeight,

    /// Metric used when a caller does not pick one. Default: `estimate`.
    pub default_metric: Metric,

    /// Direction used when a caller does not pick one. Default: descending.
    pub default_direction: Direction,

    /// SQLite database file. `None` keeps events in memory.
    pub store_path: Option<PathBuf>,

    /// Max `(kind, scope)` score sets kept in the ranking cache; `0` disables it.
    /// Default: `1024`.
    pub cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prior_weight: PriorWeight::default(),
            default_metric: Metric::default(),
            default_direction: Direction::default(),
            store_path: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Config {
    const ENV_PRIOR_WEIGHT: &'static str = "RATING_PRIOR_WEIGHT";
    const ENV_DEFAULT_METRIC: &'static str = "RATING_DEFAULT_METRIC";
    const ENV_DEFAULT_DIRECTION: &'static str = "RATING_DEFAULT_DIRECTION";
    const ENV_STORE_PATH: &'static str = "RATING_STORE_PATH";
    const ENV_CACHE_CAPACITY: &'static str = "RATING_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let prior_weight = Self::parse_prior_weight_from_env(defaults.prior_weight)?;
        let default_metric = Self::parse_metric_from_env(defaults.default_metric)?;
        let default_direction = Self::parse_direction_from_env(defaults.default_direction)?;
        let store_path = Self::parse_optional_path_from_env(Self::ENV_STORE_PATH);
        let cache_capacity =
            Self::parse_u64_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity)?;

        Ok(Self {
            prior_weight,
            default_metric,
            default_direction,
            store_path,
            cache_capacity,
        })
    }

    /// Validates the prior weight and the store path (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.prior_weight
            .validate()
            .map_err(|source| ConfigError::InvalidPriorWeight {
                value: self.prior_weight.to_string(),
                source,
            })?;

        if let Some(ref path) = self.store_path {
            if path.is_dir() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !parent.exists() {
                    return Err(ConfigError::PathNotFound {
                        path: parent.to_path_buf(),
                    });
                }
                if !parent.is_dir() {
                    return Err(ConfigError::NotADirectory {
                        path: parent.to_path_buf(),
                    });
                }
            }
        }

        Ok(())
    }

    fn parse_prior_weight_from_env(default: PriorWeight) -> Result<PriorWeight, ConfigError> {
        match env::var(Self::ENV_PRIOR_WEIGHT) {
            Ok(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidPriorWeight { value, source }),
            Err(_) => Ok(default),
        }
    }

    fn parse_metric_from_env(default: Metric) -> Result<Metric, ConfigError> {
        match env::var(Self::ENV_DEFAULT_METRIC) {
            Ok(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidMetric { value, source }),
            Err(_) => Ok(default),
        }
    }

    fn parse_direction_from_env(default: Direction) -> Result<Direction, ConfigError> {
        match env::var(Self::ENV_DEFAULT_DIRECTION) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidDirection { value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source,
                }),
            Err(_) => Ok(default),
        }
    }
}
