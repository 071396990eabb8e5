use thiserror::Error;

use crate::metrics::MetricError;
use crate::store::StoreError;

/// Errors surfaced by ranking queries and the [`RatingEngine`](super::RatingEngine).
#[derive(Debug, Error)]
pub enum RankingError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error("unknown sort direction '{name}' (expected asc or desc)")]
    UnknownDirection { name: String },
}

impl RankingError {
    /// Returns `true` if a write was rejected for a missing or malformed reference.
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, RankingError::Store(e) if e.is_invalid_reference())
    }

    /// Returns `true` if an unsupported metric name was requested.
    pub fn is_unknown_metric(&self) -> bool {
        matches!(self, RankingError::Metric(MetricError::UnknownMetric { .. }))
    }
}

pub type RankingResult<T> = Result<T, RankingError>;
