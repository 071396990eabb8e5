use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    /// A group reached the calculator with no values. Rankings filter empty groups out before
    /// scoring, so seeing this means a caller skipped that step.
    #[error("rating group has no values")]
    EmptyGroup,

    #[error("unknown rating metric '{name}' (expected average, sum, count, total or estimate)")]
    UnknownMetric { name: String },

    #[error("invalid prior weight '{value}': must be a finite non-negative number or 'mean'")]
    InvalidPriorWeight { value: String },
}

pub type MetricResult<T> = Result<T, MetricError>;
