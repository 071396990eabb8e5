//! Metric calculator: sum, count, average and the confidence-weighted estimate.
//!
//! The estimate pulls groups with few events toward the population mean, so a single extreme
//! rating cannot outrank an entity with many consistent ones:
//!
//! ```text
//! estimate = n / (n + m) * average + m / (n + m) * global_mean
//! ```
//!
//! `global_mean` is the mean of every value in the query (same rateable kind, same scope) and
//! `m` comes from [`PriorWeight`].

pub mod calculator;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use calculator::{average, count, estimate, global_mean, sum};
pub use error::{MetricError, MetricResult};
pub use types::{AggregateScore, Metric, Population, PriorWeight};
