use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::calculator;
use super::error::{MetricError, MetricResult};
use crate::constants::DEFAULT_PRIOR_WEIGHT;
use crate::reference::EntityId;

/// Aggregate a ranking orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Average,
    Sum,
    /// Number of events; also accepted as `total`.
    #[serde(alias = "total")]
    Count,
    #[default]
    Estimate,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Average, Metric::Sum, Metric::Count, Metric::Estimate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Average => "average",
            Metric::Sum => "sum",
            Metric::Count => "count",
            Metric::Estimate => "estimate",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "average" | "avg" => Ok(Metric::Average),
            "sum" => Ok(Metric::Sum),
            "count" | "total" => Ok(Metric::Count),
            "estimate" => Ok(Metric::Estimate),
            _ => Err(MetricError::UnknownMetric {
                name: s.to_string(),
            }),
        }
    }
}

/// How much prior belief the estimate metric gives the population mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriorWeight {
    /// A fixed number of "votes" at the global mean.
    Fixed(f64),
    /// The average group size of the query (events / groups).
    MeanGroupSize,
}

impl Default for PriorWeight {
    fn default() -> Self {
        PriorWeight::Fixed(DEFAULT_PRIOR_WEIGHT)
    }
}

impl PriorWeight {
    /// Rejects negative or non-finite fixed weights.
    pub fn validate(&self) -> MetricResult<()> {
        match self {
            PriorWeight::Fixed(m) if !m.is_finite() || *m < 0.0 => {
                Err(MetricError::InvalidPriorWeight {
                    value: m.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Resolves to a concrete `m` for a query with `values` events spread over `groups` groups.
    pub fn resolve(&self, values: usize, groups: usize) -> f64 {
        match self {
            PriorWeight::Fixed(m) => *m,
            PriorWeight::MeanGroupSize if groups == 0 => 0.0,
            PriorWeight::MeanGroupSize => values as f64 / groups as f64,
        }
    }
}

impl fmt::Display for PriorWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorWeight::Fixed(m) => write!(f, "{}", m),
            PriorWeight::MeanGroupSize => f.write_str("mean"),
        }
    }
}

impl FromStr for PriorWeight {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("mean") {
            return Ok(PriorWeight::MeanGroupSize);
        }

        let weight = trimmed
            .parse::<f64>()
            .map(PriorWeight::Fixed)
            .map_err(|_| MetricError::InvalidPriorWeight {
                value: s.to_string(),
            })?;
        weight.validate()?;
        Ok(weight)
    }
}

/// Population-wide inputs to the estimate metric, computed once per query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Population {
    /// Mean of every value in every group of the query.
    pub mean: f64,
    /// Resolved prior weight `m`.
    pub prior_weight: f64,
}

impl Population {
    /// Computes the population over `groups`, ignoring empty ones.
    ///
    /// Fails with [`MetricError::InvalidPriorWeight`] for a negative or non-finite fixed weight.
    pub fn from_groups(
        groups: &BTreeMap<EntityId, Vec<f64>>,
        prior: PriorWeight,
    ) -> MetricResult<Self> {
        let non_empty: Vec<&[f64]> = groups
            .values()
            .filter(|v| !v.is_empty())
            .map(Vec::as_slice)
            .collect();
        let values: usize = non_empty.iter().map(|v| v.len()).sum();
        prior.validate()?;

        Ok(Self {
            mean: calculator::global_mean(non_empty.iter().copied())?,
            prior_weight: prior.resolve(values, non_empty.len()),
        })
    }
}

/// Every metric for one rateable, as computed for a single query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateScore {
    pub rateable_id: EntityId,
    pub sum: f64,
    pub count: usize,
    pub average: f64,
    pub estimate: f64,
}

impl AggregateScore {
    /// Reduces one group's values to its aggregate.
    pub fn compute(
        rateable_id: EntityId,
        values: &[f64],
        population: &Population,
    ) -> MetricResult<Self> {
        Ok(Self {
            rateable_id,
            sum: calculator::sum(values)?,
            count: calculator::count(values)?,
            average: calculator::average(values)?,
            estimate: calculator::estimate(values, population.mean, population.prior_weight)?,
        })
    }

    /// Returns the value `metric` orders by.
    #[inline]
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Average => self.average,
            Metric::Sum => self.sum,
            Metric::Count => self.count as f64,
            Metric::Estimate => self.estimate,
        }
    }
}
