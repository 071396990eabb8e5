//! Pure ordering of grouped rating values.

use std::cmp::Ordering;

use tracing::debug;

use super::types::Direction;
use crate::metrics::{AggregateScore, Metric, MetricResult, Population, PriorWeight};
use crate::store::GroupedValues;

/// Turns grouped values into ordered aggregate scores.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ranker {
    prior: PriorWeight,
}

impl Ranker {
    pub fn new(prior: PriorWeight) -> Self {
        Self { prior }
    }

    pub fn prior(&self) -> PriorWeight {
        self.prior
    }

    /// Scores every non-empty group, in id order.
    ///
    /// The population mean and prior weight are computed once, over the same groups.
    pub fn score(&self, groups: &GroupedValues) -> MetricResult<Vec<AggregateScore>> {
        if groups.values().all(Vec::is_empty) {
            return Ok(Vec::new());
        }

        let population = Population::from_groups(groups, self.prior)?;
        debug!(
            groups = groups.len(),
            global_mean = population.mean,
            prior_weight = population.prior_weight,
            "Scoring rating groups"
        );

        groups
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(id, values)| AggregateScore::compute(id.clone(), values, &population))
            .collect()
    }

    /// Sorts `scores` by `metric` in `direction`. Ties fall back to ascending id order in
    /// either direction.
    pub fn order(scores: &mut [AggregateScore], metric: Metric, direction: Direction) {
        scores.sort_by(|a, b| {
            let by_score = a.value(metric).total_cmp(&b.value(metric));
            let by_score = match direction {
                Direction::Ascending => by_score,
                Direction::Descending => by_score.reverse(),
            };
            match by_score {
                Ordering::Equal => a.rateable_id.cmp(&b.rateable_id),
                other => other,
            }
        });
    }

    /// Scores and orders `groups` in one step.
    pub fn rank(
        &self,
        groups: &GroupedValues,
        metric: Metric,
        direction: Direction,
    ) -> MetricResult<Vec<AggregateScore>> {
        let mut scores = self.score(groups)?;
        Self::order(&mut scores, metric, direction);
        Ok(scores)
    }
}
