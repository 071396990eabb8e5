use std::collections::BTreeMap;

use super::*;
use crate::ranking::{Direction, Ranker};
use crate::reference::EntityId;

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn scenario_groups() -> BTreeMap<EntityId, Vec<f64>> {
    BTreeMap::from([
        (EntityId::Num(1), vec![100.0, 1.0]),
        (EntityId::Num(2), vec![11.0]),
        (EntityId::Num(3), vec![10.0]),
    ])
}

#[test]
fn test_sum_count_average() {
    let values = [100.0, 1.0];

    assert!(approx(sum(&values).unwrap(), 101.0));
    assert_eq!(count(&values).unwrap(), 2);
    assert!(approx(average(&values).unwrap(), 50.5));
}

#[test]
fn test_signed_values() {
    let values = [-3.0, 1.0];

    assert!(approx(sum(&values).unwrap(), -2.0));
    assert!(approx(average(&values).unwrap(), -1.0));
}

#[test]
fn test_empty_group_is_an_error() {
    assert_eq!(sum(&[]), Err(MetricError::EmptyGroup));
    assert_eq!(count(&[]), Err(MetricError::EmptyGroup));
    assert_eq!(average(&[]), Err(MetricError::EmptyGroup));
    assert_eq!(estimate(&[], 1.0, 2.0), Err(MetricError::EmptyGroup));
    assert_eq!(global_mean(Vec::<&[f64]>::new()), Err(MetricError::EmptyGroup));
}

#[test]
fn test_estimate_formula() {
    // n = 2, avg = 50.5, m = 2, mean = 30.5 → 0.5 * 50.5 + 0.5 * 30.5
    assert!(approx(estimate(&[100.0, 1.0], 30.5, 2.0).unwrap(), 40.5));
}

#[test]
fn test_estimate_with_zero_prior_is_average() {
    let values = [4.0, 8.0, 9.0];
    assert!(approx(
        estimate(&values, 100.0, 0.0).unwrap(),
        average(&values).unwrap()
    ));
}

#[test]
fn test_estimate_pulls_small_groups_toward_mean() {
    let mean = 3.0;
    let single_extreme = estimate(&[5.0], mean, 5.0).unwrap();
    let many_good = estimate(&[4.5; 40], mean, 5.0).unwrap();

    assert!(single_extreme < 5.0 && single_extreme > mean);
    assert!(many_good > single_extreme);
}

#[test]
fn test_estimate_monotonic_in_values() {
    let mut groups = scenario_groups();
    let target = EntityId::Num(3);
    let mut previous = f64::MIN;
    let mut previous_position = usize::MAX;

    for bump in [0.0, 1.0, 5.0, 50.0, 500.0] {
        groups.insert(target.clone(), vec![10.0 + bump]);
        let population = Population::from_groups(&groups, PriorWeight::default()).unwrap();
        let score =
            AggregateScore::compute(target.clone(), &groups[&target], &population).unwrap();

        assert!(score.estimate >= previous);
        previous = score.estimate;

        let ranked = Ranker::default()
            .rank(&groups, Metric::Estimate, Direction::Descending)
            .unwrap();
        let position = ranked
            .iter()
            .position(|s| s.rateable_id == target)
            .unwrap();
        assert!(position <= previous_position, "bump {bump} moved target down");
        previous_position = position;
    }
    assert_eq!(previous_position, 0);
}

#[test]
fn test_global_mean_spans_groups() {
    let groups = scenario_groups();
    let mean = global_mean(groups.values().map(Vec::as_slice)).unwrap();
    assert!(approx(mean, 30.5));
}

#[test]
fn test_population_skips_empty_groups() {
    let mut groups = scenario_groups();
    groups.insert(EntityId::Num(4), vec![]);

    let population = Population::from_groups(&groups, PriorWeight::MeanGroupSize).unwrap();
    assert!(approx(population.mean, 30.5));
    assert!(approx(population.prior_weight, 4.0 / 3.0));
}

#[test]
fn test_aggregate_score_values() {
    let groups = scenario_groups();
    let population = Population::from_groups(&groups, PriorWeight::Fixed(2.0)).unwrap();
    let score = AggregateScore::compute(EntityId::Num(1), &groups[&EntityId::Num(1)], &population)
        .unwrap();

    assert!(approx(score.value(Metric::Sum), 101.0));
    assert!(approx(score.value(Metric::Count), 2.0));
    assert!(approx(score.value(Metric::Average), 50.5));
    assert!(approx(score.value(Metric::Estimate), 40.5));
}

#[test]
fn test_metric_from_str() {
    assert_eq!("average".parse::<Metric>().unwrap(), Metric::Average);
    assert_eq!("SUM".parse::<Metric>().unwrap(), Metric::Sum);
    assert_eq!("total".parse::<Metric>().unwrap(), Metric::Count);
    assert_eq!("count".parse::<Metric>().unwrap(), Metric::Count);
    assert_eq!(" estimate ".parse::<Metric>().unwrap(), Metric::Estimate);
    assert_eq!(
        "median".parse::<Metric>().unwrap_err(),
        MetricError::UnknownMetric {
            name: "median".into()
        }
    );
}

#[test]
fn test_metric_default_and_display() {
    assert_eq!(Metric::default(), Metric::Estimate);
    for metric in Metric::ALL {
        assert_eq!(metric.to_string().parse::<Metric>().unwrap(), metric);
    }
}

#[test]
fn test_metric_serde_accepts_total_alias() {
    let metric: Metric = serde_json::from_str(r#""total""#).unwrap();
    assert_eq!(metric, Metric::Count);
    assert_eq!(serde_json::to_string(&Metric::Average).unwrap(), r#""average""#);
}

#[test]
fn test_prior_weight_parse() {
    assert_eq!("mean".parse::<PriorWeight>().unwrap(), PriorWeight::MeanGroupSize);
    assert_eq!("3.5".parse::<PriorWeight>().unwrap(), PriorWeight::Fixed(3.5));
    assert_eq!("0".parse::<PriorWeight>().unwrap(), PriorWeight::Fixed(0.0));
    assert!("-1".parse::<PriorWeight>().is_err());
    assert!("NaN".parse::<PriorWeight>().is_err());
    assert!("lots".parse::<PriorWeight>().is_err());
}

#[test]
fn test_prior_weight_resolve() {
    assert!(approx(PriorWeight::Fixed(2.0).resolve(10, 3), 2.0));
    assert!(approx(PriorWeight::MeanGroupSize.resolve(10, 4), 2.5));
    assert!(approx(PriorWeight::MeanGroupSize.resolve(0, 0), 0.0));
}

#[test]
fn test_means_survive_sum_overflow() {
    let high = [1e308, 1e308];
    let low = [-1e308, -1e308];

    assert_eq!(sum(&high).unwrap(), f64::INFINITY);
    assert!(approx(average(&high).unwrap() / 1e308, 1.0));
    assert!(approx(average(&low).unwrap() / 1e308, -1.0));

    let mean = global_mean([&high[..], &low[..]]).unwrap();
    assert!(approx(mean, 0.0));

    let groups = BTreeMap::from([
        (EntityId::Num(1), high.to_vec()),
        (EntityId::Num(2), low.to_vec()),
    ]);
    let population = Population::from_groups(&groups, PriorWeight::default()).unwrap();
    for (id, values) in &groups {
        let score = AggregateScore::compute(id.clone(), values, &population).unwrap();
        assert!(score.average.is_finite());
        assert!(score.estimate.is_finite());
    }
}

#[test]
fn test_population_rejects_invalid_prior_weight() {
    let groups = scenario_groups();
    for prior in [PriorWeight::Fixed(-1.0), PriorWeight::Fixed(f64::INFINITY)] {
        assert!(matches!(
            Population::from_groups(&groups, prior),
            Err(MetricError::InvalidPriorWeight { .. })
        ));
    }
}
