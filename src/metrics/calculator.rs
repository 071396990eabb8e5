//! Pure reductions from rating values to scores.
//!
//! Every function takes the values of one group and fails with [`MetricError::EmptyGroup`]
//! when there are none; nothing here touches storage.

use super::error::{MetricError, MetricResult};

#[inline]
fn non_empty(values: &[f64]) -> MetricResult<&[f64]> {
    if values.is_empty() {
        return Err(MetricError::EmptyGroup);
    }
    Ok(values)
}

/// `Σ v`.
pub fn sum(values: &[f64]) -> MetricResult<f64> {
    Ok(non_empty(values)?.iter().sum())
}

/// Number of values in the group.
pub fn count(values: &[f64]) -> MetricResult<usize> {
    Ok(non_empty(values)?.len())
}

/// `sum / count`.
///
/// Stays finite for finite values even when their sum overflows.
pub fn average(values: &[f64]) -> MetricResult<f64> {
    let values = non_empty(values)?;
    Ok(mean_of(values.iter().copied(), values.len()))
}

/// Falls back to `Σ v/n` when the plain sum overflows.
fn mean_of<I>(values: I, n: usize) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let n = n as f64;
    let total: f64 = values.clone().sum();
    if total.is_finite() {
        total / n
    } else {
        values.map(|v| v / n).sum()
    }
}

/// Confidence-weighted blend of the group's average and the population mean:
///
/// ```text
/// estimate = n / (n + m) * average + m / (n + m) * global_mean
/// ```
///
/// `m` is the prior weight in "votes' worth" of the global mean. With `m = 0` this is the
/// plain average.
pub fn estimate(values: &[f64], global_mean: f64, prior_weight: f64) -> MetricResult<f64> {
    let avg = average(values)?;
    let n = values.len() as f64;
    let total = n + prior_weight;

    Ok((n / total) * avg + (prior_weight / total) * global_mean)
}

/// Mean of every value across every group.
pub fn global_mean<'a, I>(groups: I) -> MetricResult<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let groups: Vec<&[f64]> = groups.into_iter().collect();
    let n: usize = groups.iter().map(|g| g.len()).sum();

    if n == 0 {
        return Err(MetricError::EmptyGroup);
    }
    Ok(mean_of(groups.iter().flat_map(|g| g.iter().copied()), n))
}
