//! Descriptive statistics over price samples.
//!
//! Every function here is pure and total: insufficient input yields `0.0`
//! rather than an error or `NaN`, so a dashboard cell always has a number to
//! show. Each call is `O(n)` and allocates at most one temporary buffer.

use std::collections::HashMap;

use crate::{Sample, UtcDateTime};

/// Arithmetic mean of `price`. Empty input yields `0.0`.
pub fn average(samples: &[Sample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum = samples.iter().map(|sample| sample.price).sum::<f64>();
    sum / samples.len() as f64
}

/// Sample (Bessel-corrected, `n - 1`) standard deviation of `price`.
///
/// Fewer than two samples, or a series whose prices are all equal, yield
/// exactly `0.0`.
pub fn std_dev(samples: &[Sample]) -> f64 {
    if samples.len() <= 1 || is_flat(samples.iter().map(|sample| sample.price)) {
        return 0.0;
    }
    let mean = average(samples);
    let squared = samples
        .iter()
        .map(|sample| (sample.price - mean).powi(2))
        .sum::<f64>();
    (squared / (samples.len() - 1) as f64).sqrt()
}

/// Pearson correlation coefficient of two price sequences paired by index.
///
/// Only the first `min(a.len(), b.len())` positions participate and the
/// means are taken over those prefixes. Returns `0.0` when fewer than two
/// pairs exist or either side is constant. The result is not clamped, so
/// rounding can land marginally outside `[-1, 1]`; see [`correlation_clamped`].
pub fn correlation(a: &[Sample], b: &[Sample]) -> f64 {
    let pairs = a
        .iter()
        .zip(b)
        .map(|(left, right)| (left.price, right.price))
        .collect::<Vec<_>>();
    pearson(&pairs)
}

/// [`correlation`] clamped to `[-1, 1]`.
pub fn correlation_clamped(a: &[Sample], b: &[Sample]) -> f64 {
    correlation(a, b).clamp(-1.0, 1.0)
}

/// Pearson correlation over samples observed at the same instant.
///
/// Pairs are formed by matching parsed `lastUpdatedAt` values instead of
/// positions, in `a`'s chronological order. Samples without a parseable
/// timestamp are ignored; for duplicate instants in `b` the first one wins.
pub fn correlation_by_timestamp(a: &[Sample], b: &[Sample]) -> f64 {
    let mut by_instant: HashMap<UtcDateTime, f64> = HashMap::with_capacity(b.len());
    for sample in b {
        if let Some(ts) = sample.timestamp() {
            by_instant.entry(ts).or_insert(sample.price);
        }
    }

    let mut keyed = a
        .iter()
        .filter_map(|sample| {
            let ts = sample.timestamp()?;
            let other = by_instant.get(&ts)?;
            Some((ts, (sample.price, *other)))
        })
        .collect::<Vec<_>>();
    keyed.sort_by_key(|(ts, _)| *ts);

    let pairs = keyed.into_iter().map(|(_, pair)| pair).collect::<Vec<_>>();
    pearson(&pairs)
}

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len();
    if n <= 1 {
        return 0.0;
    }

    if is_flat(pairs.iter().map(|(a, _)| *a)) || is_flat(pairs.iter().map(|(_, b)| *b)) {
        return 0.0;
    }

    let count = n as f64;
    let mean_a = pairs.iter().map(|(a, _)| a).sum::<f64>() / count;
    let mean_b = pairs.iter().map(|(_, b)| b).sum::<f64>() / count;

    let (covariance, variance_a, variance_b) =
        pairs
            .iter()
            .fold((0.0, 0.0, 0.0), |(cov, var_a, var_b), (a, b)| {
                let diff_a = a - mean_a;
                let diff_b = b - mean_b;
                (
                    cov + diff_a * diff_b,
                    var_a + diff_a * diff_a,
                    var_b + diff_b * diff_b,
                )
            });

    let divisor = (n - 1) as f64;
    let std_dev_a = (variance_a / divisor).sqrt();
    let std_dev_b = (variance_b / divisor).sqrt();

    if std_dev_a == 0.0 || std_dev_b == 0.0 {
        return 0.0;
    }

    (covariance / divisor) / (std_dev_a * std_dev_b)
}

// Exact comparison: the computed variance of e.g. `[0.1; 3]` is not 0.0.
fn is_flat(mut prices: impl Iterator<Item = f64>) -> bool {
    match prices.next() {
        Some(first) => prices.all(|price| price == first),
        None => true,
    }
}
