//! Descriptive statistics over plain `f64` slices

use crate::{MathError, Result};
use statrs::statistics::Statistics;

fn require_data(values: &[f64], what: &str) -> Result<()> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(format!(
            "Cannot compute {} of an empty sample",
            what
        )));
    }
    Ok(())
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    require_data(values, "mean")?;
    Ok(values.iter().mean())
}

/// Population standard deviation (divides by `n`)
pub fn population_std(values: &[f64]) -> Result<f64> {
    require_data(values, "standard deviation")?;
    Ok(values.iter().population_std_dev())
}

/// Percentile with linear interpolation between closest ranks.
///
/// `pct` is in `[0, 100]`. The rank of the requested percentile is
/// `pct / 100 * (n - 1)` over the sorted sample.
pub fn percentile(values: &[f64], pct: f64) -> Result<f64> {
    require_data(values, "percentile")?;
    if !(0.0..=100.0).contains(&pct) {
        return Err(MathError::InvalidInput(format!(
            "Percentile must be within [0, 100], got {}",
            pct
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Mean absolute error between paired actuals and predictions
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    if actual.len() != predicted.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual length ({}) doesn't match predicted length ({})",
            actual.len(),
            predicted.len()
        )));
    }
    require_data(actual, "mean absolute error")?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Min-max scales `values` onto `[0, 1]`.
///
/// When the spread is below `tie_tolerance` every output is `0.0`.
pub fn min_max_normalize(values: &[f64], tie_tolerance: f64) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let spread = max - min;

    if values.is_empty() || !(spread >= tie_tolerance) {
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| (v - min) / spread).collect()
}
