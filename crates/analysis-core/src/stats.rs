//! Small-sample statistics shared by the cycle and validation engines.
//!
//! Thin wrappers over `statrs` that return 0.0 for empty input instead of NaN,
//! so every score downstream stays a finite number.

use statrs::statistics::Statistics;

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().mean()
}

/// Population variance (divides by n), 0.0 for an empty slice.
pub fn population_variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().population_variance()
}

/// Population standard deviation (divides by n), 0.0 for an empty slice.
pub fn population_std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().population_std_dev()
}

/// Mean of the first `min(window, n)` values and of the remainder.
/// The second element is `None` when nothing is left over.
pub fn recent_vs_older(data: &[f64], window: usize) -> (f64, Option<f64>) {
    let split = window.min(data.len());
    let (recent, older) = data.split_at(split);
    let older_mean = if older.is_empty() { None } else { Some(mean(older)) };
    (mean(recent), older_mean)
}
