//! Error metrics for scoring predictions.
//!
//! A metric maps `(actual, predicted)` to a scalar where lower is better.
//! Any `Fn(&[f64], &[f64]) -> f64` works as a metric; the functions here are
//! the common choices.
//!
//! Mismatched lengths or empty inputs score `NaN`, which the reducer treats as
//! a missing error and drops.

/// Scores a prediction against observed values.
pub trait ErrorMetric: Sync {
    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> f64;
}

impl<F> ErrorMetric for F
where
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    fn score(&self, y_true: &[f64], y_pred: &[f64]) -> f64 {
        self(y_true, y_pred)
    }
}

pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    mean_of(y_true, y_pred, |r| r * r)
}

pub fn root_mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    mean_squared_error(y_true, y_pred).sqrt()
}

pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    mean_of(y_true, y_pred, f64::abs)
}

fn mean_of(y_true: &[f64], y_pred: &[f64], f: impl Fn(f64) -> f64) -> f64 {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return f64::NAN;
    }
    let sum: f64 = y_true.iter().zip(y_pred).map(|(a, p)| f(a - p)).sum();
    sum / y_true.len() as f64
}
