//! Split generation.
//!
//! Candidates are usually fitted on many short windows of one long record
//! (e.g. one split per day of hourly data) so that fits are fast and their
//! spread shows how stable a model is across the record.
//!
//! Splits are contiguous and unshuffled: a window must stay a continuous
//! stretch of time for the model's state integration to make sense.

use crate::domain::Split;
use crate::error::AppError;

/// Split `n_rows` into `n_splits` contiguous folds.
///
/// The first `n_rows % n_splits` folds get one extra row. Folds are labeled
/// `fold-0`, `fold-1`, ...
pub fn kfold(n_rows: usize, n_splits: usize) -> Result<Vec<Split>, AppError> {
    if n_splits < 2 {
        return Err(AppError::invalid_input(format!(
            "Number of splits must be >= 2 (got {n_splits})."
        )));
    }
    if n_splits > n_rows {
        return Err(AppError::invalid_input(format!(
            "Cannot make {n_splits} splits from {n_rows} rows."
        )));
    }

    let base = n_rows / n_splits;
    let extra = n_rows % n_splits;

    let mut out = Vec::with_capacity(n_splits);
    let mut start = 0;
    for i in 0..n_splits {
        let len = base + usize::from(i < extra);
        out.push(Split::labeled(format!("fold-{i}"), (start..start + len).collect()));
        start += len;
    }
    Ok(out)
}

/// Split `n_rows` into as many folds of (about) `rows_per_split` rows as fit.
pub fn by_length(n_rows: usize, rows_per_split: usize) -> Result<Vec<Split>, AppError> {
    if rows_per_split == 0 {
        return Err(AppError::invalid_input("Rows per split must be >= 1."));
    }
    kfold(n_rows, n_rows / rows_per_split)
}
