//! Result reduction and per-split selection.
//!
//! A raw result table contains failed fits, non-finite scores, and many fits
//! that converge to practically the same optimum. The reducer:
//! 1. treats infinite errors as missing and drops every incomplete row
//! 2. rounds errors to `decimals` digits
//! 3. keeps only the fastest row per distinct rounded error
//! 4. ranks the survivors by error, best first
//!
//! Both sorts are stable, so the output is deterministic for given timings.

use std::collections::{BTreeMap, HashSet};

use crate::fit::record::{FitRecord, ResultTable};
use crate::math::round_to;

/// Default rounding precision for error deduplication.
pub const DEFAULT_DECIMALS: u32 = 6;

/// A result row the reducer can rank.
pub trait Scored: Clone {
    /// Elapsed fitting time in seconds.
    fn time(&self) -> f64;

    /// Error score; `None` when the fit failed.
    fn error(&self) -> Option<f64>;

    fn set_error(&mut self, error: f64);

    /// Ordinal of the split the row was fitted on.
    fn split(&self) -> usize;

    /// Whether every non-error field is present.
    fn is_complete(&self) -> bool {
        true
    }
}

impl<M: Clone> Scored for FitRecord<M> {
    fn time(&self) -> f64 {
        self.time
    }

    fn error(&self) -> Option<f64> {
        FitRecord::error(self)
    }

    fn set_error(&mut self, value: f64) {
        if let crate::fit::record::FitOutcome::Fitted { error, .. } = &mut self.outcome {
            *error = value;
        }
    }

    fn split(&self) -> usize {
        self.split
    }

    fn is_complete(&self) -> bool {
        self.is_fitted()
    }
}

/// Clean, deduplicate and rank a result table.
pub fn reduce_results<R: Scored>(table: &ResultTable<R>, decimals: u32) -> ResultTable<R> {
    reduce_rows(table.iter().cloned().collect(), decimals).into()
}

/// Reduce each split separately and keep its best row, in split order.
///
/// Splits where every fit failed are absent from the output.
pub fn best_per_split<R: Scored>(table: &ResultTable<R>, decimals: u32) -> ResultTable<R> {
    let mut groups: BTreeMap<usize, Vec<R>> = BTreeMap::new();
    for row in table {
        groups.entry(row.split()).or_default().push(row.clone());
    }

    groups
        .into_values()
        .filter_map(|rows| reduce_rows(rows, decimals).into_iter().next())
        .collect()
}

fn reduce_rows<R: Scored>(rows: Vec<R>, decimals: u32) -> Vec<R> {
    let mut rows: Vec<R> = rows
        .into_iter()
        .filter_map(|mut row| {
            // Infinite and NaN errors count as missing.
            let error = row.error().filter(|e| e.is_finite())?;
            if !row.is_complete() || !row.time().is_finite() {
                return None;
            }
            let rounded = round_to(error, decimals);
            if !rounded.is_finite() {
                return None;
            }
            row.set_error(rounded);
            Some(row)
        })
        .collect();

    // Fastest first, so the dedup below keeps the fastest row per error.
    rows.sort_by(|a, b| a.time().total_cmp(&b.time()));

    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(error_key(row)));

    rows.sort_by(|a, b| error_key_value(a).total_cmp(&error_key_value(b)));
    rows
}

fn error_key_value<R: Scored>(row: &R) -> f64 {
    // `-0.0` and `0.0` are the same score.
    let e = row.error().unwrap_or(f64::NAN);
    if e == 0.0 { 0.0 } else { e }
}

fn error_key<R: Scored>(row: &R) -> u64 {
    error_key_value(row).to_bits()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Method;
    use crate::fit::record::FitOutcome;
    use crate::fit::test_support::{LevelModel, hour};
    use crate::models::ModelResult;

    fn fitted(split: usize, candidate: usize, time: f64, error: f64) -> FitRecord<LevelModel> {
        FitRecord {
            split,
            split_label: None,
            candidate,
            start_date: hour(0),
            end_date: hour(23),
            outcome: FitOutcome::Fitted {
                model: LevelModel::new("m", 0.0),
                model_result: ModelResult::new(vec![0.0; 24]),
                error,
            },
            time,
            method: Method::default(),
        }
    }

    fn failed(split: usize, candidate: usize, time: f64) -> FitRecord<LevelModel> {
        FitRecord {
            outcome: FitOutcome::Failed {
                reason: "did not converge".into(),
            },
            ..fitted(split, candidate, time, 0.0)
        }
    }

    #[test]
    fn keeps_fastest_of_equal_rounded_errors() {
        let table: ResultTable<_> = vec![
            fitted(0, 0, 2.0, 0.123456),
            fitted(0, 1, 1.0, 0.123455),
            fitted(0, 2, 0.5, 0.2),
        ]
        .into();

        let reduced = reduce_results(&table, 5);
        assert_eq!(reduced.len(), 2);
        assert_eq!(reduced.rows()[0].candidate, 1);
        assert_eq!(reduced.rows()[0].error(), Some(0.12346));
        assert_eq!(reduced.rows()[1].candidate, 2);
    }

    #[test]
    fn huge_decimals_keep_every_distinct_error() {
        let table: ResultTable<_> = vec![
            fitted(0, 0, 0.3, 0.5),
            fitted(0, 1, 0.2, 0.25),
            fitted(0, 2, 0.1, 0.75),
        ]
        .into();

        for decimals in [400, 3_000_000_000, u32::MAX] {
            let reduced = reduce_results(&table, decimals);
            let errors: Vec<f64> = reduced.iter().filter_map(|r| r.error()).collect();
            assert_eq!(errors, vec![0.25, 0.5, 0.75]);
        }
    }

    #[test]
    fn output_is_sorted_by_error() {
        let table: ResultTable<_> = vec![
            fitted(0, 0, 0.1, 3.0),
            fitted(0, 1, 0.2, 1.0),
            fitted(0, 2, 0.3, 2.0),
        ]
        .into();

        let reduced = reduce_results(&table, DEFAULT_DECIMALS);
        let errors: Vec<f64> = reduced.iter().filter_map(|r| r.error()).collect();
        assert_eq!(errors, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn drops_failed_and_non_finite_rows() {
        let table: ResultTable<_> = vec![
            fitted(0, 0, 0.1, f64::INFINITY),
            fitted(0, 1, 0.1, f64::NEG_INFINITY),
            fitted(0, 2, 0.1, f64::NAN),
            failed(0, 3, 0.1),
            fitted(0, 4, 0.1, 0.5),
        ]
        .into();

        let reduced = reduce_results(&table, DEFAULT_DECIMALS);
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced.rows()[0].candidate, 4);
    }

    #[test]
    fn reducing_an_all_failed_table_is_empty() {
        let table: ResultTable<_> = vec![failed(0, 0, 0.1), failed(1, 0, 0.2)].into();
        assert!(reduce_results(&table, DEFAULT_DECIMALS).is_empty());
    }

    #[test]
    fn best_per_split_picks_one_row_per_split_in_order() {
        let table: ResultTable<_> = vec![
            fitted(0, 0, 0.3, 0.9),
            fitted(0, 1, 0.2, 0.4),
            fitted(1, 0, 0.1, 0.7),
            fitted(1, 1, 0.4, 0.8),
            failed(2, 0, 0.1),
            fitted(3, 0, 0.5, 0.25),
            fitted(3, 1, 0.1, 0.25),
        ]
        .into();

        let best = best_per_split(&table, DEFAULT_DECIMALS);
        let picked: Vec<(usize, usize)> = best.iter().map(|r| (r.split, r.candidate)).collect();
        assert_eq!(picked, vec![(0, 1), (1, 0), (3, 1)]);
    }
}
