//! Single-fit executor and batch trainer.
//!
//! Given:
//! - candidate models
//! - a time-indexed window `X`/`y`
//! - optional splits (row-position subsets of the window)
//! - a method name and an error metric
//!
//! we fit, for each (split, candidate) pair:
//! - an independent clone of the candidate on the split's rows
//! - a prediction on the same rows, scored by the metric
//!
//! and return one record per pair, in split-major submission order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::domain::{Frame, Jobs, Method, Series, Split, TrainConfig};
use crate::error::{AppError, EXIT_INSUFFICIENT_DATA, EXIT_MODEL_FAILURE};
use crate::fit::initial::initial_conditions;
use crate::fit::record::{FitOutcome, FitRecord, ResultTable};
use crate::math::ErrorMetric;
use crate::models::GreyBoxModel;

/// Where a fit sits in the batch.
#[derive(Debug, Clone, Default)]
struct Slot {
    split: usize,
    split_label: Option<String>,
    candidate: usize,
}

/// Fit a clone of `base_model` on `x`/`y` and return a one-row result table.
///
/// Non-convergence and invalid numeric values reported by the model's `fit`
/// are recorded as a failed row. Every other error aborts and is returned.
pub fn train_model<M, E>(
    base_model: &M,
    x: &Frame,
    y: &Series,
    error_metric: &E,
    method: &Method,
) -> Result<ResultTable<FitRecord<M>>, AppError>
where
    M: GreyBoxModel,
    E: ErrorMetric + ?Sized,
{
    check_aligned(x, y)?;
    let record = fit_record(base_model, x, y, error_metric, method, Slot::default())?;
    Ok(ResultTable::from(vec![record]))
}

/// Fit every candidate on every split and concatenate the records.
///
/// `splits = None` fits each candidate once on the whole window. Rows come
/// back split-major (all candidates of split 0, then split 1, ...) whatever
/// the order in which parallel workers finish.
pub fn train_models<M, E>(
    models: &[M],
    x: &Frame,
    y: &Series,
    error_metric: &E,
    splits: Option<&[Split]>,
    config: &TrainConfig,
) -> Result<ResultTable<FitRecord<M>>, AppError>
where
    M: GreyBoxModel,
    E: ErrorMetric + ?Sized,
{
    check_aligned(x, y)?;
    let jobs = Jobs::resolve(config.n_jobs)?;

    let whole;
    let splits = match splits {
        Some(splits) => splits,
        None => {
            whole = [Split::full(x.len())];
            &whole[..]
        }
    };

    // Slice every split once up front; out-of-range rows fail before any fit starts.
    let windows = splits
        .iter()
        .map(|split| Ok((x.take(&split.rows)?, y.take(&split.rows)?)))
        .collect::<Result<Vec<(Frame, Series)>, AppError>>()?;

    let slots: Vec<Slot> = splits
        .iter()
        .enumerate()
        .flat_map(|(s, split)| {
            (0..models.len()).map(move |candidate| Slot {
                split: s,
                split_label: split.label.clone(),
                candidate,
            })
        })
        .collect();

    let total = slots.len();
    if config.verbose > 0 {
        info!(
            "Fitting {} candidate(s) x {} split(s) = {} fit(s) with method '{}' ({:?})",
            models.len(),
            splits.len(),
            total,
            config.method,
            jobs
        );
    }

    let progress = AtomicUsize::new(0);
    let run = |(idx, slot): (usize, &Slot)| -> Result<(usize, FitRecord<M>), AppError> {
        let (wx, wy) = &windows[slot.split];
        let record = fit_record(
            &models[slot.candidate],
            wx,
            wy,
            error_metric,
            &config.method,
            slot.clone(),
        )?;

        let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
        report_progress(config.verbose, done, total, &record);
        Ok((idx, record))
    };

    let mut tagged: Vec<(usize, FitRecord<M>)> = match jobs {
        Jobs::Serial => slots.iter().enumerate().map(&run).collect::<Result<Vec<_>, AppError>>()?,
        Jobs::AllCores => slots.par_iter().enumerate().map(&run).collect::<Result<Vec<_>, AppError>>()?,
        Jobs::Workers(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| AppError::new(EXIT_MODEL_FAILURE, format!("Failed to start worker pool: {e}")))?;
            pool.install(|| slots.par_iter().enumerate().map(&run).collect::<Result<Vec<_>, AppError>>())?
        }
    };

    // Reassemble by submission index, never by completion order.
    tagged.sort_by_key(|(idx, _)| *idx);
    let table: ResultTable<FitRecord<M>> = tagged.into_iter().map(|(_, record)| record).collect();

    if config.verbose > 0 {
        let failed = table.iter().filter(|r| !r.is_fitted()).count();
        info!("Batch complete: {} fit(s), {} failed", table.len(), failed);
    }

    Ok(table)
}

fn fit_record<M, E>(
    base_model: &M,
    x: &Frame,
    y: &Series,
    error_metric: &E,
    method: &Method,
    slot: Slot,
) -> Result<FitRecord<M>, AppError>
where
    M: GreyBoxModel,
    E: ErrorMetric + ?Sized,
{
    let (start_date, end_date) = x.bounds().ok_or_else(|| {
        AppError::new(
            EXIT_INSUFFICIENT_DATA,
            format!("Split {} selects no rows; nothing to fit.", slot.split),
        )
    })?;

    let timer = Instant::now();
    let model = base_model.clone();
    let ic_params = initial_conditions(model.params(), x)?;

    let fitted = match model.fit(x.columns(), y.values(), method, &ic_params) {
        Ok(fitted) => {
            let model_result = fitted.predict(x)?;
            Ok((fitted, model_result))
        }
        Err(err) if err.is_tolerated() => Err(err),
        Err(err) => return Err(err.into()),
    };
    let time = timer.elapsed().as_secs_f64();

    let outcome = match fitted {
        Ok((model, model_result)) => {
            if model_result.z.len() != y.len() {
                return Err(AppError::new(
                    EXIT_MODEL_FAILURE,
                    format!(
                        "Model '{}' predicted {} values for a window of {} rows.",
                        model.name(),
                        model_result.z.len(),
                        y.len()
                    ),
                ));
            }
            let error = error_metric.score(y.values(), &model_result.z);
            FitOutcome::Fitted {
                model,
                model_result,
                error,
            }
        }
        Err(err) => {
            warn!(
                split = slot.split,
                candidate = slot.candidate,
                "Fit of '{}' failed on {start_date}..{end_date}: {err}",
                base_model.name()
            );
            FitOutcome::Failed {
                reason: err.to_string(),
            }
        }
    };

    Ok(FitRecord {
        split: slot.split,
        split_label: slot.split_label,
        candidate: slot.candidate,
        start_date,
        end_date,
        outcome,
        time,
        method: method.clone(),
    })
}

fn check_aligned(x: &Frame, y: &Series) -> Result<(), AppError> {
    if x.len() != y.len() {
        return Err(AppError::invalid_input(format!(
            "X has {} rows but y has {} values.",
            x.len(),
            y.len()
        )));
    }
    if x.index() != y.index() {
        return Err(AppError::invalid_input("X and y do not share the same time index."));
    }
    Ok(())
}

fn report_progress<M>(verbose: u32, done: usize, total: usize, record: &FitRecord<M>) {
    if verbose > 10 {
        info!(
            split = record.split,
            candidate = record.candidate,
            time = record.time,
            error = ?record.error(),
            "Fit {done}/{total} done"
        );
    }
    if verbose > 0 && (done % (total / 10).max(1) == 0 || done == total) {
        let pct = done as f64 / total as f64 * 100.0;
        info!("  {:.0}% ({}/{} fits)", pct, done, total);
    }
}
