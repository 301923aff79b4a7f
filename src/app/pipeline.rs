//! Shared workflows behind the CLI commands.
//!
//! Keeping these here keeps `app.rs` focused on dispatch and printing:
//! results CSV -> reduce (or best per split) -> optional export
//! training CSV -> split plan

use tracing::info;

use crate::domain::{ReduceConfig, Split, SplitPlanConfig, SplitSpec, Timestamp};
use crate::error::AppError;
use crate::fit::{ResultTable, best_per_split, by_length, kfold, reduce_results};
use crate::io::export::{ResultRow, read_results_csv, write_results_csv};
use crate::io::ingest::{TrainingData, load_window};
use crate::report::{TableStats, table_stats};

/// Which reduction to run over a results file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Rank every distinct fit.
    Ranked,
    /// Keep one row per split.
    BestPerSplit,
}

/// All computed outputs of a `reduce`/`best` run.
#[derive(Debug, Clone)]
pub struct ReduceOutput {
    pub stats: TableStats,
    pub rows: ResultTable<ResultRow>,
}

pub fn run_reduce(config: &ReduceConfig, reduction: Reduction) -> Result<ReduceOutput, AppError> {
    let all = read_results_csv(&config.results)?;
    let stats = table_stats(&all);

    let rows = match reduction {
        Reduction::Ranked => reduce_results(&all, config.decimals),
        Reduction::BestPerSplit => best_per_split(&all, config.decimals),
    };
    info!(
        "Reduced {} row(s) from {} to {}",
        all.len(),
        config.results.display(),
        rows.len()
    );

    if let Some(path) = &config.export {
        write_results_csv(path, &rows)?;
        info!("Wrote {} row(s) to {}", rows.len(), path.display());
    }

    Ok(ReduceOutput { stats, rows })
}

/// One split of a plan with its time bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSplit {
    pub split: Split,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Load a training CSV and compute its contiguous split plan.
pub fn plan_splits(config: &SplitPlanConfig) -> Result<(TrainingData, Vec<PlannedSplit>), AppError> {
    let data = load_window(&config.data, config.index_col.as_deref(), &config.target_col)?;
    let n = data.x.len();

    let splits = match config.split {
        SplitSpec::Folds(k) => kfold(n, k)?,
        SplitSpec::RowsPerSplit(r) => by_length(n, r)?,
    };

    let index = data.x.index();
    let planned = splits
        .into_iter()
        .filter_map(|split| {
            let start = index[*split.rows.first()?];
            let end = index[*split.rows.last()?];
            Some(PlannedSplit { split, start, end })
        })
        .collect();

    Ok((data, planned))
}
