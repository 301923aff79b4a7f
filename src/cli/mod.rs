//! Command-line parsing for the `gbfit` result tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the training/reduction code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::fit::DEFAULT_DECIMALS;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gbfit", version, about = "Grey-box model fit results: splits, ranking, per-split selection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean, deduplicate and rank an exported results CSV.
    Reduce(ReduceArgs),
    /// Keep the best fit of every split in an exported results CSV.
    Best(ReduceArgs),
    /// Show the contiguous split plan for a training CSV.
    Splits(SplitArgs),
}

/// Options shared by `reduce` and `best`.
#[derive(Debug, Args, Clone)]
pub struct ReduceArgs {
    /// Results CSV written by a training run.
    #[arg(long, value_name = "CSV")]
    pub results: PathBuf,

    /// Decimal digits errors are rounded to before deduplication.
    #[arg(long, default_value_t = DEFAULT_DECIMALS)]
    pub decimals: u32,

    /// Only print the first N rows.
    #[arg(long)]
    pub top: Option<usize>,

    /// Write the reduced rows to this CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// Options for `splits`.
#[derive(Debug, Args, Clone)]
pub struct SplitArgs {
    /// Training data CSV (timestamp index, target, feature columns).
    #[arg(long, value_name = "CSV")]
    pub data: PathBuf,

    /// Target column name.
    #[arg(long)]
    pub target: String,

    /// Index column name (defaults to the first column).
    #[arg(long)]
    pub index: Option<String>,

    /// Number of contiguous folds.
    #[arg(long, conflicts_with = "rows_per_split", required_unless_present = "rows_per_split")]
    pub folds: Option<usize>,

    /// Rows per split (e.g. 24 for daily splits of hourly data).
    #[arg(long)]
    pub rows_per_split: Option<usize>,
}
