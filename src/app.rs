//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments
//! - runs reductions / split plans
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ReduceArgs, SplitArgs};
use crate::domain::{ReduceConfig, SplitPlanConfig, SplitSpec};
use crate::error::AppError;

pub mod pipeline;

use pipeline::Reduction;

/// Entry point for the `gbfit` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Reduce(args) => handle_reduce(args, Reduction::Ranked),
        Command::Best(args) => handle_reduce(args, Reduction::BestPerSplit),
        Command::Splits(args) => handle_splits(args),
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed when embedded (e.g. in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_reduce(args: ReduceArgs, reduction: Reduction) -> Result<(), AppError> {
    let config = reduce_config_from_args(&args);
    let out = pipeline::run_reduce(&config, reduction)?;

    let title = match reduction {
        Reduction::Ranked => "Ranked fits",
        Reduction::BestPerSplit => "Best fit per split",
    };
    println!("{}", crate::report::format_stats(&out.stats));
    println!("{}", crate::report::format_results(title, &out.rows, config.top));
    Ok(())
}

fn handle_splits(args: SplitArgs) -> Result<(), AppError> {
    let config = split_config_from_args(&args)?;
    let (data, planned) = pipeline::plan_splits(&config)?;

    println!(
        "Window: {} rows, {} feature column(s), target `{}`",
        data.rows_read,
        data.x.columns().len(),
        config.target_col
    );
    println!("{:<10} {:>6} {:<19} {:<19}", "split", "rows", "start", "end");
    for p in &planned {
        println!(
            "{:<10} {:>6} {:<19} {:<19}",
            p.split.label.as_deref().unwrap_or("-"),
            p.split.len(),
            p.start.format("%Y-%m-%d %H:%M:%S").to_string(),
            p.end.format("%Y-%m-%d %H:%M:%S").to_string(),
        );
    }
    Ok(())
}

pub fn reduce_config_from_args(args: &ReduceArgs) -> ReduceConfig {
    ReduceConfig {
        results: args.results.clone(),
        decimals: args.decimals,
        top: args.top,
        export: args.export.clone(),
    }
}

pub fn split_config_from_args(args: &SplitArgs) -> Result<SplitPlanConfig, AppError> {
    let split = match (args.folds, args.rows_per_split) {
        (Some(k), None) => SplitSpec::Folds(k),
        (None, Some(r)) => SplitSpec::RowsPerSplit(r),
        _ => {
            return Err(AppError::invalid_input(
                "Pass exactly one of --folds or --rows-per-split.",
            ));
        }
    };

    Ok(SplitPlanConfig {
        data: args.data.clone(),
        index_col: args.index.clone(),
        target_col: args.target.clone(),
        split,
    })
}
