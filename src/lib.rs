//! `greybox-fit` library crate.
//!
//! Fits grey-box thermal models over many data splits and ranks the results:
//!
//! - `fit::train_models` fits every candidate on every split (optionally in parallel)
//! - `fit::reduce_results` / `fit::best_per_split` clean and rank the result table
//!
//! The binary (`gbfit`) is a thin wrapper around this library for working with
//! exported result files.

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;

pub use domain::{Frame, Method, ParamSpec, Params, Series, Split, TrainConfig};
pub use error::{AppError, FitError};
pub use fit::{
    FitOutcome, FitRecord, ResultTable, best_per_split, initial_conditions, reduce_results,
    train_model, train_models,
};
pub use models::{GreyBoxModel, ModelResult};
