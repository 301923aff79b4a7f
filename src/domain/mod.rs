//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - time-indexed training windows (`Frame`, `Series`) and `Split`s over them
//! - model parameter declarations (`ParamSpec`, `Params`)
//! - training configuration (`Method`, `TrainConfig`, `Jobs`)

pub mod types;

pub use types::*;
