//! Input/output helpers.
//!
//! - CSV ingest of training windows (`ingest`)
//! - result table export/import (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
