//! Mathematical utilities: error metrics and score rounding.

pub mod metrics;
pub mod round;

pub use metrics::*;
pub use round::*;
