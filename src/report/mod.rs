//! Reporting utilities: table statistics and formatted terminal output.

pub mod format;

pub use format::*;
