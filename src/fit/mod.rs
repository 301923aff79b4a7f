//! Model training orchestration.
//!
//! Responsibilities:
//!
//! - read initial conditions from the data (`initial`)
//! - fit candidates over splits, optionally in parallel (`trainer`)
//! - generate contiguous splits (`splits`)
//! - clean, deduplicate and rank results (`reduce`)

pub mod initial;
pub mod record;
pub mod reduce;
pub mod splits;
pub mod trainer;

#[cfg(test)]
pub(crate) mod test_support;

pub use initial::*;
pub use record::*;
pub use reduce::*;
pub use splits::*;
pub use trainer::*;
