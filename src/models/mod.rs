//! Grey-box model interface.
//!
//! Concrete model families live outside this crate; they plug into the
//! trainer by implementing [`GreyBoxModel`].

pub mod model;

pub use model::*;
