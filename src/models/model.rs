//! The grey-box model boundary.
//!
//! The orchestration code never looks inside a model; it only needs to:
//! - read its parameter declarations (to find initial conditions)
//! - fit a fresh copy against one window with a named method
//! - predict on the same window and score the output series `z`

use serde::{Deserialize, Serialize};

use crate::domain::{Columns, Frame, IcParams, Method, Params};
use crate::error::FitError;

/// Output of [`GreyBoxModel::predict`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    /// Predicted output series, aligned with the window it was predicted on.
    pub z: Vec<f64>,
}

impl ModelResult {
    pub fn new(z: Vec<f64>) -> Self {
        Self { z }
    }
}

/// A parametric thermal model that can be fitted to a training window.
///
/// `Clone` must produce an independent copy: the batch trainer clones the
/// candidate once per fit and runs fits concurrently, so clones must not
/// share mutable parameter state (no `Arc<Mutex<_>>` parameters).
pub trait GreyBoxModel: Clone + Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &str;

    fn params(&self) -> &Params;

    /// Fit this copy and return the fitted model.
    ///
    /// `ic_params` holds the initial-condition values read from the first
    /// row of the window; they are fixed, not optimized.
    fn fit(
        self,
        x: &Columns,
        y: &[f64],
        method: &Method,
        ic_params: &IcParams,
    ) -> Result<Self, FitError>;

    fn predict(&self, x: &Frame) -> Result<ModelResult, FitError>;
}
