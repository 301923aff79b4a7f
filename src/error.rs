//! Error types.
//!
//! Two layers:
//!
//! - [`AppError`]: fatal errors that abort a batch (and set the `gbfit` exit code)
//! - [`FitError`]: errors reported by a model's `fit`/`predict`; some of them are
//!   tolerated by the single-fit executor and turned into failed records

use thiserror::Error;

/// Exit code for invalid input, configuration, or a broken caller contract.
pub const EXIT_INVALID_INPUT: u8 = 2;
/// Exit code for windows/splits with no usable rows.
pub const EXIT_INSUFFICIENT_DATA: u8 = 3;
/// Exit code for model failures that are not tolerated.
pub const EXIT_MODEL_FAILURE: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INVALID_INPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors raised across the model boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// The minimizer did not converge.
    #[error("fit did not converge: {0}")]
    NonConvergence(String),

    /// Non-finite or otherwise invalid numeric values were encountered.
    #[error("invalid numeric value: {0}")]
    InvalidValue(String),

    /// The caller handed the model inputs it cannot work with
    /// (missing columns, malformed shapes, unknown method).
    #[error("model contract violated: {0}")]
    Contract(String),

    #[error("model error: {0}")]
    Other(String),
}

impl FitError {
    /// Whether the single-fit executor records this failure instead of aborting.
    ///
    /// Only numerically expected failures qualify.
    pub fn is_tolerated(&self) -> bool {
        matches!(self, FitError::NonConvergence(_) | FitError::InvalidValue(_))
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let code = match err {
            FitError::Contract(_) => EXIT_INVALID_INPUT,
            _ => EXIT_MODEL_FAILURE,
        };
        AppError::new(code, err.to_string())
    }
}
