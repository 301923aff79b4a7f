//! Fit result records and result tables.

use serde::{Deserialize, Serialize};

use crate::domain::{Method, Timestamp};
use crate::models::ModelResult;

/// What a single fit produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome<M> {
    Fitted {
        model: M,
        model_result: ModelResult,
        error: f64,
    },
    /// A tolerated numerical failure: model, prediction and error are all missing.
    Failed { reason: String },
}

/// One row of a result table: the result of fitting one candidate on one split.
#[derive(Debug, Clone, PartialEq)]
pub struct FitRecord<M> {
    /// Ordinal of the split in submission order.
    pub split: usize,
    pub split_label: Option<String>,
    /// Ordinal of the candidate model within its split.
    pub candidate: usize,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub outcome: FitOutcome<M>,
    /// Wall-clock seconds spent cloning, fitting and predicting.
    pub time: f64,
    pub method: Method,
}

impl<M> FitRecord<M> {
    pub fn model(&self) -> Option<&M> {
        match &self.outcome {
            FitOutcome::Fitted { model, .. } => Some(model),
            FitOutcome::Failed { .. } => None,
        }
    }

    pub fn model_result(&self) -> Option<&ModelResult> {
        match &self.outcome {
            FitOutcome::Fitted { model_result, .. } => Some(model_result),
            FitOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<f64> {
        match &self.outcome {
            FitOutcome::Fitted { error, .. } => Some(*error),
            FitOutcome::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.outcome {
            FitOutcome::Fitted { .. } => None,
            FitOutcome::Failed { reason } => Some(reason),
        }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.outcome, FitOutcome::Fitted { .. })
    }
}

/// Ordered rows; row `i` is at position `i` (positions are always contiguous from zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable<R> {
    rows: Vec<R>,
}

impl<R> ResultTable<R> {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

impl<R> Default for ResultTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> From<Vec<R>> for ResultTable<R> {
    fn from(rows: Vec<R>) -> Self {
        Self { rows }
    }
}

impl<R> FromIterator<R> for ResultTable<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a, R> IntoIterator for &'a ResultTable<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<R> IntoIterator for ResultTable<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
