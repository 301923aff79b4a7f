//! Export result tables to CSV and read them back.
//!
//! Each fit record becomes one flat row. Fitted parameter values are stored as
//! a JSON object in the `params` column so the file stays one-row-per-fit no
//! matter how many parameters a model has. Predictions are not exported.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Method, Timestamp};
use crate::error::{AppError, EXIT_INVALID_INPUT, EXIT_MODEL_FAILURE};
use crate::fit::{FitRecord, ResultTable, Scored};
use crate::models::GreyBoxModel;

/// Flat, serializable view of a [`FitRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub split: usize,
    pub split_label: Option<String>,
    pub candidate: usize,
    pub model: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub time: f64,
    pub method: Method,
    pub error: Option<f64>,
    /// Fitted parameter values as a JSON object; empty for failed fits.
    pub params: Option<String>,
    pub failure: Option<String>,
}

impl ResultRow {
    pub fn from_record<M: GreyBoxModel>(record: &FitRecord<M>, base_name: &str) -> Result<Self, AppError> {
        let params = match record.model() {
            Some(model) => Some(serde_json::to_string(&model.params().values()).map_err(|e| {
                AppError::new(EXIT_MODEL_FAILURE, format!("Failed to serialize fitted params: {e}"))
            })?),
            None => None,
        };

        Ok(Self {
            split: record.split,
            split_label: record.split_label.clone(),
            candidate: record.candidate,
            model: record.model().map(|m| m.name()).unwrap_or(base_name).to_string(),
            start_date: record.start_date,
            end_date: record.end_date,
            time: record.time,
            method: record.method.clone(),
            error: record.error(),
            params,
            failure: record.failure().map(str::to_string),
        })
    }
}

impl Scored for ResultRow {
    fn time(&self) -> f64 {
        self.time
    }

    fn error(&self) -> Option<f64> {
        self.error
    }

    fn set_error(&mut self, error: f64) {
        self.error = Some(error);
    }

    fn split(&self) -> usize {
        self.split
    }

    fn is_complete(&self) -> bool {
        self.failure.is_none() && self.params.is_some()
    }
}

/// Flatten a fitted table; `models` names failed rows by their candidate.
pub fn to_rows<M: GreyBoxModel>(
    table: &ResultTable<FitRecord<M>>,
    models: &[M],
) -> Result<ResultTable<ResultRow>, AppError> {
    table
        .iter()
        .map(|record| {
            let base_name = models.get(record.candidate).map(|m| m.name()).unwrap_or("");
            ResultRow::from_record(record, base_name)
        })
        .collect::<Result<Vec<_>, AppError>>()
        .map(ResultTable::from)
}

/// Write result rows to a CSV file.
pub fn write_results_csv(path: &Path, rows: &ResultTable<ResultRow>) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_INVALID_INPUT,
            format!("Failed to create results CSV '{}': {e}", path.display()),
        )
    })?;

    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(EXIT_INVALID_INPUT, format!("Failed to write results CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_INVALID_INPUT, format!("Failed to flush results CSV: {e}")))?;
    Ok(())
}

/// Read rows written by [`write_results_csv`].
pub fn read_results_csv(path: &Path) -> Result<ResultTable<ResultRow>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            EXIT_INVALID_INPUT,
            format!("Failed to open results CSV '{}': {e}", path.display()),
        )
    })?;

    let mut reader = csv::Reader::from_reader(file);
    reader
        .deserialize::<ResultRow>()
        .enumerate()
        .map(|(idx, row)| {
            row.map_err(|e| AppError::invalid_input(format!("Results CSV line {}: {e}", idx + 2)))
        })
        .collect::<Result<Vec<_>, AppError>>()
        .map(ResultTable::from)
}
