//! CSV ingest of a time-indexed training window.
//!
//! Expected schema:
//!
//! - one timestamp column (the index; the first column unless named)
//! - one target column (`y`)
//! - any number of numeric feature columns (`X`), kept in file order
//!
//! Values must already be clean: an unparseable cell fails the load with
//! its line number instead of being skipped.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::debug;

use crate::domain::{Columns, Frame, Series, Timestamp};
use crate::error::{AppError, EXIT_INSUFFICIENT_DATA, EXIT_INVALID_INPUT};

/// A loaded window: features `x` and target `y` on the same index.
#[derive(Debug, Clone)]
pub struct TrainingData {
    pub x: Frame,
    pub y: Series,
    pub rows_read: usize,
}

/// Load `path` into a feature frame and target series.
///
/// `index_col` defaults to the first column. The target column is not part
/// of `x`.
pub fn load_window(
    path: &Path,
    index_col: Option<&str>,
    target_col: &str,
) -> Result<TrainingData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            EXIT_INVALID_INPUT,
            format!("Failed to open CSV '{}': {e}", path.display()),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INVALID_INPUT, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let index_idx = match index_col {
        Some(name) => column_position(&header_map, name)?,
        None if headers.is_empty() => {
            return Err(AppError::invalid_input("CSV has no columns."));
        }
        None => 0,
    };
    let target_idx = column_position(&header_map, target_col)?;
    if target_idx == index_idx {
        return Err(AppError::invalid_input(format!(
            "Target column `{target_col}` cannot also be the index."
        )));
    }

    let feature_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index_idx && *i != target_idx)
        .map(|(i, name)| (i, normalize_header_name(name)))
        .collect();

    let mut index: Vec<Timestamp> = Vec::new();
    let mut target = Vec::new();
    let mut features: Vec<Vec<f64>> = vec![Vec::new(); feature_cols.len()];

    for (idx, result) in reader.records().enumerate() {
        // +2: header line, then 1-based numbering.
        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::invalid_input(format!("CSV parse error on line {line}: {e}")))?;

        let stamp = field(&record, index_idx, line)?;
        index.push(parse_timestamp(stamp).map_err(|e| AppError::invalid_input(format!("Line {line}: {e}")))?);
        target.push(parse_value(&record, target_idx, target_col, line)?);
        for (slot, (col, name)) in features.iter_mut().zip(&feature_cols) {
            slot.push(parse_value(&record, *col, name, line)?);
        }
    }

    if index.is_empty() {
        return Err(AppError::new(
            EXIT_INSUFFICIENT_DATA,
            format!("CSV '{}' has no data rows.", path.display()),
        ));
    }

    let rows_read = index.len();
    let columns: Columns = feature_cols
        .into_iter()
        .map(|(_, name)| name)
        .zip(features)
        .collect();

    debug!(
        rows = rows_read,
        features = columns.len(),
        "Loaded training window from {}",
        path.display()
    );

    Ok(TrainingData {
        x: Frame::new(index.clone(), columns)?,
        y: Series::new(index, target)?,
        rows_read,
    })
}

/// Parse a timestamp in one of the accepted formats; date-only values mean midnight.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, String> {
    const DATETIME_FMTS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    const DATE_FMTS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

    for fmt in DATETIME_FMTS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(t);
        }
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(t) = d.and_hms_opt(0, 0, 0) {
                return Ok(t);
            }
        }
    }
    Err(format!(
        "Invalid timestamp '{s}'. Expected YYYY-MM-DD[ HH:MM[:SS]] or DD/MM/YYYY[ HH:MM[:SS]]."
    ))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Strip a UTF-8 BOM left on the first header by spreadsheet exports.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn column_position(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| AppError::invalid_input(format!("Missing required column: `{name}`")))
}

fn field(record: &StringRecord, idx: usize, line: usize) -> Result<&str, AppError> {
    record
        .get(idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::invalid_input(format!("Line {line}: missing value in column {}", idx + 1)))
}

fn parse_value(record: &StringRecord, idx: usize, name: &str, line: usize) -> Result<f64, AppError> {
    let raw = field(record, idx, line)?;
    raw.parse::<f64>().map_err(|_| {
        AppError::invalid_input(format!("Line {line}: `{name}` value '{raw}' is not a number"))
    })
}
