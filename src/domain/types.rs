//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - shared read-only across fitting workers
//! - exported to CSV/JSON
//! - reloaded later for offline reduction

use std::path::PathBuf;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, EXIT_INVALID_INPUT};

/// Time index type for training windows.
pub type Timestamp = NaiveDateTime;

/// Named feature columns in declaration order.
pub type Columns = IndexMap<String, Vec<f64>>;

/// Time-indexed table of input features (`X`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    index: Vec<Timestamp>,
    columns: Columns,
}

impl Frame {
    /// Build a frame, checking that every column matches the index length.
    pub fn new(index: Vec<Timestamp>, columns: Columns) -> Result<Self, AppError> {
        for (name, values) in &columns {
            if values.len() != index.len() {
                return Err(AppError::invalid_input(format!(
                    "Column '{name}' has {} rows but the index has {}.",
                    values.len(),
                    index.len()
                )));
            }
        }
        Ok(Self { index, columns })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    /// Columns as a name → ordered values mapping (the shape models are fitted on).
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// First and last index values.
    pub fn bounds(&self) -> Option<(Timestamp, Timestamp)> {
        Some((*self.index.first()?, *self.index.last()?))
    }

    /// Select rows by position, in the order given.
    pub fn take(&self, rows: &[usize]) -> Result<Frame, AppError> {
        check_positions(rows, self.len())?;
        let index = rows.iter().map(|&i| self.index[i]).collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), rows.iter().map(|&i| values[i]).collect()))
            .collect();
        Ok(Frame { index, columns })
    }
}

/// Time-indexed sequence of observed target values (`y`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    index: Vec<Timestamp>,
    values: Vec<f64>,
}

impl Series {
    pub fn new(index: Vec<Timestamp>, values: Vec<f64>) -> Result<Self, AppError> {
        if index.len() != values.len() {
            return Err(AppError::invalid_input(format!(
                "Series has {} values but the index has {}.",
                values.len(),
                index.len()
            )));
        }
        Ok(Self { index, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn take(&self, rows: &[usize]) -> Result<Series, AppError> {
        check_positions(rows, self.len())?;
        Ok(Series {
            index: rows.iter().map(|&i| self.index[i]).collect(),
            values: rows.iter().map(|&i| self.values[i]).collect(),
        })
    }
}

fn check_positions(rows: &[usize], len: usize) -> Result<(), AppError> {
    if let Some(&bad) = rows.iter().find(|&&i| i >= len) {
        return Err(AppError::invalid_input(format!(
            "Row position {bad} is out of range for a window of {len} rows."
        )));
    }
    Ok(())
}

/// A subset of row positions selecting one training window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub label: Option<String>,
    pub rows: Vec<usize>,
}

impl Split {
    pub fn new(rows: Vec<usize>) -> Self {
        Self { label: None, rows }
    }

    pub fn labeled(label: impl Into<String>, rows: Vec<usize>) -> Self {
        Self {
            label: Some(label.into()),
            rows,
        }
    }

    /// One split covering every row of a window.
    pub fn full(n_rows: usize) -> Self {
        Self::new((0..n_rows).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Declaration of a single model parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Current (initial guess or fitted) value.
    pub value: Option<f64>,
    /// Whether the minimizer may vary this parameter.
    pub vary: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// State at the start of a window, read from data rather than optimized.
    pub initial_condition: bool,
}

impl ParamSpec {
    pub fn new(value: Option<f64>) -> Self {
        Self {
            value,
            vary: true,
            min: None,
            max: None,
            initial_condition: false,
        }
    }

    /// Declare from a name using the legacy convention: names containing `0`
    /// (e.g. `Ti0`, `Te0`) are initial conditions.
    ///
    /// Prefer tagging explicitly with [`ParamSpec::as_initial_condition`]; the
    /// convention misclassifies names such as `A10`.
    pub fn from_name(name: &str, value: Option<f64>) -> Self {
        let mut spec = Self::new(value);
        spec.initial_condition = name.contains(IC_NAME_MARKER);
        spec
    }

    pub fn as_initial_condition(mut self) -> Self {
        self.initial_condition = true;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.vary = false;
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// Marker character of the legacy initial-condition naming convention.
pub const IC_NAME_MARKER: char = '0';

/// Ordered model parameter declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, ParamSpec>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: ParamSpec) -> Option<ParamSpec> {
        self.0.insert(name.into(), spec)
    }

    /// Insert using the legacy naming convention (see [`ParamSpec::from_name`]).
    pub fn declare(&mut self, name: impl Into<String>, value: Option<f64>) -> Option<ParamSpec> {
        let name = name.into();
        let spec = ParamSpec::from_name(&name, value);
        self.0.insert(name, spec)
    }

    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ParamSpec> {
        self.0.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Current values of every parameter, in declaration order.
    pub fn values(&self) -> IndexMap<String, Option<f64>> {
        self.0.iter().map(|(k, v)| (k.clone(), v.value)).collect()
    }
}

impl<S: Into<String>> FromIterator<(S, ParamSpec)> for Params {
    fn from_iter<I: IntoIterator<Item = (S, ParamSpec)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Initial-condition values keyed by parameter name.
pub type IcParams = IndexMap<String, f64>;

/// Name of the minimization method handed to the model's minimizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Method(String);

impl Method {
    /// Derivative-free simplex method.
    pub const NELDER: &'static str = "nelder";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Method {
    fn default() -> Self {
        Self::new(Self::NELDER)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Method {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Batch training configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub method: Method,
    /// Parallelism degree: `1` serial, `-1` all cores, `n > 1` n workers,
    /// `n < -1` all cores but `|n| - 1`.
    pub n_jobs: i32,
    /// Diagnostic verbosity (`0` silent); never changes results.
    pub verbose: u32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            n_jobs: -1,
            verbose: 10,
        }
    }
}

/// Resolved parallelism degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jobs {
    Serial,
    /// Every available core (the global worker pool).
    AllCores,
    Workers(usize),
}

impl Jobs {
    pub fn resolve(n_jobs: i32) -> Result<Jobs, AppError> {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::resolve_with_cores(n_jobs, cores)
    }

    pub fn resolve_with_cores(n_jobs: i32, cores: usize) -> Result<Jobs, AppError> {
        match n_jobs {
            0 => Err(AppError::new(
                EXIT_INVALID_INPUT,
                "n_jobs == 0 has no meaning; use 1 for serial or -1 for all cores.",
            )),
            1 => Ok(Jobs::Serial),
            -1 => Ok(Jobs::AllCores),
            n if n > 1 => Ok(Jobs::Workers(n as usize)),
            n => {
                let spare = n.unsigned_abs() as usize - 1;
                Ok(Jobs::Workers(cores.saturating_sub(spare).max(1)))
            }
        }
    }
}

/// How rows per split are chosen for a split plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSpec {
    Folds(usize),
    RowsPerSplit(usize),
}

/// Configuration of the offline reduction commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReduceConfig {
    pub results: PathBuf,
    pub decimals: u32,
    pub top: Option<usize>,
    pub export: Option<PathBuf>,
}

/// Configuration of a split plan over a training CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPlanConfig {
    pub data: PathBuf,
    pub index_col: Option<String>,
    pub target_col: String,
    pub split: SplitSpec,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn frame_rejects_ragged_columns() {
        let mut columns = Columns::new();
        columns.insert("Ta".to_string(), vec![1.0, 2.0]);
        let err = Frame::new(vec![ts(0)], columns).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);
    }

    #[test]
    fn frame_take_keeps_requested_order() {
        let mut columns = Columns::new();
        columns.insert("Ta".to_string(), vec![10.0, 11.0, 12.0]);
        let frame = Frame::new(vec![ts(0), ts(1), ts(2)], columns).unwrap();

        let sub = frame.take(&[2, 0]).unwrap();
        assert_eq!(sub.index(), &[ts(2), ts(0)]);
        assert_eq!(sub.column("Ta").unwrap(), &[12.0, 10.0]);
        assert_eq!(sub.bounds(), Some((ts(2), ts(0))));

        assert!(frame.take(&[3]).is_err());
    }

    #[test]
    fn legacy_naming_convention_tags_zero_names() {
        let mut params = Params::new();
        params.declare("Ti0", Some(20.0));
        params.declare("Ci", Some(1.0));
        assert!(params.get("Ti0").unwrap().initial_condition);
        assert!(!params.get("Ci").unwrap().initial_condition);
    }

    #[test]
    fn jobs_resolution_follows_worker_count_rules() {
        assert_eq!(Jobs::resolve_with_cores(1, 8).unwrap(), Jobs::Serial);
        assert_eq!(Jobs::resolve_with_cores(-1, 8).unwrap(), Jobs::AllCores);
        assert_eq!(Jobs::resolve_with_cores(4, 8).unwrap(), Jobs::Workers(4));
        assert_eq!(Jobs::resolve_with_cores(-2, 8).unwrap(), Jobs::Workers(7));
        assert_eq!(Jobs::resolve_with_cores(-20, 8).unwrap(), Jobs::Workers(1));
        assert!(Jobs::resolve_with_cores(0, 8).is_err());
    }

    #[test]
    fn train_config_defaults() {
        let config = TrainConfig::default();
        assert_eq!(config.method.as_str(), "nelder");
        assert_eq!(config.n_jobs, -1);
        assert_eq!(config.verbose, 10);
    }
}
