//! Test helpers: a trivial model and window builders.

use chrono::NaiveDate;

use crate::domain::{Columns, Frame, IcParams, Method, ParamSpec, Params, Series, Timestamp};
use crate::error::FitError;
use crate::models::{GreyBoxModel, ModelResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Fit,
    /// Fails with a tolerated non-convergence error.
    Diverge,
    /// Fails with an error that is not tolerated.
    Break,
}

/// Predicts a constant `level = mean(y) + offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelModel {
    pub name: String,
    pub params: Params,
    pub behavior: Behavior,
}

impl LevelModel {
    pub fn new(name: &str, offset: f64) -> Self {
        let params: Params = [
            ("level", ParamSpec::new(None)),
            ("offset", ParamSpec::new(Some(offset)).fixed()),
        ]
        .into_iter()
        .collect();
        Self {
            name: name.to_string(),
            params,
            behavior: Behavior::Fit,
        }
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_ic(mut self, name: &str) -> Self {
        self.params.insert(name, ParamSpec::new(None).as_initial_condition());
        self
    }
}

impl GreyBoxModel for LevelModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn fit(
        mut self,
        _x: &Columns,
        y: &[f64],
        _method: &Method,
        ic_params: &IcParams,
    ) -> Result<Self, FitError> {
        match self.behavior {
            Behavior::Fit => {}
            Behavior::Diverge => return Err(FitError::NonConvergence("max iterations reached".into())),
            Behavior::Break => return Err(FitError::Other("solver crashed".into())),
        }
        let offset = self.params.get("offset").and_then(|p| p.value).unwrap_or(0.0);
        let mean = y.iter().sum::<f64>() / y.len() as f64;
        if let Some(level) = self.params.get_mut("level") {
            level.value = Some(mean + offset);
        }
        for (name, value) in ic_params {
            if let Some(spec) = self.params.get_mut(name) {
                spec.value = Some(*value);
            }
        }
        Ok(self)
    }

    fn predict(&self, x: &Frame) -> Result<ModelResult, FitError> {
        let level = self
            .params
            .get("level")
            .and_then(|p| p.value)
            .ok_or_else(|| FitError::Contract("predict before fit".into()))?;
        Ok(ModelResult::new(vec![level; x.len()]))
    }
}

pub fn hour(i: usize) -> Timestamp {
    NaiveDate::from_ymd_opt(2021, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::hours(i as i64)
}

/// Hourly window with `Ti0` = `y` and a constant `Ta` column.
pub fn hourly_window(y: &[f64]) -> (Frame, Series) {
    let index: Vec<Timestamp> = (0..y.len()).map(hour).collect();
    let mut columns = Columns::new();
    columns.insert("Ti0".to_string(), y.to_vec());
    columns.insert("Ta".to_string(), vec![5.0; y.len()]);
    (
        Frame::new(index.clone(), columns).unwrap(),
        Series::new(index, y.to_vec()).unwrap(),
    )
}
