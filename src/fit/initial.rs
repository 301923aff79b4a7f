//! Initial-condition extraction.
//!
//! Grey-box models start their state integration from measured values: for a
//! parameter tagged as an initial condition (e.g. `Ti0`), the value is read
//! from the first row of the window's column with the same name.

use crate::domain::{Frame, IcParams, Params};
use crate::error::{AppError, EXIT_INSUFFICIENT_DATA};

/// Read the initial-condition parameters of `params` from row zero of `x`.
///
/// Every tagged parameter must have a matching column; a missing column (or
/// an empty window) is a caller error and is returned, not tolerated.
pub fn initial_conditions(params: &Params, x: &Frame) -> Result<IcParams, AppError> {
    let mut ic = IcParams::new();
    for (name, spec) in params.iter() {
        if !spec.initial_condition {
            continue;
        }
        let column = x.column(name).ok_or_else(|| {
            AppError::invalid_input(format!(
                "Initial-condition parameter '{name}' has no matching input column."
            ))
        })?;
        let first = column.first().copied().ok_or_else(|| {
            AppError::new(
                EXIT_INSUFFICIENT_DATA,
                format!("Cannot read initial condition '{name}' from an empty window."),
            )
        })?;
        ic.insert(name.to_string(), first);
    }
    Ok(ic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Columns, ParamSpec, Timestamp};
    use crate::error::EXIT_INVALID_INPUT;
    use chrono::NaiveDate;

    fn window(columns: &[(&str, Vec<f64>)]) -> Frame {
        let n = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let start = NaiveDate::from_ymd_opt(2021, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let index: Vec<Timestamp> = (0..n)
            .map(|i| start + chrono::Duration::hours(i as i64))
            .collect();
        let cols: Columns = columns
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Frame::new(index, cols).unwrap()
    }

    #[test]
    fn reads_first_row_of_tagged_params_only() {
        let mut params = Params::new();
        params.declare("A0", None);
        params.declare("B", None);
        let x = window(&[("A0", vec![12.5, 13.0]), ("B", vec![1.0, 2.0])]);

        let ic = initial_conditions(&params, &x).unwrap();
        assert_eq!(ic.len(), 1);
        assert_eq!(ic.get("A0"), Some(&12.5));
    }

    #[test]
    fn explicit_tag_overrides_naming_convention() {
        let params: Params = [
            ("A10", ParamSpec::new(None)),
            ("Tstart", ParamSpec::new(None).as_initial_condition()),
        ]
        .into_iter()
        .collect();
        let x = window(&[("A10", vec![3.0]), ("Tstart", vec![19.5])]);

        let ic = initial_conditions(&params, &x).unwrap();
        assert_eq!(ic.keys().collect::<Vec<_>>(), vec!["Tstart"]);
        assert_eq!(ic["Tstart"], 19.5);
    }

    #[test]
    fn no_initial_conditions_yields_empty_map() {
        let mut params = Params::new();
        params.declare("Ria", Some(0.1));
        let x = window(&[("Ta", vec![5.0])]);
        assert!(initial_conditions(&params, &x).unwrap().is_empty());
    }

    #[test]
    fn missing_column_is_a_contract_error() {
        let mut params = Params::new();
        params.declare("Ti0", None);
        let x = window(&[("Ta", vec![5.0])]);
        let err = initial_conditions(&params, &x).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);
        assert!(err.to_string().contains("Ti0"));
    }
}
