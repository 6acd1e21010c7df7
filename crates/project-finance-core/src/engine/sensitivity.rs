use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{ConfigStore, Parameter};
use crate::engine::assumptions::AssumptionSet;
use crate::engine::cashflow::{run_with_config, CashflowSummary};
use crate::engine::evaluate_all;
use crate::error::ProjectFinanceError;
use crate::types::*;
use crate::ProjectFinanceResult;

/// Result of one test value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub value: Decimal,
    pub summary: CashflowSummary,
    /// Equity NPV change against the base case
    pub npv_delta: Money,
}

/// Output of one-way sensitivity analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub parameter: Parameter,
    pub base_value: Decimal,
    pub base_summary: CashflowSummary,
    /// One point per test value, in the order supplied
    pub points: Vec<SensitivityPoint>,
}

/// Vary one parameter across `test_values`, holding every other assumption at
/// its base value.
pub fn sensitivity(
    base: &AssumptionSet,
    parameter_name: &str,
    test_values: &[Decimal],
) -> ProjectFinanceResult<ComputationOutput<SensitivityResult>> {
    sensitivity_with_config(base, parameter_name, test_values, ConfigStore::builtin())
}

pub fn sensitivity_with_config(
    base: &AssumptionSet,
    parameter_name: &str,
    test_values: &[Decimal],
    config: &ConfigStore,
) -> ProjectFinanceResult<ComputationOutput<SensitivityResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let parameter = config.lookup_parameter(parameter_name)?;
    let base_run = run_with_config(base, config)?;

    // Build and validate every derived set before running any of them
    let derived: Vec<AssumptionSet> = test_values
        .iter()
        .map(|v| {
            let set = base.with_value(parameter, *v)?;
            set.validate(config)?;
            Ok(set)
        })
        .collect::<ProjectFinanceResult<_>>()?;

    if derived.is_empty() {
        warnings.push(format!("No test values supplied for '{parameter}'"));
    }

    let runs = evaluate_all(&derived, |set| run_with_config(set, config))?;

    let base_npv = base_run.summary().npv;
    let points: Vec<SensitivityPoint> = test_values
        .iter()
        .zip(runs)
        .map(|(value, cashflow)| {
            let summary = cashflow.summary().clone();
            SensitivityPoint {
                value: *value,
                npv_delta: summary.npv - base_npv,
                summary,
            }
        })
        .collect();

    let undefined_irr = points.iter().filter(|p| p.summary.irr.is_none()).count();
    if undefined_irr > 0 {
        warnings.push(format!(
            "Equity IRR undefined at {undefined_irr} of {} test values",
            points.len()
        ));
    }

    let output = SensitivityResult {
        parameter,
        base_value: base.get(parameter),
        base_summary: base_run.summary().clone(),
        points,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "One-Way Sensitivity Analysis",
        &serde_json::json!({
            "parameter": parameter.as_str(),
            "test_values": test_values.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
            "base_assumptions": base,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// `points` evenly spaced values from `min` to `max` inclusive.
pub fn linspace(min: Decimal, max: Decimal, points: usize) -> Vec<Decimal> {
    match points {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / Decimal::from(points as u64 - 1);
            (0..points)
                .map(|i| {
                    if i == points - 1 {
                        max
                    } else {
                        min + step * Decimal::from(i as u64)
                    }
                })
                .collect()
        }
    }
}

/// Evenly spaced test values across a parameter's configured range. Values of
/// whole-year parameters are rounded.
pub fn sweep_values(
    parameter_name: &str,
    points: usize,
    config: &ConfigStore,
) -> ProjectFinanceResult<Vec<Decimal>> {
    if points == 0 {
        return Err(ProjectFinanceError::InvalidAssumption {
            field: "points".into(),
            value: Decimal::ZERO,
            reason: "A sweep needs at least one point".into(),
            domain: ">= 1".into(),
        });
    }
    let parameter = config.lookup_parameter(parameter_name)?;
    let spec = config.parameter(parameter)?;
    let values = linspace(spec.min, spec.max, points);
    Ok(if parameter.is_integral() {
        values.into_iter().map(|v| spec.clamp(v)).collect()
    } else {
        values
    })
}
