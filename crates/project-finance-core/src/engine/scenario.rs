use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{ConfigStore, OffsetBundle};
use crate::engine::assumptions::AssumptionSet;
use crate::engine::cashflow::{run_with_config, ProjectCashflow};
use crate::engine::evaluate_all;
use crate::types::*;
use crate::ProjectFinanceResult;

/// Result for a single scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub description: String,
    pub cashflow: ProjectCashflow,
}

/// Scenario name to cash flow, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenarios: Vec<ScenarioOutcome>,
}

impl ScenarioResult {
    pub fn get(&self, name: &str) -> Option<&ProjectCashflow> {
        self.scenarios
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.cashflow)
    }

    pub fn names(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Insert keeping the first position of a name; a repeated name replaces
    /// the earlier result.
    fn insert(&mut self, outcome: ScenarioOutcome) {
        match self.scenarios.iter_mut().find(|s| s.name == outcome.name) {
            Some(existing) => *existing = outcome,
            None => self.scenarios.push(outcome),
        }
    }
}

/// Run the named scenarios (all configured scenarios when `names` is None).
pub fn scenarios(
    base: &AssumptionSet,
    names: Option<&[String]>,
) -> ProjectFinanceResult<ComputationOutput<ScenarioResult>> {
    scenarios_with_config(base, names, ConfigStore::builtin())
}

pub fn scenarios_with_config(
    base: &AssumptionSet,
    names: Option<&[String]>,
    config: &ConfigStore,
) -> ProjectFinanceResult<ComputationOutput<ScenarioResult>> {
    let bundles = match names {
        Some(names) => names
            .iter()
            .map(|n| config.scenario(n))
            .collect::<ProjectFinanceResult<Vec<_>>>()?,
        None => config.scenarios.iter().collect(),
    };
    evaluate_bundles(base, &bundles, config, "Scenario Analysis")
}

/// Run the named stress tests (all configured stress tests when `names` is
/// None).
pub fn stress_tests(
    base: &AssumptionSet,
    names: Option<&[String]>,
) -> ProjectFinanceResult<ComputationOutput<ScenarioResult>> {
    stress_tests_with_config(base, names, ConfigStore::builtin())
}

pub fn stress_tests_with_config(
    base: &AssumptionSet,
    names: Option<&[String]>,
    config: &ConfigStore,
) -> ProjectFinanceResult<ComputationOutput<ScenarioResult>> {
    let bundles = match names {
        Some(names) => names
            .iter()
            .map(|n| config.stress_test(n))
            .collect::<ProjectFinanceResult<Vec<_>>>()?,
        None => config.stress_tests.iter().collect(),
    };
    evaluate_bundles(base, &bundles, config, "Stress Test Analysis")
}

fn evaluate_bundles(
    base: &AssumptionSet,
    bundles: &[&OffsetBundle],
    config: &ConfigStore,
    methodology: &str,
) -> ProjectFinanceResult<ComputationOutput<ScenarioResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    base.validate(config)?;

    let mut adjusted = Vec::with_capacity(bundles.len());
    for bundle in bundles {
        let (set, notes) = base.apply_bundle(bundle, config)?;
        warnings.extend(notes);
        adjusted.push(set);
    }

    let runs = evaluate_all(&adjusted, |set| run_with_config(set, config))?;

    let mut result = ScenarioResult::default();
    for (bundle, cashflow) in bundles.iter().zip(runs) {
        for w in cashflow.warnings() {
            warnings.push(format!("{}: {}", bundle.name, w));
        }
        result.insert(ScenarioOutcome {
            name: bundle.name.clone(),
            description: bundle.description.clone(),
            cashflow,
        });
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "scenarios": bundles.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
            "base_assumptions": base,
        }),
        warnings,
        elapsed,
        result,
    ))
}
