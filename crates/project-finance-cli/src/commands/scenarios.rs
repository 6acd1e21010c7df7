use clap::Args;
use serde_json::Value;

use project_finance_core::engine::{scenarios_with_config, stress_tests_with_config};
use project_finance_core::ConfigStore;

use super::AssumptionArgs;

/// Arguments for scenario and stress-test runs
#[derive(Args)]
pub struct ScenarioArgs {
    #[command(flatten)]
    pub assumptions: AssumptionArgs,

    /// Comma-separated names to run (all configured when omitted)
    #[arg(long, value_delimiter = ',')]
    pub names: Option<Vec<String>>,
}

pub fn run_scenarios(
    args: ScenarioArgs,
    config: &ConfigStore,
) -> Result<Value, Box<dyn std::error::Error>> {
    let base = args.assumptions.resolve(config)?;
    let result = scenarios_with_config(&base, args.names.as_deref(), config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_stress(
    args: ScenarioArgs,
    config: &ConfigStore,
) -> Result<Value, Box<dyn std::error::Error>> {
    let base = args.assumptions.resolve(config)?;
    let result = stress_tests_with_config(&base, args.names.as_deref(), config)?;
    Ok(serde_json::to_value(result)?)
}
