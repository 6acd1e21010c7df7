use clap::{ArgGroup, Args};
use rust_decimal::Decimal;
use serde_json::Value;

use project_finance_core::engine::{sensitivity_with_config, sweep_values};
use project_finance_core::ConfigStore;

use super::AssumptionArgs;

/// Arguments for one-way sensitivity analysis
#[derive(Args)]
#[command(group(ArgGroup::new("sweep").required(true).args(["values", "points"])))]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub assumptions: AssumptionArgs,

    /// Parameter to vary (e.g. discount_rate, project_period)
    #[arg(long)]
    pub parameter: String,

    /// Comma-separated test values (e.g. "0.10,0.12,0.15")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub values: Option<Vec<Decimal>>,

    /// Number of evenly spaced points across the parameter's configured range
    #[arg(long)]
    pub points: Option<usize>,
}

pub fn run_sensitivity(
    args: SensitivityArgs,
    config: &ConfigStore,
) -> Result<Value, Box<dyn std::error::Error>> {
    let base = args.assumptions.resolve(config)?;

    let values = match (args.values, args.points) {
        (Some(values), _) => values,
        (None, Some(points)) => sweep_values(&args.parameter, points, config)?,
        (None, None) => return Err("--values or --points required for sensitivity".into()),
    };
    tracing::debug!(parameter = %args.parameter, points = values.len(), "running sensitivity");

    let result = sensitivity_with_config(&base, &args.parameter, &values, config)?;
    Ok(serde_json::to_value(result)?)
}
