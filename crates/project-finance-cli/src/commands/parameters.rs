use serde::Serialize;
use serde_json::Value;

use project_finance_core::config::ParameterSpec;
use project_finance_core::ConfigStore;

#[derive(Serialize)]
struct Catalogue<'a> {
    parameters: &'a [ParameterSpec],
    scenarios: Vec<String>,
    stress_tests: Vec<String>,
}

/// List the configured parameters with their ranges, plus the available
/// scenario and stress-test names.
pub fn run_parameters(config: &ConfigStore) -> Result<Value, Box<dyn std::error::Error>> {
    let catalogue = Catalogue {
        parameters: &config.parameters,
        scenarios: config.scenario_names(),
        stress_tests: config.stress_test_names(),
    };
    let mut envelope = serde_json::Map::new();
    envelope.insert("result".into(), serde_json::to_value(catalogue)?);
    Ok(Value::Object(envelope))
}
