pub mod file;
pub mod stdin;

use project_finance_core::{AssumptionSet, ConfigStore};

/// Resolve the base assumptions: `--input` file first, then piped stdin,
/// otherwise the catalogue defaults. Fields missing from the input keep their
/// catalogue defaults.
pub fn load_assumptions(
    path: Option<&str>,
    config: &ConfigStore,
) -> Result<AssumptionSet, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        tracing::debug!(path, "reading assumptions from file");
        let data: serde_json::Value = file::read_json(path)?;
        return Ok(AssumptionSet::from_partial_json(data, config)?);
    }
    if let Some(data) = stdin::read_stdin()? {
        tracing::debug!("reading assumptions from stdin");
        return Ok(AssumptionSet::from_partial_json(data, config)?);
    }
    tracing::debug!("no input supplied, using configured defaults");
    Ok(AssumptionSet::from_config(config)?)
}

/// Load the catalogue from `--config`, falling back to the built-in one.
pub fn load_config(path: Option<&str>) -> Result<ConfigStore, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let config = file::read_config(path)?;
            tracing::info!(
                path,
                scenarios = config.scenarios.len(),
                stress_tests = config.stress_tests.len(),
                "loaded configuration"
            );
            Ok(config)
        }
        None => Ok(ConfigStore::builtin().clone()),
    }
}
