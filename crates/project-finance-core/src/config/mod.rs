//! Read-only catalogue of parameter domains, scenario and stress-test offset
//! bundles, financial benchmarks and engine constants.
//!
//! The built-in catalogue is available through [`ConfigStore::builtin`]. An
//! alternative catalogue can be deserialized from JSON or YAML and checked with
//! [`ConfigStore::validate`] before it is handed to the engine.

pub mod parameters;
pub mod scenarios;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::error::ProjectFinanceError;
use crate::types::{Multiple, Rate};
use crate::ProjectFinanceResult;

pub use parameters::{Parameter, ParameterSpec, Unit};
pub use scenarios::{Offset, OffsetBundle, ParameterOffset};

/// Bracketed bisection settings for IRR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrSearchConfig {
    pub lower_bound: Rate,
    pub upper_bound: Rate,
    /// Search stops once the bracket half-width falls below this
    pub tolerance: Decimal,
    pub max_iterations: u32,
}

impl Default for IrrSearchConfig {
    fn default() -> Self {
        Self {
            lower_bound: dec!(-0.99),
            upper_bound: dec!(10),
            tolerance: dec!(0.0000000001),
            max_iterations: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConstants {
    /// Year-1 revenue as a fraction of total investment
    pub revenue_to_investment_ratio: Rate,
    pub irr: IrrSearchConfig,
}

impl Default for EngineConstants {
    fn default() -> Self {
        Self {
            revenue_to_investment_ratio: dec!(0.20),
            irr: IrrSearchConfig::default(),
        }
    }
}

/// Lender and sponsor thresholds results are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benchmarks {
    pub min_dscr: Multiple,
    pub target_dscr: Multiple,
    pub min_equity_irr: Rate,
    pub acceptable_npv: Decimal,
}

impl Default for Benchmarks {
    fn default() -> Self {
        Self {
            min_dscr: dec!(1.25),
            target_dscr: dec!(1.50),
            min_equity_irr: dec!(0.10),
            acceptable_npv: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigStore {
    pub parameters: Vec<ParameterSpec>,
    #[serde(default)]
    pub scenarios: Vec<OffsetBundle>,
    #[serde(default)]
    pub stress_tests: Vec<OffsetBundle>,
    #[serde(default)]
    pub benchmarks: Benchmarks,
    #[serde(default)]
    pub engine: EngineConstants,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self {
            parameters: parameters::builtin_parameters(),
            scenarios: scenarios::builtin_scenarios(),
            stress_tests: scenarios::builtin_stress_tests(),
            benchmarks: Benchmarks::default(),
            engine: EngineConstants::default(),
        }
    }
}

impl ConfigStore {
    /// Shared built-in catalogue.
    pub fn builtin() -> &'static ConfigStore {
        static BUILTIN: OnceLock<ConfigStore> = OnceLock::new();
        BUILTIN.get_or_init(ConfigStore::default)
    }

    pub fn from_json_str(s: &str) -> ProjectFinanceResult<ConfigStore> {
        let store: ConfigStore = serde_json::from_str(s)?;
        store.validate()?;
        Ok(store)
    }

    pub fn parameter(&self, parameter: Parameter) -> ProjectFinanceResult<&ParameterSpec> {
        self.parameters
            .iter()
            .find(|s| s.parameter == parameter)
            .ok_or_else(|| {
                ProjectFinanceError::InvalidConfig(format!(
                    "No range configured for parameter '{parameter}'"
                ))
            })
    }

    /// Resolve a caller-supplied parameter name.
    pub fn lookup_parameter(&self, name: &str) -> ProjectFinanceResult<Parameter> {
        Parameter::from_name(name)
            .filter(|p| self.parameters.iter().any(|s| s.parameter == *p))
            .ok_or_else(|| ProjectFinanceError::UnknownParameter {
                name: name.to_string(),
                known: self
                    .parameters
                    .iter()
                    .map(|s| s.parameter.as_str().to_string())
                    .collect(),
            })
    }

    pub fn scenario(&self, name: &str) -> ProjectFinanceResult<&OffsetBundle> {
        find_bundle(&self.scenarios, name)
    }

    pub fn stress_test(&self, name: &str) -> ProjectFinanceResult<&OffsetBundle> {
        find_bundle(&self.stress_tests, name)
    }

    pub fn scenario_names(&self) -> Vec<String> {
        self.scenarios.iter().map(|b| b.name.clone()).collect()
    }

    pub fn stress_test_names(&self) -> Vec<String> {
        self.stress_tests.iter().map(|b| b.name.clone()).collect()
    }

    /// Check the catalogue is internally consistent: every parameter has
    /// exactly one spec, each range stays inside the parameter's structural
    /// bounds and defaults sit inside their ranges.
    pub fn validate(&self) -> ProjectFinanceResult<()> {
        let mut seen = HashSet::new();
        for spec in &self.parameters {
            if !seen.insert(spec.parameter) {
                return Err(ProjectFinanceError::InvalidConfig(format!(
                    "Parameter '{}' is configured more than once",
                    spec.parameter
                )));
            }
            if spec.min > spec.max {
                return Err(ProjectFinanceError::InvalidConfig(format!(
                    "Parameter '{}' has min {} above max {}",
                    spec.parameter, spec.min, spec.max
                )));
            }
            if !spec.parameter.admits(spec.min) || !spec.parameter.admits(spec.max) {
                return Err(ProjectFinanceError::InvalidConfig(format!(
                    "Range [{}, {}] for '{}' leaves its structural domain {}",
                    spec.min,
                    spec.max,
                    spec.parameter,
                    spec.parameter.structural_domain()
                )));
            }
            if !spec.contains(spec.default) {
                return Err(ProjectFinanceError::InvalidConfig(format!(
                    "Default {} for '{}' lies outside {}",
                    spec.default,
                    spec.parameter,
                    spec.domain()
                )));
            }
        }
        for p in Parameter::ALL {
            if !seen.contains(&p) {
                return Err(ProjectFinanceError::InvalidConfig(format!(
                    "No range configured for parameter '{p}'"
                )));
            }
        }

        for bundle in self.scenarios.iter().chain(self.stress_tests.iter()) {
            if bundle.name.trim().is_empty() {
                return Err(ProjectFinanceError::InvalidConfig(
                    "Offset bundle names must not be empty".into(),
                ));
            }
        }

        let irr = &self.engine.irr;
        if irr.lower_bound <= dec!(-1) || irr.lower_bound >= irr.upper_bound {
            return Err(ProjectFinanceError::InvalidConfig(format!(
                "IRR search bracket [{}, {}] must satisfy -1 < lower < upper",
                irr.lower_bound, irr.upper_bound
            )));
        }
        if irr.tolerance <= Decimal::ZERO || irr.max_iterations == 0 {
            return Err(ProjectFinanceError::InvalidConfig(
                "IRR tolerance and iteration cap must be positive".into(),
            ));
        }
        if self.engine.revenue_to_investment_ratio < Decimal::ZERO {
            return Err(ProjectFinanceError::InvalidConfig(
                "Revenue-to-investment ratio cannot be negative".into(),
            ));
        }

        Ok(())
    }
}

fn find_bundle<'a>(bundles: &'a [OffsetBundle], name: &str) -> ProjectFinanceResult<&'a OffsetBundle> {
    // Later entries shadow earlier ones with the same name
    bundles
        .iter()
        .rev()
        .find(|b| b.name == name)
        .ok_or_else(|| ProjectFinanceError::UnknownScenario {
            name: name.to_string(),
            known: bundles.iter().map(|b| b.name.clone()).collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_store_is_valid() {
        ConfigStore::builtin().validate().unwrap();
        assert_eq!(
            ConfigStore::builtin().scenario_names(),
            vec!["Base Case", "Downside", "Upside"]
        );
    }

    #[test]
    fn test_unknown_parameter_lists_known_names() {
        let err = ConfigStore::builtin()
            .lookup_parameter("inflation")
            .unwrap_err();
        match err {
            ProjectFinanceError::UnknownParameter { name, known } => {
                assert_eq!(name, "inflation");
                assert!(known.contains(&"debt_rate".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_scenario() {
        let err = ConfigStore::builtin().scenario("Apocalypse").unwrap_err();
        assert!(matches!(err, ProjectFinanceError::UnknownScenario { .. }));
        assert_eq!(err.field(), Some("Apocalypse"));
    }

    #[test]
    fn test_stress_test_lookup() {
        let bundle = ConfigStore::builtin()
            .stress_test("High Interest Rate Shock")
            .unwrap();
        assert_eq!(bundle.offsets.len(), 1);
        assert_eq!(bundle.offsets[0].parameter, Parameter::DebtRate);
    }

    #[test]
    fn test_validate_rejects_default_outside_range() {
        let mut store = ConfigStore::default();
        store.parameters[0].default = dec!(1);
        assert!(matches!(
            store.validate(),
            Err(ProjectFinanceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_range_beyond_structural_bounds() {
        let mut store = ConfigStore::default();
        let tax = store
            .parameters
            .iter_mut()
            .find(|s| s.parameter == Parameter::TaxRate)
            .unwrap();
        tax.max = dec!(3);
        match store.validate() {
            Err(ProjectFinanceError::InvalidConfig(msg)) => {
                assert!(msg.contains("tax_rate"));
                assert!(msg.contains("[0, 1]"));
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }

        let mut store = ConfigStore::default();
        let rate = store
            .parameters
            .iter_mut()
            .find(|s| s.parameter == Parameter::DebtRate)
            .unwrap();
        rate.min = dec!(-0.05);
        assert!(store.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_parameter() {
        let mut store = ConfigStore::default();
        store.parameters.retain(|s| s.parameter != Parameter::TaxRate);
        assert!(store.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_irr_bracket() {
        let mut store = ConfigStore::default();
        store.engine.irr.lower_bound = dec!(-1);
        assert!(store.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_catalogue() {
        let json = serde_json::to_string(ConfigStore::builtin()).unwrap();
        let store = ConfigStore::from_json_str(&json).unwrap();
        assert_eq!(store.parameters.len(), Parameter::ALL.len());
        assert_eq!(store.stress_tests, ConfigStore::builtin().stress_tests);
    }
}
