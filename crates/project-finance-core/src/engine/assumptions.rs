use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigStore, OffsetBundle, Parameter};
use crate::error::ProjectFinanceError;
use crate::types::{Money, Rate};
use crate::ProjectFinanceResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Scalar assumptions for one project evaluation.
///
/// Fields omitted from serialized input take the built-in defaults; use
/// [`AssumptionSet::from_partial_json`] to fill them from another catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssumptionSet {
    /// Total capital cost, funded by equity and debt
    pub total_investment: Money,
    /// Share of investment funded by equity; debt funds the rest
    pub equity_ratio: Rate,
    /// Interest rate on outstanding debt
    pub debt_rate: Rate,
    /// Discount rate (WACC) for NPV and payback
    pub discount_rate: Rate,
    /// Annual revenue growth, may be negative
    pub revenue_growth: Rate,
    /// Operating cost as a fraction of revenue
    pub op_cost_ratio: Rate,
    /// Project horizon in whole years; debt amortizes over the same horizon
    pub project_period: u32,
    /// Corporate tax rate
    pub tax_rate: Rate,
    /// Multiplier on the year-1 revenue implied by the investment size
    pub revenue_factor: Decimal,
    /// Annual escalation of operating cost on top of revenue-linked cost
    pub opex_inflation: Rate,
    /// Straight-line depreciation life; the project period when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation_period: Option<u32>,
}

impl Default for AssumptionSet {
    fn default() -> Self {
        Self {
            total_investment: dec!(5_000_000_000),
            equity_ratio: dec!(0.30),
            debt_rate: dec!(0.09),
            discount_rate: dec!(0.15),
            revenue_growth: dec!(0.03),
            op_cost_ratio: dec!(0.35),
            project_period: 25,
            tax_rate: dec!(0.20),
            revenue_factor: Decimal::ONE,
            opex_inflation: Decimal::ZERO,
            depreciation_period: None,
        }
    }
}

impl AssumptionSet {
    /// Assumptions at every configured default.
    pub fn from_config(config: &ConfigStore) -> ProjectFinanceResult<Self> {
        let mut set = AssumptionSet::default();
        for parameter in Parameter::ALL {
            let default = config.parameter(parameter)?.default;
            set = set.with_value(parameter, default)?;
        }
        Ok(set)
    }

    /// Catalogue defaults overlaid with the fields present in `input`, which
    /// must be a JSON object.
    pub fn from_partial_json(
        input: serde_json::Value,
        config: &ConfigStore,
    ) -> ProjectFinanceResult<Self> {
        let fields = match input {
            serde_json::Value::Object(fields) => fields,
            other => {
                return Err(ProjectFinanceError::Serialization(format!(
                    "Assumptions must be a JSON object, got {other}"
                )))
            }
        };
        let mut merged = serde_json::to_value(Self::from_config(config)?)?;
        if let Some(base) = merged.as_object_mut() {
            base.extend(fields);
        }
        Ok(serde_json::from_value(merged)?)
    }

    pub fn get(&self, parameter: Parameter) -> Decimal {
        match parameter {
            Parameter::TotalInvestment => self.total_investment,
            Parameter::EquityRatio => self.equity_ratio,
            Parameter::DebtRate => self.debt_rate,
            Parameter::DiscountRate => self.discount_rate,
            Parameter::RevenueGrowth => self.revenue_growth,
            Parameter::OpCostRatio => self.op_cost_ratio,
            Parameter::ProjectPeriod => Decimal::from(self.project_period),
            Parameter::TaxRate => self.tax_rate,
            Parameter::RevenueFactor => self.revenue_factor,
            Parameter::OpexInflation => self.opex_inflation,
        }
    }

    /// Copy of these assumptions with one parameter replaced.
    ///
    /// Only representability is checked here; domain checks happen in
    /// [`AssumptionSet::validate`].
    pub fn with_value(&self, parameter: Parameter, value: Decimal) -> ProjectFinanceResult<Self> {
        let mut next = self.clone();
        match parameter {
            Parameter::TotalInvestment => next.total_investment = value,
            Parameter::EquityRatio => next.equity_ratio = value,
            Parameter::DebtRate => next.debt_rate = value,
            Parameter::DiscountRate => next.discount_rate = value,
            Parameter::RevenueGrowth => next.revenue_growth = value,
            Parameter::OpCostRatio => next.op_cost_ratio = value,
            Parameter::ProjectPeriod => next.project_period = whole_years(parameter, value)?,
            Parameter::TaxRate => next.tax_rate = value,
            Parameter::RevenueFactor => next.revenue_factor = value,
            Parameter::OpexInflation => next.opex_inflation = value,
        }
        Ok(next)
    }

    /// Apply a scenario or stress bundle, clamping every adjusted value into
    /// its configured range. Returns the adjusted set and one note per clamp.
    pub fn apply_bundle(
        &self,
        bundle: &OffsetBundle,
        config: &ConfigStore,
    ) -> ProjectFinanceResult<(Self, Vec<String>)> {
        let mut adjusted = self.clone();
        let mut notes = Vec::new();

        for po in &bundle.offsets {
            let spec = config.parameter(po.parameter)?;
            let raw = po.offset.apply(adjusted.get(po.parameter));
            let clamped = spec.clamp(raw);
            if clamped != raw {
                notes.push(format!(
                    "Scenario '{}': {} adjusted to {} and clamped to {}",
                    bundle.name, po.parameter, raw, clamped
                ));
            }
            adjusted = adjusted.with_value(po.parameter, clamped)?;
        }

        Ok((adjusted, notes))
    }

    /// Check every field against its structural bounds and its configured
    /// domain, then the constraints the engine depends on.
    pub fn validate(&self, config: &ConfigStore) -> ProjectFinanceResult<()> {
        for parameter in Parameter::ALL {
            let spec = config.parameter(parameter)?;
            let value = self.get(parameter);
            if !parameter.admits(value) {
                return Err(ProjectFinanceError::InvalidAssumption {
                    field: parameter.as_str().into(),
                    value,
                    reason: format!("{} is outside its structural bounds", spec.label),
                    domain: parameter.structural_domain(),
                });
            }
            if !spec.contains(value) {
                return Err(ProjectFinanceError::InvalidAssumption {
                    field: parameter.as_str().into(),
                    value,
                    reason: format!("{} is outside its configured range", spec.label),
                    domain: spec.domain(),
                });
            }
        }

        if self.total_investment <= Decimal::ZERO {
            return Err(ProjectFinanceError::InvalidAssumption {
                field: "total_investment".into(),
                value: self.total_investment,
                reason: "Total investment must be positive".into(),
                domain: "> 0".into(),
            });
        }

        if self.project_period == 0 {
            return Err(ProjectFinanceError::InvalidAssumption {
                field: "project_period".into(),
                value: Decimal::ZERO,
                reason: "Project period must be at least 1 year".into(),
                domain: ">= 1 years".into(),
            });
        }

        if self.equity_ratio.is_zero() {
            return Err(ProjectFinanceError::InvalidAssumption {
                field: "equity_ratio".into(),
                value: self.equity_ratio,
                reason: "Fully debt-funded projects have no equity outlay to measure returns against"
                    .into(),
                domain: "(0, 1] fraction".into(),
            });
        }

        if let Some(0) = self.depreciation_period {
            return Err(ProjectFinanceError::InvalidAssumption {
                field: "depreciation_period".into(),
                value: Decimal::ZERO,
                reason: "Depreciation period must be at least 1 year".into(),
                domain: ">= 1 years".into(),
            });
        }

        Ok(())
    }

    pub fn debt_ratio(&self) -> Rate {
        Decimal::ONE - self.equity_ratio
    }

    pub fn equity_investment(&self) -> Money {
        self.total_investment * self.equity_ratio
    }

    pub fn debt_amount(&self) -> Money {
        self.total_investment * self.debt_ratio()
    }

    pub fn initial_revenue(&self, config: &ConfigStore) -> Money {
        self.total_investment * config.engine.revenue_to_investment_ratio * self.revenue_factor
    }

    pub fn effective_depreciation_period(&self) -> u32 {
        self.depreciation_period.unwrap_or(self.project_period)
    }
}

fn whole_years(parameter: Parameter, value: Decimal) -> ProjectFinanceResult<u32> {
    if !value.fract().is_zero() {
        return Err(ProjectFinanceError::InvalidAssumption {
            field: parameter.as_str().into(),
            value,
            reason: "Must be a whole number of years".into(),
            domain: "whole years".into(),
        });
    }
    value
        .to_u32()
        .ok_or_else(|| ProjectFinanceError::InvalidAssumption {
            field: parameter.as_str().into(),
            value,
            reason: "Must be a non-negative whole number of years".into(),
            domain: "whole years >= 0".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Offset, ParameterOffset};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_matches_builtin_catalogue() {
        let from_config = AssumptionSet::from_config(ConfigStore::builtin()).unwrap();
        assert_eq!(from_config, AssumptionSet::default());
    }

    #[test]
    fn test_financing_shares_sum_to_one() {
        let a = AssumptionSet::default();
        assert_eq!(a.equity_ratio + a.debt_ratio(), Decimal::ONE);
        assert_eq!(a.equity_investment() + a.debt_amount(), a.total_investment);
        assert_eq!(a.equity_investment(), dec!(1_500_000_000));
    }

    #[test]
    fn test_initial_revenue_from_investment() {
        let a = AssumptionSet::default();
        assert_eq!(a.initial_revenue(ConfigStore::builtin()), dec!(1_000_000_000));
    }

    #[test]
    fn test_with_value_project_period() {
        let a = AssumptionSet::default()
            .with_value(Parameter::ProjectPeriod, dec!(10))
            .unwrap();
        assert_eq!(a.project_period, 10);
        assert!(AssumptionSet::default()
            .with_value(Parameter::ProjectPeriod, dec!(10.5))
            .is_err());
        assert!(AssumptionSet::default()
            .with_value(Parameter::ProjectPeriod, dec!(-2))
            .is_err());
    }

    #[test]
    fn test_validate_reports_field_and_domain() {
        let a = AssumptionSet {
            equity_ratio: dec!(1.2),
            ..AssumptionSet::default()
        };
        let err = a.validate(ConfigStore::builtin()).unwrap_err();
        match err {
            ProjectFinanceError::InvalidAssumption { field, domain, .. } => {
                assert_eq!(field, "equity_ratio");
                assert_eq!(domain, "[0, 1]");
            }
            other => panic!("unexpected error: {other}"),
        }

        let b = AssumptionSet {
            op_cost_ratio: dec!(0.5),
            project_period: 41,
            ..AssumptionSet::default()
        };
        match b.validate(ConfigStore::builtin()).unwrap_err() {
            ProjectFinanceError::InvalidAssumption { field, domain, .. } => {
                assert_eq!(field, "project_period");
                assert_eq!(domain, "[1, 40] years");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_structural_bounds_hold_under_loose_catalogue() {
        // Catalogue deliberately left unvalidated
        let mut loose = ConfigStore::default();
        for spec in loose.parameters.iter_mut() {
            match spec.parameter {
                Parameter::EquityRatio => spec.max = dec!(2),
                Parameter::TaxRate => spec.max = dec!(3),
                Parameter::DiscountRate => spec.min = dec!(-0.5),
                _ => {}
            }
        }

        let over_equity = AssumptionSet {
            equity_ratio: dec!(1.5),
            ..AssumptionSet::default()
        };
        assert_eq!(over_equity.validate(&loose).unwrap_err().field(), Some("equity_ratio"));

        let over_tax = AssumptionSet {
            tax_rate: dec!(2.5),
            ..AssumptionSet::default()
        };
        assert_eq!(over_tax.validate(&loose).unwrap_err().field(), Some("tax_rate"));

        let negative_discount = AssumptionSet {
            discount_rate: dec!(-0.1),
            ..AssumptionSet::default()
        };
        assert_eq!(
            negative_discount.validate(&loose).unwrap_err().field(),
            Some("discount_rate")
        );

        assert!(AssumptionSet::default().validate(&loose).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_period() {
        let a = AssumptionSet {
            project_period: 0,
            ..AssumptionSet::default()
        };
        let err = a.validate(ConfigStore::builtin()).unwrap_err();
        assert_eq!(err.field(), Some("project_period"));
    }

    #[test]
    fn test_validate_rejects_zero_equity() {
        let a = AssumptionSet {
            equity_ratio: Decimal::ZERO,
            ..AssumptionSet::default()
        };
        let err = a.validate(ConfigStore::builtin()).unwrap_err();
        assert_eq!(err.field(), Some("equity_ratio"));
    }

    #[test]
    fn test_validate_accepts_zero_rates() {
        let a = AssumptionSet {
            debt_rate: Decimal::ZERO,
            discount_rate: Decimal::ZERO,
            ..AssumptionSet::default()
        };
        assert!(a.validate(ConfigStore::builtin()).is_ok());
    }

    #[test]
    fn test_apply_bundle_clamps_into_range() {
        let bundle = OffsetBundle {
            name: "Extreme".into(),
            description: String::new(),
            offsets: vec![
                ParameterOffset {
                    parameter: Parameter::OpCostRatio,
                    offset: Offset::Multiply(dec!(4)),
                },
                ParameterOffset {
                    parameter: Parameter::ProjectPeriod,
                    offset: Offset::Add(dec!(-100)),
                },
            ],
        };
        let (adjusted, notes) = AssumptionSet::default()
            .apply_bundle(&bundle, ConfigStore::builtin())
            .unwrap();
        assert_eq!(adjusted.op_cost_ratio, dec!(1));
        assert_eq!(adjusted.project_period, 1);
        assert_eq!(notes.len(), 2);
        assert!(adjusted.validate(ConfigStore::builtin()).is_ok());
    }

    #[test]
    fn test_apply_bundle_downside() {
        let downside = ConfigStore::builtin().scenario("Downside").unwrap();
        let (adjusted, notes) = AssumptionSet::default()
            .apply_bundle(downside, ConfigStore::builtin())
            .unwrap();
        assert!(notes.is_empty());
        assert_eq!(adjusted.total_investment, dec!(5_500_000_000));
        assert_eq!(adjusted.debt_rate, dec!(0.10));
        assert_eq!(adjusted.revenue_growth, dec!(0.01));
        assert_eq!(adjusted.op_cost_ratio, dec!(0.3675));
    }

    #[test]
    fn test_partial_json_overlays_catalogue_defaults() {
        let mut config = ConfigStore::default();
        for spec in config.parameters.iter_mut() {
            match spec.parameter {
                Parameter::TotalInvestment => spec.default = dec!(2_000_000_000),
                Parameter::TaxRate => spec.default = dec!(0.25),
                _ => {}
            }
        }
        let a = AssumptionSet::from_partial_json(
            serde_json::json!({ "project_period": 10, "depreciation_period": 8 }),
            &config,
        )
        .unwrap();
        assert_eq!(a.project_period, 10);
        assert_eq!(a.depreciation_period, Some(8));
        assert_eq!(a.total_investment, dec!(2_000_000_000));
        assert_eq!(a.tax_rate, dec!(0.25));
        assert_eq!(a.debt_rate, dec!(0.09));

        let err = AssumptionSet::from_partial_json(serde_json::json!([1, 2]), &config).unwrap_err();
        assert!(matches!(err, ProjectFinanceError::Serialization(_)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let a: AssumptionSet =
            serde_json::from_str(r#"{"project_period": 10, "equity_ratio": "0.5"}"#).unwrap();
        assert_eq!(a.project_period, 10);
        assert_eq!(a.equity_ratio, dec!(0.5));
        assert_eq!(a.debt_rate, dec!(0.09));
    }
}
