use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every scalar assumption the engine accepts, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    TotalInvestment,
    EquityRatio,
    DebtRate,
    DiscountRate,
    RevenueGrowth,
    OpCostRatio,
    ProjectPeriod,
    TaxRate,
    RevenueFactor,
    OpexInflation,
}

impl Parameter {
    pub const ALL: [Parameter; 10] = [
        Parameter::TotalInvestment,
        Parameter::EquityRatio,
        Parameter::DebtRate,
        Parameter::DiscountRate,
        Parameter::RevenueGrowth,
        Parameter::OpCostRatio,
        Parameter::ProjectPeriod,
        Parameter::TaxRate,
        Parameter::RevenueFactor,
        Parameter::OpexInflation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::TotalInvestment => "total_investment",
            Parameter::EquityRatio => "equity_ratio",
            Parameter::DebtRate => "debt_rate",
            Parameter::DiscountRate => "discount_rate",
            Parameter::RevenueGrowth => "revenue_growth",
            Parameter::OpCostRatio => "op_cost_ratio",
            Parameter::ProjectPeriod => "project_period",
            Parameter::TaxRate => "tax_rate",
            Parameter::RevenueFactor => "revenue_factor",
            Parameter::OpexInflation => "opex_inflation",
        }
    }

    /// Look a parameter up by its snake_case name. Matching is case-insensitive
    /// and accepts `-` in place of `_`.
    pub fn from_name(name: &str) -> Option<Parameter> {
        let normalised = name.trim().to_ascii_lowercase().replace('-', "_");
        Parameter::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == normalised)
    }

    /// Parameters that only accept whole numbers.
    pub fn is_integral(&self) -> bool {
        matches!(self, Parameter::ProjectPeriod)
    }

    /// Bounds every value of this parameter must respect whatever range a
    /// catalogue configures. `None` leaves that side open.
    pub fn structural_bounds(&self) -> (Option<Decimal>, Option<Decimal>) {
        match self {
            Parameter::EquityRatio | Parameter::OpCostRatio | Parameter::TaxRate => {
                (Some(Decimal::ZERO), Some(Decimal::ONE))
            }
            Parameter::TotalInvestment
            | Parameter::DebtRate
            | Parameter::DiscountRate
            | Parameter::RevenueFactor => (Some(Decimal::ZERO), None),
            Parameter::RevenueGrowth | Parameter::OpexInflation => (Some(dec!(-1)), None),
            Parameter::ProjectPeriod => (Some(Decimal::ONE), None),
        }
    }

    pub fn admits(&self, value: Decimal) -> bool {
        let (lower, upper) = self.structural_bounds();
        lower.map_or(true, |lo| value >= lo) && upper.map_or(true, |hi| value <= hi)
    }

    /// Description of the structural bounds, e.g. `[0, 1]` or `>= 0`.
    pub fn structural_domain(&self) -> String {
        match self.structural_bounds() {
            (Some(lo), Some(hi)) => format!("[{lo}, {hi}]"),
            (Some(lo), None) => format!(">= {lo}"),
            (None, Some(hi)) => format!("<= {hi}"),
            (None, None) => "any value".to_string(),
        }
    }

    pub fn names() -> Vec<String> {
        Parameter::ALL.iter().map(|p| p.as_str().to_string()).collect()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Currency,
    Fraction,
    Years,
    Multiplier,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::Currency => "currency",
            Unit::Fraction => "fraction",
            Unit::Years => "years",
            Unit::Multiplier => "multiplier",
        };
        f.write_str(s)
    }
}

/// Valid domain, default and presentation hints for one parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub parameter: Parameter,
    pub label: String,
    pub unit: Unit,
    pub min: Decimal,
    pub max: Decimal,
    pub default: Decimal,
    /// Input granularity hint for callers building sliders or sweeps
    pub step: Decimal,
}

impl ParameterSpec {
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: Decimal) -> Decimal {
        let clamped = value.max(self.min).min(self.max);
        if self.parameter.is_integral() {
            clamped.round().max(self.min.ceil()).min(self.max.floor())
        } else {
            clamped
        }
    }

    /// Human-readable description of the valid domain, e.g. `[0, 1] fraction`.
    pub fn domain(&self) -> String {
        format!("[{}, {}] {}", self.min, self.max, self.unit)
    }
}

fn spec(
    parameter: Parameter,
    label: &str,
    unit: Unit,
    min: Decimal,
    max: Decimal,
    default: Decimal,
    step: Decimal,
) -> ParameterSpec {
    ParameterSpec {
        parameter,
        label: label.to_string(),
        unit,
        min,
        max,
        default,
        step,
    }
}

/// Built-in parameter catalogue.
pub fn builtin_parameters() -> Vec<ParameterSpec> {
    vec![
        spec(
            Parameter::TotalInvestment,
            "Total Investment",
            Unit::Currency,
            dec!(1_000_000),
            dec!(100_000_000_000),
            dec!(5_000_000_000),
            dec!(100_000_000),
        ),
        spec(
            Parameter::EquityRatio,
            "Equity Ratio",
            Unit::Fraction,
            dec!(0),
            dec!(1),
            dec!(0.30),
            dec!(0.01),
        ),
        spec(
            Parameter::DebtRate,
            "Debt Interest Rate",
            Unit::Fraction,
            dec!(0),
            dec!(0.30),
            dec!(0.09),
            dec!(0.005),
        ),
        spec(
            Parameter::DiscountRate,
            "Discount Rate (WACC)",
            Unit::Fraction,
            dec!(0),
            dec!(0.30),
            dec!(0.15),
            dec!(0.005),
        ),
        spec(
            Parameter::RevenueGrowth,
            "Revenue Growth Rate",
            Unit::Fraction,
            dec!(-0.20),
            dec!(0.20),
            dec!(0.03),
            dec!(0.005),
        ),
        spec(
            Parameter::OpCostRatio,
            "Operating Cost Ratio",
            Unit::Fraction,
            dec!(0),
            dec!(1),
            dec!(0.35),
            dec!(0.01),
        ),
        spec(
            Parameter::ProjectPeriod,
            "Project Period",
            Unit::Years,
            dec!(1),
            dec!(40),
            dec!(25),
            dec!(1),
        ),
        spec(
            Parameter::TaxRate,
            "Corporate Tax Rate",
            Unit::Fraction,
            dec!(0),
            dec!(1),
            dec!(0.20),
            dec!(0.01),
        ),
        spec(
            Parameter::RevenueFactor,
            "Revenue Adjustment Factor",
            Unit::Multiplier,
            dec!(0.10),
            dec!(3),
            dec!(1),
            dec!(0.05),
        ),
        spec(
            Parameter::OpexInflation,
            "Operating Cost Inflation",
            Unit::Fraction,
            dec!(-0.10),
            dec!(0.20),
            dec!(0),
            dec!(0.005),
        ),
    ]
}
