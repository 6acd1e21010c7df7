use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::parameters::Parameter;

/// How an offset moves a base parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Offset {
    /// Added to the base value (percentage points for rates)
    Add(Decimal),
    /// Base value is multiplied by this factor (1.10 = +10%)
    Multiply(Decimal),
}

impl Offset {
    pub fn apply(&self, base: Decimal) -> Decimal {
        match self {
            Offset::Add(delta) => base + delta,
            Offset::Multiply(factor) => base * factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterOffset {
    pub parameter: Parameter,
    pub offset: Offset,
}

/// A named set of offsets against the base assumptions. Scenarios and stress
/// tests share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetBundle {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub offsets: Vec<ParameterOffset>,
}

impl OffsetBundle {
    pub fn is_identity(&self) -> bool {
        self.offsets.iter().all(|o| match o.offset {
            Offset::Add(d) => d.is_zero(),
            Offset::Multiply(f) => f == Decimal::ONE,
        })
    }
}

fn bundle(name: &str, description: &str, offsets: &[(Parameter, Offset)]) -> OffsetBundle {
    OffsetBundle {
        name: name.to_string(),
        description: description.to_string(),
        offsets: offsets
            .iter()
            .map(|(parameter, offset)| ParameterOffset {
                parameter: *parameter,
                offset: *offset,
            })
            .collect(),
    }
}

pub fn builtin_scenarios() -> Vec<OffsetBundle> {
    vec![
        bundle("Base Case", "Assumptions as entered", &[]),
        bundle(
            "Downside",
            "10% capex overrun, 15% lower revenue, 5% higher opex, +1pp debt rate, -2pp growth",
            &[
                (Parameter::TotalInvestment, Offset::Multiply(dec!(1.10))),
                (Parameter::RevenueFactor, Offset::Multiply(dec!(0.85))),
                (Parameter::OpCostRatio, Offset::Multiply(dec!(1.05))),
                (Parameter::DebtRate, Offset::Add(dec!(0.01))),
                (Parameter::RevenueGrowth, Offset::Add(dec!(-0.02))),
            ],
        ),
        bundle(
            "Upside",
            "5% capex saving, 10% higher revenue, 5% lower opex, -0.5pp debt rate",
            &[
                (Parameter::TotalInvestment, Offset::Multiply(dec!(0.95))),
                (Parameter::RevenueFactor, Offset::Multiply(dec!(1.10))),
                (Parameter::OpCostRatio, Offset::Multiply(dec!(0.95))),
                (Parameter::DebtRate, Offset::Add(dec!(-0.005))),
            ],
        ),
    ]
}

pub fn builtin_stress_tests() -> Vec<OffsetBundle> {
    vec![
        bundle(
            "Revenue Shock -30%",
            "Initial revenue 30% below plan",
            &[(Parameter::RevenueFactor, Offset::Multiply(dec!(0.70)))],
        ),
        bundle(
            "Revenue Shock -20%",
            "Initial revenue 20% below plan",
            &[(Parameter::RevenueFactor, Offset::Multiply(dec!(0.80)))],
        ),
        bundle(
            "Opex Shock +30%",
            "Operating cost ratio 30% above plan",
            &[(Parameter::OpCostRatio, Offset::Multiply(dec!(1.30)))],
        ),
        bundle(
            "High Interest Rate Shock",
            "Debt rate +2pp",
            &[(Parameter::DebtRate, Offset::Add(dec!(0.02)))],
        ),
        bundle(
            "Low Interest Rate",
            "Debt rate -2pp",
            &[(Parameter::DebtRate, Offset::Add(dec!(-0.02)))],
        ),
        bundle(
            "Combined Stress",
            "Revenue -20%, opex +20%, debt rate +2pp",
            &[
                (Parameter::RevenueFactor, Offset::Multiply(dec!(0.80))),
                (Parameter::OpCostRatio, Offset::Multiply(dec!(1.20))),
                (Parameter::DebtRate, Offset::Add(dec!(0.02))),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_apply() {
        assert_eq!(Offset::Add(dec!(0.01)).apply(dec!(0.09)), dec!(0.10));
        assert_eq!(Offset::Multiply(dec!(1.10)).apply(dec!(100)), dec!(110));
    }

    #[test]
    fn test_base_case_is_identity() {
        let scenarios = builtin_scenarios();
        assert_eq!(scenarios[0].name, "Base Case");
        assert!(scenarios[0].is_identity());
        assert!(!scenarios[1].is_identity());
    }

    #[test]
    fn test_offset_serde_shape() {
        let json = serde_json::to_value(ParameterOffset {
            parameter: Parameter::DebtRate,
            offset: Offset::Add(dec!(0.02)),
        })
        .unwrap();
        assert_eq!(json["parameter"], "debt_rate");
        assert_eq!(json["offset"]["add"], "0.02");
    }
}
