pub mod parameters;
pub mod project;
pub mod scenarios;
pub mod sensitivity;

use clap::Args;
use rust_decimal::Decimal;

use project_finance_core::{AssumptionSet, ConfigStore};

use crate::input;

/// Where the base assumptions come from, shared by every analysis command.
#[derive(Args)]
pub struct AssumptionArgs {
    /// Path to JSON file with the assumption set (stdin is read when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Override a single assumption, e.g. --set discount_rate=0.12 (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE", allow_hyphen_values = true)]
    pub overrides: Vec<String>,
}

impl AssumptionArgs {
    pub fn resolve(&self, config: &ConfigStore) -> Result<AssumptionSet, Box<dyn std::error::Error>> {
        let mut set = input::load_assumptions(self.input.as_deref(), config)?;
        for raw in &self.overrides {
            let (name, value) = parse_override(raw)?;
            let parameter = config.lookup_parameter(name)?;
            set = set.with_value(parameter, value)?;
        }
        Ok(set)
    }
}

fn parse_override(raw: &str) -> Result<(&str, Decimal), Box<dyn std::error::Error>> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Override must be NAME=VALUE, got '{}'", raw))?;
    let value: Decimal = value
        .trim()
        .parse()
        .map_err(|e| format!("Invalid value in '{}': {}", raw, e))?;
    Ok((name.trim(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("discount_rate=0.12").unwrap(),
            ("discount_rate", dec!(0.12))
        );
        assert_eq!(
            parse_override(" revenue_growth = -0.05 ").unwrap(),
            ("revenue_growth", dec!(-0.05))
        );
        assert!(parse_override("discount_rate").is_err());
        assert!(parse_override("discount_rate=abc").is_err());
    }
}
