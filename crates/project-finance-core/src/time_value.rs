use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::IrrSearchConfig;
use crate::error::ProjectFinanceError;
use crate::types::{Money, Rate};
use crate::ProjectFinanceResult;

/// Net Present Value of a series of cash flows, the first at t = 0.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> ProjectFinanceResult<Money> {
    let factors = discount_factors(rate, cash_flows.len().saturating_sub(1))?;
    Ok(cash_flows
        .iter()
        .zip(factors.iter())
        .map(|(cf, df)| cf * df)
        .sum())
}

/// Present value of flows received at the end of years 1..=n.
pub fn present_value(rate: Rate, flows_from_year_one: &[Money]) -> ProjectFinanceResult<Money> {
    let factors = discount_factors(rate, flows_from_year_one.len())?;
    Ok(flows_from_year_one
        .iter()
        .zip(factors.iter().skip(1))
        .map(|(cf, df)| cf * df)
        .sum())
}

/// Discount factors 1/(1+r)^t for t = 0..=periods.
pub fn discount_factors(rate: Rate, periods: usize) -> ProjectFinanceResult<Vec<Decimal>> {
    if rate <= dec!(-1) {
        return Err(ProjectFinanceError::InvalidAssumption {
            field: "rate".into(),
            value: rate,
            reason: "Discount rate must be greater than -100%".into(),
            domain: "> -1".into(),
        });
    }

    let one_plus_r = Decimal::ONE + rate;
    let mut factors = Vec::with_capacity(periods + 1);
    let mut df = Decimal::ONE;
    factors.push(df);
    for t in 1..=periods {
        df = df
            .checked_div(one_plus_r)
            .ok_or_else(|| ProjectFinanceError::NumericOverflow {
                context: format!("discount factor at period {t}"),
            })?;
        factors.push(df);
    }
    Ok(factors)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrStatus {
    Converged,
    /// NPV has the same sign at both ends of the search bracket
    NoSignChange,
    IterationLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrSolution {
    pub rate: Option<Rate>,
    pub status: IrrStatus,
    pub iterations: u32,
    /// Scaled NPV at the last evaluated rate
    pub last_delta: Decimal,
}

/// A value with the same sign as NPV(rate) that cannot overflow for any rate
/// above -100%.
///
/// For rate >= 0 this is NPV itself, evaluated by Horner's rule in the
/// discount factor v = 1/(1+r) <= 1. For negative rates NPV is multiplied
/// through by (1+r)^n, so every power in the sum is of a number below one.
fn sign_preserving_npv(rate: Rate, cash_flows: &[Money]) -> Decimal {
    let growth = Decimal::ONE + rate;
    if growth >= Decimal::ONE {
        let v = Decimal::ONE / growth;
        cash_flows
            .iter()
            .rev()
            .fold(Decimal::ZERO, |acc, cf| acc * v + cf)
    } else {
        cash_flows
            .iter()
            .fold(Decimal::ZERO, |acc, cf| acc * growth + cf)
    }
}

/// Solve for IRR by bisection inside the configured bracket.
///
/// Never fails: an unbracketed root or an exhausted iteration budget is
/// reported through [`IrrStatus`] with `rate: None`.
pub fn solve_irr(cash_flows: &[Money], search: &IrrSearchConfig) -> IrrSolution {
    let unsolved = |status, iterations, last_delta| IrrSolution {
        rate: None,
        status,
        iterations,
        last_delta,
    };

    if cash_flows.len() < 2 {
        return unsolved(IrrStatus::NoSignChange, 0, Decimal::ZERO);
    }

    let mut lo = search.lower_bound;
    let mut hi = search.upper_bound;
    let mut f_lo = sign_preserving_npv(lo, cash_flows);
    let f_hi = sign_preserving_npv(hi, cash_flows);

    if f_lo.is_zero() {
        return IrrSolution {
            rate: Some(lo),
            status: IrrStatus::Converged,
            iterations: 0,
            last_delta: f_lo,
        };
    }
    if f_hi.is_zero() {
        return IrrSolution {
            rate: Some(hi),
            status: IrrStatus::Converged,
            iterations: 0,
            last_delta: f_hi,
        };
    }
    if f_lo.is_sign_negative() == f_hi.is_sign_negative() {
        return unsolved(IrrStatus::NoSignChange, 0, f_lo);
    }

    let mut f_mid = f_lo;
    for i in 1..=search.max_iterations {
        let mid = (lo + hi) / dec!(2);
        f_mid = sign_preserving_npv(mid, cash_flows);

        if f_mid.is_zero() || (hi - lo) / dec!(2) < search.tolerance {
            return IrrSolution {
                rate: Some(mid.round_dp(12)),
                status: IrrStatus::Converged,
                iterations: i,
                last_delta: f_mid,
            };
        }

        if f_mid.is_sign_negative() == f_lo.is_sign_negative() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    unsolved(IrrStatus::IterationLimit, search.max_iterations, f_mid)
}

/// Internal Rate of Return, failing with `NumericNonConvergence` when the
/// bisection cannot produce a root.
pub fn irr(cash_flows: &[Money], search: &IrrSearchConfig) -> ProjectFinanceResult<Rate> {
    let solution = solve_irr(cash_flows, search);
    solution
        .rate
        .ok_or_else(|| ProjectFinanceError::NumericNonConvergence {
            function: "IRR".into(),
            iterations: solution.iterations,
            last_delta: solution.last_delta,
        })
}
