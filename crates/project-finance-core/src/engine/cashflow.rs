use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ConfigStore;
use crate::engine::assumptions::AssumptionSet;
use crate::time_value::{self, IrrStatus};
use crate::types::{Money, Multiple, Rate};
use crate::ProjectFinanceResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One operating year of the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: u32,
    pub revenue: Money,
    pub operating_cost: Money,
    pub ebitda: Money,
    pub depreciation: Money,
    pub ebit: Money,
    pub interest_expense: Money,
    /// EBIT less interest, before loss relief
    pub pre_tax_income: Money,
    /// Carried-forward losses applied this year
    pub loss_relief_used: Money,
    pub taxable_income: Money,
    /// Closing carried-forward loss balance
    pub loss_carryforward: Money,
    pub tax_payable: Money,
    pub net_income: Money,
    pub debt_balance_start: Money,
    pub principal_repayment: Money,
    pub debt_balance_end: Money,
    pub debt_service: Money,
    /// Cash flow available for debt service (EBITDA less tax)
    pub cfads: Money,
    /// Cash flow to equity after debt service
    pub net_cashflow: Money,
    /// None when there is no debt service to cover
    pub dscr: Option<Multiple>,
    /// Running total of discounted equity cash flow, year-0 outlay included
    pub cumulative_discounted_cashflow: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashflowSummary {
    /// Equity NPV at the discount rate, net of the year-0 equity outlay
    pub npv: Money,
    /// Equity IRR; None when no root was found
    pub irr: Option<Rate>,
    pub irr_status: IrrStatus,
    pub min_dscr: Option<Multiple>,
    pub avg_dscr: Option<Multiple>,
    /// First year the cumulative discounted equity cash flow is non-negative
    pub payback_period: Option<u32>,
    pub profitability_index: Option<Multiple>,
    /// Unlevered NPV of CFADS against the full investment
    pub project_npv: Money,
    pub project_irr: Option<Rate>,
    pub equity_investment: Money,
    pub debt_amount: Money,
    pub total_principal_repaid: Money,
    pub total_interest: Money,
    pub total_tax: Money,
}

/// Full result of a single engine run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCashflow {
    assumptions: AssumptionSet,
    years: Vec<YearRecord>,
    summary: CashflowSummary,
    warnings: Vec<String>,
}

impl ProjectCashflow {
    pub fn assumptions(&self) -> &AssumptionSet {
        &self.assumptions
    }

    /// Year records in chronological order, one per project year.
    pub fn years(&self) -> &[YearRecord] {
        &self.years
    }

    pub fn summary(&self) -> &CashflowSummary {
        &self.summary
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Equity cash flow stream with the outlay at t = 0.
    pub fn equity_cashflows(&self) -> Vec<Money> {
        std::iter::once(-self.summary.equity_investment)
            .chain(self.years.iter().map(|y| y.net_cashflow))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Evaluate one assumption set against the built-in catalogue.
pub fn run(assumptions: &AssumptionSet) -> ProjectFinanceResult<ProjectCashflow> {
    run_with_config(assumptions, ConfigStore::builtin())
}

/// Evaluate one assumption set.
///
/// Projects revenue, cost, depreciation, equal-principal debt service and
/// tax with loss carryforward year by year, then derives equity NPV, IRR,
/// DSCR statistics, discounted payback and profitability index. Validation
/// failures abort before any calculation; an IRR with no root only degrades
/// the `irr` field.
pub fn run_with_config(
    assumptions: &AssumptionSet,
    config: &ConfigStore,
) -> ProjectFinanceResult<ProjectCashflow> {
    assumptions.validate(config)?;

    let a = assumptions;
    let periods = a.project_period;
    let mut warnings: Vec<String> = Vec::new();

    let equity_investment = a.equity_investment();
    let debt_amount = a.debt_amount();

    // Equal principal instalments; the last year repays whatever remains so
    // the schedule closes exactly at zero.
    let scheduled_principal = debt_amount / Decimal::from(periods);

    let depreciation_years = a.effective_depreciation_period();
    let annual_depreciation = a.total_investment / Decimal::from(depreciation_years);

    let discount_factors = time_value::discount_factors(a.discount_rate, periods as usize)?;

    let growth = Decimal::ONE + a.revenue_growth;
    let escalation = Decimal::ONE + a.opex_inflation;

    let mut revenue = a.initial_revenue(config);
    let mut cost_index = Decimal::ONE;
    let mut balance = debt_amount;
    let mut carryforward = Decimal::ZERO;
    let mut cumulative = -equity_investment;
    let mut years: Vec<YearRecord> = Vec::with_capacity(periods as usize);

    for year in 1..=periods {
        if year > 1 {
            revenue *= growth;
            cost_index *= escalation;
        }

        let operating_cost = revenue * a.op_cost_ratio * cost_index;
        let ebitda = revenue - operating_cost;

        let depreciation = if year <= depreciation_years {
            annual_depreciation
        } else {
            Decimal::ZERO
        };
        let ebit = ebitda - depreciation;

        // Debt schedule
        let opening = balance;
        let principal = if year == periods {
            opening
        } else {
            scheduled_principal.min(opening)
        };
        let interest_expense = opening * a.debt_rate;
        balance = opening - principal;
        let debt_service = principal + interest_expense;

        // Tax with loss carryforward
        let pre_tax_income = ebit - interest_expense;
        let (loss_relief_used, taxable_income) = if pre_tax_income < Decimal::ZERO {
            carryforward += -pre_tax_income;
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            let used = carryforward.min(pre_tax_income);
            carryforward -= used;
            (used, pre_tax_income - used)
        };
        let tax_payable = taxable_income * a.tax_rate;

        let net_income = ebit - interest_expense - tax_payable;
        let cfads = ebitda - tax_payable;
        let dscr = if debt_service.is_zero() {
            None
        } else {
            Some(cfads / debt_service)
        };

        let net_cashflow = cfads - debt_service;
        cumulative += net_cashflow * discount_factors[year as usize];

        years.push(YearRecord {
            year,
            revenue,
            operating_cost,
            ebitda,
            depreciation,
            ebit,
            interest_expense,
            pre_tax_income,
            loss_relief_used,
            taxable_income,
            loss_carryforward: carryforward,
            tax_payable,
            net_income,
            debt_balance_start: opening,
            principal_repayment: principal,
            debt_balance_end: balance,
            debt_service,
            cfads,
            net_cashflow,
            dscr,
            cumulative_discounted_cashflow: cumulative,
        });
    }

    let negative_ebitda_years = years.iter().filter(|y| y.ebitda < Decimal::ZERO).count();
    if negative_ebitda_years > 0 {
        warnings.push(format!(
            "EBITDA is negative in {negative_ebitda_years} of {periods} years"
        ));
    }

    let summary = summarise(a, config, &years, equity_investment, debt_amount, &mut warnings)?;

    debug!(
        project_period = periods,
        npv = %summary.npv,
        irr = ?summary.irr,
        min_dscr = ?summary.min_dscr,
        "project cashflow computed"
    );

    Ok(ProjectCashflow {
        assumptions: assumptions.clone(),
        years,
        summary,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn summarise(
    a: &AssumptionSet,
    config: &ConfigStore,
    years: &[YearRecord],
    equity_investment: Money,
    debt_amount: Money,
    warnings: &mut Vec<String>,
) -> ProjectFinanceResult<CashflowSummary> {
    let net_cashflows: Vec<Money> = years.iter().map(|y| y.net_cashflow).collect();
    let equity_cfs: Vec<Money> = std::iter::once(-equity_investment)
        .chain(net_cashflows.iter().copied())
        .collect();

    let npv = time_value::npv(a.discount_rate, &equity_cfs)?;

    let irr = time_value::solve_irr(&equity_cfs, &config.engine.irr);
    if irr.rate.is_none() {
        warn!(status = ?irr.status, iterations = irr.iterations, "equity IRR has no solution");
        warnings.push(format!(
            "Equity IRR undefined ({}) within [{}, {}]",
            describe_irr_status(irr.status),
            config.engine.irr.lower_bound,
            config.engine.irr.upper_bound
        ));
    }

    let project_cfs: Vec<Money> = std::iter::once(-a.total_investment)
        .chain(years.iter().map(|y| y.cfads))
        .collect();
    let project_npv = time_value::npv(a.discount_rate, &project_cfs)?;
    let project_irr = time_value::solve_irr(&project_cfs, &config.engine.irr);
    if project_irr.rate.is_none() {
        warnings.push(format!(
            "Project IRR undefined ({})",
            describe_irr_status(project_irr.status)
        ));
    }

    let dscr_values: Vec<Multiple> = years.iter().filter_map(|y| y.dscr).collect();
    let min_dscr = dscr_values.iter().copied().min();
    let avg_dscr = if dscr_values.is_empty() {
        None
    } else {
        let sum: Decimal = dscr_values.iter().sum();
        Some(sum / Decimal::from(dscr_values.len() as u64))
    };

    let payback_period = years
        .iter()
        .find(|y| y.cumulative_discounted_cashflow >= Decimal::ZERO)
        .map(|y| y.year);

    let profitability_index = if equity_investment.is_zero() {
        None
    } else {
        let pv_inflows = time_value::present_value(a.discount_rate, &net_cashflows)?;
        Some(pv_inflows / equity_investment)
    };

    Ok(CashflowSummary {
        npv,
        irr: irr.rate,
        irr_status: irr.status,
        min_dscr,
        avg_dscr,
        payback_period,
        profitability_index,
        project_npv,
        project_irr: project_irr.rate,
        equity_investment,
        debt_amount,
        total_principal_repaid: years.iter().map(|y| y.principal_repayment).sum(),
        total_interest: years.iter().map(|y| y.interest_expense).sum(),
        total_tax: years.iter().map(|y| y.tax_payable).sum(),
    })
}

fn describe_irr_status(status: IrrStatus) -> &'static str {
    match status {
        IrrStatus::Converged => "converged",
        IrrStatus::NoSignChange => "no sign change in the search bracket",
        IrrStatus::IterationLimit => "iteration budget exhausted",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
