use proptest::prelude::{prop_assert, prop_assert_eq, prop_assume, proptest};
use project_finance_core::config::Parameter;
use project_finance_core::engine::{self, AssumptionSet};
use rust_decimal::Decimal;

fn bp(value: i64) -> Decimal {
    Decimal::new(value, 4)
}

#[allow(clippy::too_many_arguments)]
fn assumptions(
    investment_m: u64,
    equity_bp: i64,
    debt_rate_bp: i64,
    discount_bp: i64,
    growth_bp: i64,
    op_cost_bp: i64,
    period: u32,
    tax_bp: i64,
) -> AssumptionSet {
    AssumptionSet {
        total_investment: Decimal::from(investment_m) * Decimal::from(1_000_000u64),
        equity_ratio: bp(equity_bp),
        debt_rate: bp(debt_rate_bp),
        discount_rate: bp(discount_bp),
        revenue_growth: bp(growth_bp),
        op_cost_ratio: bp(op_cost_bp),
        project_period: period,
        tax_rate: bp(tax_bp),
        ..AssumptionSet::default()
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(32))]

    #[test]
    fn prop_schedule_amortizes_debt_to_zero(
        investment_m in 1u64..100_000,
        equity_bp in 1i64..=10_000,
        debt_rate_bp in 0i64..=3_000,
        discount_bp in 0i64..=3_000,
        growth_bp in -2_000i64..=2_000,
        op_cost_bp in 0i64..=10_000,
        period in 1u32..=40,
        tax_bp in 0i64..=10_000,
    ) {
        let input = assumptions(
            investment_m, equity_bp, debt_rate_bp, discount_bp, growth_bp, op_cost_bp, period, tax_bp,
        );
        let result = engine::run(&input).unwrap();
        let years = result.years();

        prop_assert_eq!(years.len(), period as usize);
        for pair in years.windows(2) {
            prop_assert!(pair[1].debt_balance_end <= pair[0].debt_balance_end);
        }
        prop_assert_eq!(years[years.len() - 1].debt_balance_end, Decimal::ZERO);

        let repaid: Decimal = years.iter().map(|y| y.principal_repayment).sum();
        prop_assert_eq!(repaid, input.debt_amount());

        for y in years {
            prop_assert_eq!(y.dscr.is_none(), y.debt_service.is_zero());
        }
    }

    #[test]
    fn prop_npv_decreases_with_discount_rate(
        investment_m in 1u64..100_000,
        equity_bp in 1_000i64..=10_000,
        discount_bp in 0i64..=2_900,
        step_bp in 1i64..=100,
        op_cost_bp in 0i64..=3_000,
        period in 1u32..=40,
    ) {
        let low = assumptions(investment_m, equity_bp, 500, discount_bp, 0, op_cost_bp, period, 2_000);
        let high = AssumptionSet {
            discount_rate: bp(discount_bp + step_bp),
            ..low.clone()
        };
        let low_run = engine::run(&low).unwrap();
        prop_assume!(low_run.years().iter().all(|y| y.net_cashflow > Decimal::ZERO));

        let high_run = engine::run(&high).unwrap();
        prop_assert!(high_run.summary().npv < low_run.summary().npv);
    }

    #[test]
    fn prop_all_equity_has_no_coverage_ratio(
        investment_m in 1u64..100_000,
        growth_bp in -2_000i64..=2_000,
        op_cost_bp in 0i64..=10_000,
        period in 1u32..=40,
    ) {
        let input = assumptions(investment_m, 10_000, 900, 1_500, growth_bp, op_cost_bp, period, 2_000);
        let result = engine::run(&input).unwrap();
        prop_assert!(result.years().iter().all(|y| y.dscr.is_none()));
        prop_assert_eq!(result.summary().min_dscr, None);
        prop_assert_eq!(result.summary().avg_dscr, None);
    }

    #[test]
    fn prop_runs_are_repeatable_and_match_single_point_sweeps(
        investment_m in 1u64..100_000,
        equity_bp in 1i64..=10_000,
        discount_bp in 0i64..=3_000,
        growth_bp in -2_000i64..=2_000,
        period in 1u32..=40,
    ) {
        let input = assumptions(investment_m, equity_bp, 900, discount_bp, growth_bp, 3_500, period, 2_000);
        let first = engine::run(&input).unwrap();
        let second = engine::run(&input).unwrap();
        prop_assert_eq!(&first, &second);

        let sweep = engine::sensitivity(
            &input,
            "discount_rate",
            &[input.get(Parameter::DiscountRate)],
        )
        .unwrap();
        prop_assert_eq!(&sweep.result.points[0].summary, first.summary());
    }
}
