use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::Benchmarks;
use crate::engine::cashflow::CashflowSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkCheck {
    pub name: String,
    pub observed: Option<Decimal>,
    pub threshold: Decimal,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkAssessment {
    pub checks: Vec<BenchmarkCheck>,
    pub all_passed: bool,
}

/// Compare a run's headline metrics against lender and sponsor thresholds.
///
/// A project without debt service has nothing to cover, so the DSCR checks
/// pass with no observed value. An undefined IRR fails the IRR check.
pub fn assess_benchmarks(summary: &CashflowSummary, benchmarks: &Benchmarks) -> BenchmarkAssessment {
    let dscr_check = |name: &str, threshold: Decimal| BenchmarkCheck {
        name: name.to_string(),
        observed: summary.min_dscr,
        threshold,
        passed: summary.min_dscr.map_or(true, |d| d >= threshold),
    };

    let checks = vec![
        dscr_check("min_dscr", benchmarks.min_dscr),
        dscr_check("target_dscr", benchmarks.target_dscr),
        BenchmarkCheck {
            name: "min_equity_irr".into(),
            observed: summary.irr,
            threshold: benchmarks.min_equity_irr,
            passed: summary.irr.is_some_and(|r| r >= benchmarks.min_equity_irr),
        },
        BenchmarkCheck {
            name: "acceptable_npv".into(),
            observed: Some(summary.npv),
            threshold: benchmarks.acceptable_npv,
            passed: summary.npv >= benchmarks.acceptable_npv,
        },
    ];

    let all_passed = checks.iter().all(|c| c.passed);
    BenchmarkAssessment { checks, all_passed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assumptions::AssumptionSet;
    use crate::engine::cashflow::run;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checks_follow_summary() {
        let result = run(&AssumptionSet::default()).unwrap();
        let summary = result.summary();
        let assessment = assess_benchmarks(summary, &Benchmarks::default());
        assert_eq!(assessment.checks.len(), 4);

        let min = &assessment.checks[0];
        assert_eq!(min.observed, summary.min_dscr);
        assert_eq!(min.passed, summary.min_dscr.unwrap() >= dec!(1.25));

        let npv = &assessment.checks[3];
        assert_eq!(npv.passed, summary.npv >= Decimal::ZERO);
        assert_eq!(
            assessment.all_passed,
            assessment.checks.iter().all(|c| c.passed)
        );
    }

    #[test]
    fn test_no_debt_passes_dscr_checks() {
        let input = AssumptionSet {
            equity_ratio: Decimal::ONE,
            ..AssumptionSet::default()
        };
        let result = run(&input).unwrap();
        let assessment = assess_benchmarks(result.summary(), &Benchmarks::default());
        assert!(assessment.checks[0].passed);
        assert!(assessment.checks[1].passed);
        assert_eq!(assessment.checks[0].observed, None);
    }

    #[test]
    fn test_undefined_irr_fails() {
        let input = AssumptionSet {
            op_cost_ratio: Decimal::ONE,
            ..AssumptionSet::default()
        };
        let result = run(&input).unwrap();
        let assessment = assess_benchmarks(result.summary(), &Benchmarks::default());
        assert!(!assessment.checks[2].passed);
        assert!(!assessment.all_passed);
    }
}
