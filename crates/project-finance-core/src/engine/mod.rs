//! Financial engine: the single-run projection and the sweeps built on it.

pub mod assumptions;
pub mod benchmarks;
pub mod cashflow;
pub mod scenario;
pub mod sensitivity;

pub use assumptions::AssumptionSet;
pub use benchmarks::{assess_benchmarks, BenchmarkAssessment, BenchmarkCheck};
pub use cashflow::{run, run_with_config, CashflowSummary, ProjectCashflow, YearRecord};
pub use scenario::{
    scenarios, scenarios_with_config, stress_tests, stress_tests_with_config, ScenarioOutcome,
    ScenarioResult,
};
pub use sensitivity::{
    linspace, sensitivity, sensitivity_with_config, sweep_values, SensitivityPoint,
    SensitivityResult,
};

use crate::ProjectFinanceResult;

/// Evaluate independent runs, returning results in input order. The first
/// error in input order wins.
#[cfg(feature = "parallel")]
pub(crate) fn evaluate_all<T, R, F>(items: &[T], f: F) -> ProjectFinanceResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> ProjectFinanceResult<R> + Sync + Send,
{
    use rayon::prelude::*;

    let results: Vec<ProjectFinanceResult<R>> = items.par_iter().map(f).collect();
    results.into_iter().collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn evaluate_all<T, R, F>(items: &[T], f: F) -> ProjectFinanceResult<Vec<R>>
where
    F: Fn(&T) -> ProjectFinanceResult<R>,
{
    items.iter().map(f).collect()
}
