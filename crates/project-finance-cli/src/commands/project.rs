use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use project_finance_core::engine::{
    assess_benchmarks, run_with_config, BenchmarkAssessment, CashflowSummary, YearRecord,
};
use project_finance_core::{with_metadata, ConfigStore};

use super::AssumptionArgs;

/// Arguments for a single cashflow projection
#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub assumptions: AssumptionArgs,

    /// Leave the year-by-year schedule out of the output
    #[arg(long)]
    pub summary_only: bool,
}

#[derive(Serialize)]
struct RunReport<'a> {
    #[serde(flatten)]
    summary: &'a CashflowSummary,
    benchmarks: BenchmarkAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    years: Option<&'a [YearRecord]>,
}

pub fn run_project(args: RunArgs, config: &ConfigStore) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let set = args.assumptions.resolve(config)?;
    let cashflow = run_with_config(&set, config)?;

    let benchmarks = assess_benchmarks(cashflow.summary(), &config.benchmarks);
    if !benchmarks.all_passed {
        tracing::info!(
            failed = benchmarks.checks.iter().filter(|c| !c.passed).count(),
            "benchmark checks failed"
        );
    }

    let report = RunReport {
        summary: cashflow.summary(),
        benchmarks,
        years: (!args.summary_only).then_some(cashflow.years()),
    };
    let output = with_metadata(
        "Project Cashflow Model",
        cashflow.assumptions(),
        cashflow.warnings().to_vec(),
        start.elapsed().as_micros() as u64,
        report,
    );
    Ok(serde_json::to_value(output)?)
}
