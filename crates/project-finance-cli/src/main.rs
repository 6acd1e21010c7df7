mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::project::RunArgs;
use commands::scenarios::ScenarioArgs;
use commands::sensitivity::SensitivityArgs;

/// Project finance cashflow, sensitivity and scenario analysis
#[derive(Parser)]
#[command(
    name = "pfm",
    version,
    about = "Project finance cashflow, sensitivity and scenario analysis",
    long_about = "A CLI for project finance modelling with decimal precision. Projects \
                  revenue, operating cost, debt amortization and tax year by year, and \
                  reports NPV, IRR, DSCR, payback and profitability index. Supports \
                  one-way sensitivity sweeps, named scenarios and stress tests."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a YAML or JSON catalogue of parameters, scenarios and stress tests
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the year-by-year cashflow and headline metrics
    Run(RunArgs),
    /// Vary one parameter and re-run for each test value
    Sensitivity(SensitivityArgs),
    /// Run named scenarios against the base assumptions
    Scenarios(ScenarioArgs),
    /// Run named stress tests against the base assumptions
    Stress(ScenarioArgs),
    /// List configured parameters, ranges and scenario names
    Parameters,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = || input::load_config(cli.config.as_deref());
    let result = match cli.command {
        Commands::Version => {
            println!("pfm {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Commands::Run(args) => config().and_then(|c| commands::project::run_project(args, &c)),
        Commands::Sensitivity(args) => {
            config().and_then(|c| commands::sensitivity::run_sensitivity(args, &c))
        }
        Commands::Scenarios(args) => {
            config().and_then(|c| commands::scenarios::run_scenarios(args, &c))
        }
        Commands::Stress(args) => config().and_then(|c| commands::scenarios::run_stress(args, &c)),
        Commands::Parameters => config().and_then(|c| commands::parameters::run_parameters(&c)),
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
