pub mod config;
pub mod engine;
pub mod error;
pub mod time_value;
pub mod types;

pub use config::ConfigStore;
pub use engine::{
    assess_benchmarks, run, scenarios, sensitivity, stress_tests, AssumptionSet, ProjectCashflow,
    ScenarioResult, SensitivityResult, YearRecord,
};
pub use error::ProjectFinanceError;
pub use types::*;

/// Standard result type for all project-finance operations
pub type ProjectFinanceResult<T> = Result<T, ProjectFinanceError>;
