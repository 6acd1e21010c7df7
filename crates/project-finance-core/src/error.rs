use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectFinanceError {
    #[error("Invalid assumption: {field} = {value} — {reason} (valid domain: {domain})")]
    InvalidAssumption {
        field: String,
        value: Decimal,
        reason: String,
        domain: String,
    },

    #[error("Unknown parameter '{name}' (known parameters: {})", .known.join(", "))]
    UnknownParameter { name: String, known: Vec<String> },

    #[error("Unknown scenario '{name}' (configured scenarios: {})", .known.join(", "))]
    UnknownScenario { name: String, known: Vec<String> },

    #[error("Numeric non-convergence: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    NumericNonConvergence {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ProjectFinanceError {
    /// Name of the field or parameter the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ProjectFinanceError::InvalidAssumption { field, .. } => Some(field),
            ProjectFinanceError::UnknownParameter { name, .. }
            | ProjectFinanceError::UnknownScenario { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ProjectFinanceError {
    fn from(e: serde_json::Error) -> Self {
        ProjectFinanceError::Serialization(e.to_string())
    }
}
