//! Error types for sqlweave

use thiserror::Error;

/// Result type alias for statement assembly
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised while assembling a statement.
///
/// Every error aborts construction; no partially built statement is ever
/// returned.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Missing or invalid required input (table, recursion name, union target, ...)
    #[error("Config error: {0}")]
    Config(String),

    /// Operand shape does not fit the operator
    #[error("Invalid operand for {operator}: {message}")]
    InvalidOperand { operator: String, message: String },

    /// Operator token outside the supported vocabulary
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Malformed JSON statement description
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid operand error for a specific operator
    pub fn invalid_operand(operator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOperand {
            operator: operator.into(),
            message: message.into(),
        }
    }

    /// Create an unknown operator error
    pub fn unknown_operator(token: impl Into<String>) -> Self {
        Self::UnknownOperator(token.into())
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is an invalid operand error
    pub fn is_invalid_operand(&self) -> bool {
        matches!(self, Self::InvalidOperand { .. })
    }

    /// Check if this is an unknown operator error
    pub fn is_unknown_operator(&self) -> bool {
        matches!(self, Self::UnknownOperator(_))
    }
}
