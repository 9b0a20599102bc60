//! Error Types for the math tool kit

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MathError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Invalid expression. {0}")]
    InvalidExpression(String),

    #[error("Cannot divide by zero")]
    DivisionByZero,

    #[error("{0}")]
    UnsupportedOperation(String),

    #[error("Missing '{0}' parameter")]
    MissingParameter(String),
}

impl MathError {
    /// Problems with what the user asked for, as opposed to faults in
    /// evaluating it. These are handed back to the model as plain guidance.
    pub const fn is_input_problem(&self) -> bool {
        matches!(self, Self::InvalidExpression(_) | Self::UnsupportedOperation(_))
    }
}
