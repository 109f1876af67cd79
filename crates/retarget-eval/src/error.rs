//! Evaluation errors

use retarget_diagnostics::{
    RetargetError, RT0200, RT0201, RT0202, RT0203, RT0204, RT0205, RT0206, RT0207, RT0208,
};
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur during evaluation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// Value of an unexpected runtime type
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Member read or method call on null
    #[error("Null reference in {operation}")]
    NullReference { operation: String },

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Arithmetic overflow
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: String },

    /// No implementation registered for a method
    #[error("Unknown method: {method}")]
    UnknownMethod { method: String },

    /// Record lacks a field
    #[error("Record of type {type_name} has no field '{field}'")]
    MissingField { type_name: String, field: String },

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {pattern}")]
    InvalidRegex { pattern: String },

    /// Wrong number of arguments passed to a method or closure
    #[error("{callee} expects {expected} argument(s), found {found}")]
    ArgumentCount {
        callee: String,
        expected: usize,
        found: usize,
    },

    /// Parameter reference with no value bound
    #[error("Unbound parameter: {name}")]
    UnboundParameter { name: String },
}

impl EvalError {
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn null_reference(operation: impl Into<String>) -> Self {
        Self::NullReference {
            operation: operation.into(),
        }
    }

    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }
}

impl From<EvalError> for RetargetError {
    fn from(err: EvalError) -> Self {
        let code = match &err {
            EvalError::TypeMismatch { .. } => RT0201,
            EvalError::NullReference { .. } => RT0200,
            EvalError::DivisionByZero => RT0202,
            EvalError::UnknownMethod { .. } => RT0203,
            EvalError::MissingField { .. } => RT0204,
            EvalError::InvalidRegex { .. } => RT0205,
            EvalError::ArgumentCount { .. } => RT0206,
            EvalError::Overflow { .. } => RT0207,
            EvalError::UnboundParameter { .. } => RT0208,
        };
        RetargetError::evaluation(code, err.to_string())
    }
}
