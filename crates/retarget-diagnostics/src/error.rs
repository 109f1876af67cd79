//! Retarget error types

use crate::{ErrorCode, NodePath};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An error diagnostic with tree location and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Location of the offending node
    pub path: Option<NodePath>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            help: None,
        }
    }

    /// Set the node path
    pub fn with_path(mut self, path: NodePath) -> Self {
        self.path = Some(path);
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {} - {}", self.code, self.message)?;
        if let Some(path) = &self.path {
            write!(f, " at {}", path)?;
        }
        Ok(())
    }
}

/// Umbrella error for the workspace
///
/// Each crate reports failures through its own error enum; all of them
/// convert into this type so callers of the facade crate deal with one
/// error carrying a stable [`ErrorCode`].
#[derive(Debug, Clone, Error)]
pub enum RetargetError {
    /// Tree construction or type checking error
    #[error("{code}: {message}")]
    Tree {
        code: ErrorCode,
        message: String,
        path: Option<NodePath>,
        context: Option<String>,
    },

    /// Conversion error
    #[error("{code}: {message}")]
    Conversion {
        code: ErrorCode,
        message: String,
        path: Option<NodePath>,
        context: Option<String>,
    },

    /// Evaluation error
    #[error("{code}: {message}")]
    Evaluation {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Model error
    #[error("{code}: {message}")]
    Model {
        code: ErrorCode,
        message: String,
        type_name: Option<String>,
    },

    /// System error
    #[error("{code}: {message}")]
    System { code: ErrorCode, message: String },

    /// Multiple errors collected
    #[error("Multiple errors: {}", .0.len())]
    Multiple(Vec<RetargetError>),
}

impl RetargetError {
    /// Create a tree error
    pub fn tree(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Tree {
            code,
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Create a conversion error
    pub fn conversion(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Conversion {
            code,
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Create an evaluation error
    pub fn evaluation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Evaluation {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Create a model error
    pub fn model(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Model {
            code,
            message: message.into(),
            type_name: None,
        }
    }

    /// Create a system error
    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Tree { code, .. } => *code,
            Self::Conversion { code, .. } => *code,
            Self::Evaluation { code, .. } => *code,
            Self::Model { code, .. } => *code,
            Self::System { code, .. } => *code,
            Self::Multiple(errors) => errors.first().map(|e| e.code()).unwrap_or(ErrorCode::new(0)),
        }
    }

    /// Get the node path if available
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            Self::Tree { path, .. } => path.as_ref(),
            Self::Conversion { path, .. } => path.as_ref(),
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Tree { code, message, path, context }
            | Self::Conversion { code, message, path, context } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(path) = path {
                    diag = diag.with_path(path.clone());
                }
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                } else if let Some(help) = code.info().help {
                    diag = diag.with_help(help);
                }
                diag
            }
            Self::Evaluation { code, message, context } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                }
                diag
            }
            Self::Model { code, message, type_name } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(name) = type_name {
                    diag = diag.with_help(format!("while resolving type {}", name));
                }
                diag
            }
            Self::System { code, message } => Diagnostic::error(*code, message.clone()),
            Self::Multiple(errors) => {
                if let Some(first) = errors.first() {
                    first.to_diagnostic()
                } else {
                    Diagnostic::error(ErrorCode::new(0), "Unknown error")
                }
            }
        }
    }
}

/// Builder for creating errors with fluent API
pub struct ErrorBuilder {
    code: ErrorCode,
    message: String,
    path: Option<NodePath>,
    context: Option<String>,
}

impl ErrorBuilder {
    /// Create a new error builder
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Set the node path
    pub fn at(mut self, path: NodePath) -> Self {
        self.path = Some(path);
        self
    }

    /// Add context information
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Build a tree error
    pub fn tree(self) -> RetargetError {
        RetargetError::Tree {
            code: self.code,
            message: self.message,
            path: self.path,
            context: self.context,
        }
    }

    /// Build a conversion error
    pub fn conversion(self) -> RetargetError {
        RetargetError::Conversion {
            code: self.code,
            message: self.message,
            path: self.path,
            context: self.context,
        }
    }

    /// Build an evaluation error
    pub fn evaluation(self) -> RetargetError {
        RetargetError::Evaluation {
            code: self.code,
            message: self.message,
            context: self.context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PathSegment, RT0100, RT0102};

    #[test]
    fn test_error_builder() {
        let path = NodePath::root().child(PathSegment::Body).child(PathSegment::Left);
        let err = ErrorBuilder::new(RT0100, "Member 'Value' of Model has no counterpart on Data")
            .at(path.clone())
            .conversion();

        assert!(matches!(err, RetargetError::Conversion { .. }));
        assert_eq!(err.code(), RT0100);
        assert_eq!(err.path(), Some(&path));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(RT0102, "Expected a single-parameter lambda")
            .with_path(NodePath::root().child(PathSegment::Body));

        assert_eq!(
            diag.to_string(),
            "error: RT0102 - Expected a single-parameter lambda at body"
        );
    }

    #[test]
    fn test_to_diagnostic_uses_code_help() {
        let err = RetargetError::conversion(RT0100, "unmapped");
        let diag = err.to_diagnostic();
        assert_eq!(diag.help.as_deref(), RT0100.info().help);
    }

    #[test]
    fn test_multiple_reports_first_code() {
        let err = RetargetError::Multiple(vec![
            RetargetError::conversion(RT0102, "first"),
            RetargetError::conversion(RT0100, "second"),
        ]);
        assert_eq!(err.code(), RT0102);
        assert_eq!(err.to_string(), "Multiple errors: 2");
    }
}
