//! Type errors raised while building or checking a tree

use retarget_diagnostics::{
    ErrorCode, NodePath, PathSegment, RetargetError, RT0001, RT0002, RT0003, RT0004, RT0005, RT0006,
    RT0007, RT0008, RT0009, RT0010,
};
use thiserror::Error;

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeErrorKind {
    /// Member not declared on the type
    #[error("Type {type_name} has no member '{member}'")]
    UnknownMember { type_name: String, member: String },

    /// Member access on a value that is not a record
    #[error("Cannot access member '{member}' on non-record type {found}")]
    NotARecord { member: String, found: String },

    /// Record type not registered
    #[error("Unknown type: {name}")]
    UnknownType { name: String },

    /// A node's recorded type differs from the type its children imply
    #[error("Type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: String,
        found: String,
    },

    /// Operand types not accepted by an operator
    #[error("Operator {operator} cannot be applied to {operands}")]
    InvalidOperand { operator: String, operands: String },

    /// Wrong number of arguments in a call
    #[error("{method} expects {expected} argument(s), found {found}")]
    ArgumentCount {
        method: String,
        expected: usize,
        found: usize,
    },

    /// Argument not assignable to the parameter type
    #[error("Argument {index} of {method}: expected {expected}, found {found}")]
    ArgumentType {
        method: String,
        index: usize,
        expected: String,
        found: String,
    },

    /// Receiver missing, unexpected, or of the wrong type
    #[error("Invalid receiver for {method}: {message}")]
    InvalidReceiver { method: String, message: String },

    /// Parameter reference not bound by an enclosing lambda
    #[error("Unbound parameter: {name}")]
    UnboundParameter { name: String },

    /// Parameter reference typed differently from its binding
    #[error("Parameter '{name}' is declared as {declared} but referenced as {referenced}")]
    ParameterTypeMismatch {
        name: String,
        declared: String,
        referenced: String,
    },

    /// Lambda shape not accepted
    #[error("Invalid lambda: {message}")]
    InvalidLambda { message: String },

    /// Predicate body is not boolean
    #[error("Predicate body must be Boolean, found {found}")]
    NotBoolean { found: String },
}

impl TypeErrorKind {
    /// Error code for this kind
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownMember { .. } | Self::NotARecord { .. } => RT0001,
            Self::TypeMismatch { .. } | Self::ParameterTypeMismatch { .. } => RT0002,
            Self::InvalidOperand { .. } => RT0003,
            Self::ArgumentCount { .. } => RT0004,
            Self::ArgumentType { .. } => RT0005,
            Self::UnboundParameter { .. } => RT0006,
            Self::InvalidLambda { .. } => RT0007,
            Self::NotBoolean { .. } => RT0008,
            Self::UnknownType { .. } => RT0009,
            Self::InvalidReceiver { .. } => RT0010,
        }
    }
}

/// A type error and where in the tree it occurred
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}{}", location_suffix(.path))]
pub struct TypeError {
    /// What went wrong
    pub kind: TypeErrorKind,
    /// Path of the offending node; root for errors raised by the builder
    pub path: NodePath,
}

/// Type checking result
pub type TypeResult<T> = Result<T, TypeError>;

impl TypeError {
    /// Create an error located at the root
    pub fn new(kind: TypeErrorKind) -> Self {
        Self {
            kind,
            path: NodePath::root(),
        }
    }

    /// Relocate the error below `prefix`
    pub fn within(mut self, prefix: &NodePath) -> Self {
        let mut path = prefix.clone();
        for segment in self.path.segments() {
            path.push(*segment);
        }
        self.path = path;
        self
    }

    /// Relocate the error below a single segment
    pub fn under(self, segment: PathSegment) -> Self {
        self.within(&NodePath::root().child(segment))
    }

    /// Error code
    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }
}

impl From<TypeErrorKind> for TypeError {
    fn from(kind: TypeErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<TypeError> for RetargetError {
    fn from(err: TypeError) -> Self {
        RetargetError::Tree {
            code: err.code(),
            message: err.kind.to_string(),
            path: Some(err.path),
            context: None,
        }
    }
}

fn location_suffix(path: &NodePath) -> String {
    if path.is_root() {
        String::new()
    } else {
        format!(" at {}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_path() {
        let err = TypeError::new(TypeErrorKind::UnboundParameter { name: "x".into() });
        assert_eq!(err.to_string(), "Unbound parameter: x");
    }

    #[test]
    fn test_relocation() {
        let err = TypeError::new(TypeErrorKind::UnknownType { name: "Foo".into() })
            .under(PathSegment::Left)
            .under(PathSegment::Body);
        assert_eq!(err.to_string(), "Unknown type: Foo at body.left");
        assert_eq!(err.code(), RT0009);
    }

    #[test]
    fn test_into_retarget_error() {
        let err: RetargetError = TypeError::new(TypeErrorKind::NotBoolean {
            found: "String".into(),
        })
        .into();
        assert_eq!(err.code(), RT0008);
    }
}
