//! Conversion errors

use retarget_diagnostics::{ErrorBuilder, ErrorCode, NodePath, RetargetError, RT0100, RT0101, RT0102, RT0103};
use thiserror::Error;

/// Errors raised while converting a predicate
///
/// Conversion is all-or-nothing: any of these aborts the whole conversion
/// and no partial tree is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A member read from the source type has no counterpart on the target type
    #[error("Member '{member}' of {source_type} has no counterpart on {target_type} (at {path})")]
    UnmappedMember {
        source_type: String,
        member: String,
        target_type: String,
        path: NodePath,
    },

    /// The corresponding target member cannot stand in for the source member
    #[error(
        "Member '{member}' of {source_type} corresponds to '{target_member}' of {target_type}, \
         which is incompatible: {reason} (at {path})"
    )]
    IncompatibleMemberType {
        source_type: String,
        member: String,
        target_type: String,
        target_member: String,
        reason: String,
        path: NodePath,
    },

    /// The input is not a well-typed single-parameter lambda over the source type
    #[error("Malformed input tree: {reason} (at {path})")]
    MalformedTree { reason: String, path: NodePath },

    /// Source or target type not registered
    #[error("Unknown type: {name}")]
    UnknownType { name: String },
}

/// Conversion result type
pub type ConvertResult<T> = Result<T, ConvertError>;

impl ConvertError {
    pub(crate) fn malformed(reason: impl Into<String>, path: &NodePath) -> Self {
        Self::MalformedTree {
            reason: reason.into(),
            path: path.clone(),
        }
    }

    /// Error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnmappedMember { .. } => RT0100,
            Self::IncompatibleMemberType { .. } => RT0101,
            Self::MalformedTree { .. } => RT0102,
            Self::UnknownType { .. } => RT0103,
        }
    }

    /// Path of the failing node, if the failure is tied to one
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            Self::UnmappedMember { path, .. }
            | Self::IncompatibleMemberType { path, .. }
            | Self::MalformedTree { path, .. } => Some(path),
            Self::UnknownType { .. } => None,
        }
    }
}

impl From<ConvertError> for RetargetError {
    fn from(err: ConvertError) -> Self {
        let builder = ErrorBuilder::new(err.code(), err.to_string());
        let builder = match &err {
            ConvertError::UnmappedMember { target_type, .. } => {
                builder.context(format!("no member mapping found on {}", target_type))
            }
            _ => builder,
        };
        match err.path() {
            Some(path) => builder.at(path.clone()).conversion(),
            None => builder.conversion(),
        }
    }
}
