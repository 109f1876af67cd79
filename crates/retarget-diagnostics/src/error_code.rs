//! Retarget error codes following a structured numbering system
//!
//! Error code ranges:
//! - RT0001-RT0099: Tree errors (construction, type checking)
//! - RT0100-RT0199: Conversion errors (member correspondence, malformed input)
//! - RT0200-RT0299: Evaluation errors (runtime)
//! - RT0300-RT0399: Model errors (type registry)
//! - RT0400-RT0499: System errors (serialization, internal)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a tree error (0001-0099)
    pub const fn is_tree_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a conversion error (0100-0199)
    pub const fn is_conversion_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is an evaluation error (0200-0299)
    pub const fn is_evaluation_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a model error (0300-0399)
    pub const fn is_model_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Check if this is a system error (0400-0499)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RT{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Tree errors (0001-0099)
    map.insert(1, ErrorInfo::new("Unknown member"));
    map.insert(2, ErrorInfo::new("Type mismatch"));
    map.insert(3, ErrorInfo::new("Invalid operand"));
    map.insert(4, ErrorInfo::new("Invalid argument count"));
    map.insert(5, ErrorInfo::new("Invalid argument type"));
    map.insert(6, ErrorInfo::new("Unbound parameter")
        .with_help("Every parameter reference must be bound by an enclosing lambda"));
    map.insert(7, ErrorInfo::new("Invalid lambda"));
    map.insert(8, ErrorInfo::new("Predicate body is not boolean"));
    map.insert(9, ErrorInfo::new("Unknown type"));
    map.insert(10, ErrorInfo::new("Invalid instance receiver"));

    // Conversion errors (0100-0199)
    map.insert(100, ErrorInfo::new("Unmapped member")
        .with_help("Add the member to the target type or supply an explicit member mapping"));
    map.insert(101, ErrorInfo::new("Incompatible member type")
        .with_help("The corresponding target member must be usable wherever the source member is used"));
    map.insert(102, ErrorInfo::new("Malformed input tree"));
    map.insert(103, ErrorInfo::new("Unknown type"));

    // Evaluation errors (0200-0299)
    map.insert(200, ErrorInfo::new("Evaluation failed"));
    map.insert(201, ErrorInfo::new("Runtime type mismatch"));
    map.insert(202, ErrorInfo::new("Division by zero"));
    map.insert(203, ErrorInfo::new("Unknown method"));
    map.insert(204, ErrorInfo::new("Missing field"));
    map.insert(205, ErrorInfo::new("Invalid regex pattern"));
    map.insert(206, ErrorInfo::new("Invalid argument count"));
    map.insert(207, ErrorInfo::new("Arithmetic overflow"));
    map.insert(208, ErrorInfo::new("Unbound parameter"));

    // Model errors (0300-0399)
    map.insert(300, ErrorInfo::new("Type not found"));
    map.insert(301, ErrorInfo::new("Duplicate type"));
    map.insert(302, ErrorInfo::new("Duplicate member"));
    map.insert(303, ErrorInfo::new("Invalid member type"));

    // System errors (0400-0499)
    map.insert(400, ErrorInfo::new("Internal error"));
    map.insert(401, ErrorInfo::new("I/O error"));
    map.insert(406, ErrorInfo::new("Invalid format"));

    map
});

// Tree errors
pub const RT0001: ErrorCode = ErrorCode::new(1);
pub const RT0002: ErrorCode = ErrorCode::new(2);
pub const RT0003: ErrorCode = ErrorCode::new(3);
pub const RT0004: ErrorCode = ErrorCode::new(4);
pub const RT0005: ErrorCode = ErrorCode::new(5);
pub const RT0006: ErrorCode = ErrorCode::new(6);
pub const RT0007: ErrorCode = ErrorCode::new(7);
pub const RT0008: ErrorCode = ErrorCode::new(8);
pub const RT0009: ErrorCode = ErrorCode::new(9);
pub const RT0010: ErrorCode = ErrorCode::new(10);

// Conversion errors
pub const RT0100: ErrorCode = ErrorCode::new(100);
pub const RT0101: ErrorCode = ErrorCode::new(101);
pub const RT0102: ErrorCode = ErrorCode::new(102);
pub const RT0103: ErrorCode = ErrorCode::new(103);

// Evaluation errors
pub const RT0200: ErrorCode = ErrorCode::new(200);
pub const RT0201: ErrorCode = ErrorCode::new(201);
pub const RT0202: ErrorCode = ErrorCode::new(202);
pub const RT0203: ErrorCode = ErrorCode::new(203);
pub const RT0204: ErrorCode = ErrorCode::new(204);
pub const RT0205: ErrorCode = ErrorCode::new(205);
pub const RT0206: ErrorCode = ErrorCode::new(206);
pub const RT0207: ErrorCode = ErrorCode::new(207);
pub const RT0208: ErrorCode = ErrorCode::new(208);

// Model errors
pub const RT0300: ErrorCode = ErrorCode::new(300);
pub const RT0301: ErrorCode = ErrorCode::new(301);
pub const RT0302: ErrorCode = ErrorCode::new(302);
pub const RT0303: ErrorCode = ErrorCode::new(303);

// System errors
pub const RT0400: ErrorCode = ErrorCode::new(400);
pub const RT0401: ErrorCode = ErrorCode::new(401);
pub const RT0406: ErrorCode = ErrorCode::new(406);
