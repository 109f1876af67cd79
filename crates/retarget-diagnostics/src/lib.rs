//! Retarget diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the
//! workspace: error codes, node paths locating a failure inside an
//! expression tree, and diagnostic reporting.

mod error;
mod error_code;
mod path;

pub use error::*;
pub use error_code::*;
pub use path::*;

/// Result type for retarget operations
pub type Result<T> = std::result::Result<T, RetargetError>;
