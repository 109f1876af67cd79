//! Predicate conversion between structurally similar types
//!
//! This crate provides:
//! - [`ExpressionConverter`], which rewrites a predicate over a source type
//!   into an equivalent predicate over a target type
//! - member correspondence strategies ([`ByName`], [`ExplicitMapping`])
//! - a concurrent cache of resolved member maps

pub mod cache;
pub mod converter;
pub mod correspondence;
pub mod error;

pub use cache::{MemberMap, MemberMapCache};
pub use converter::ExpressionConverter;
pub use correspondence::{ByName, ExplicitMapping, MemberCorrespondence};
pub use error::{ConvertError, ConvertResult};
