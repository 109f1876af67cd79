//! Retarget type model
//!
//! This crate defines the static type information predicates are checked
//! against:
//! - `DataType`, the static type of every expression node
//! - `StringComparison`, the comparison modes carried by string methods
//! - Type descriptors and the `TypeRegistry` describing record shapes
//! - Implicit conversion rules

pub mod coercion;
pub mod comparison;
pub mod model;
pub mod type_system;

pub use coercion::{CoercionError, CoercionResult, TypeCoercer};
pub use comparison::StringComparison;
pub use model::{MemberInfo, MemberKind, ModelError, ModelResult, TypeDescriptor, TypeRegistry};
pub use type_system::DataType;
