//! Typed expression trees
//!
//! This crate defines the expression tree a predicate is made of. Trees are
//! plain owned values: a closed set of node kinds, each node carrying its
//! static [`DataType`](retarget_types::DataType).
//!
//! Trees are built through [`TreeBuilder`], which type-checks every node
//! against a [`TypeRegistry`](retarget_types::TypeRegistry), or deserialized
//! from JSON and verified with [`TypeChecker`].

mod builder;
mod check;
mod error;
mod expression;
mod lambda;
mod literal;
pub mod methods;
mod operator;
pub mod serialize;
mod typing;

pub use builder::TreeBuilder;
pub use check::TypeChecker;
pub use error::{TypeError, TypeErrorKind, TypeResult};
pub use expression::*;
pub use lambda::{Lambda, Predicate};
pub use literal::Literal;
pub use methods::{MethodKind, MethodRef};
pub use operator::{BinaryOp, UnaryOp};
pub use typing::TypeRules;

/// Type alias for boxed expressions
pub type BoxExpr = Box<Expression>;
