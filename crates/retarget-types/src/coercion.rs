//! Type compatibility rules
//!
//! This module implements the implicit conversion rules used when checking
//! that a tree is well-typed:
//! - Implicit promotion rules (Integer -> Long -> Decimal)
//! - `Any` as a wildcard in either direction (null literals, generic methods)
//! - List covariance and function type compatibility
//! - Common operand type for binary operators

use crate::DataType;
use thiserror::Error;

/// Coercion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// Cannot convert between types
    #[error("Cannot convert from {from} to {to}")]
    CannotConvert { from: String, to: String },

    /// No common type for two operands
    #[error("No common type for {left} and {right}")]
    NoCommonType { left: String, right: String },
}

/// Type coercion result
pub type CoercionResult<T> = Result<T, CoercionError>;

/// Implicit conversion rules
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCoercer;

impl TypeCoercer {
    /// Create a new type coercer
    pub fn new() -> Self {
        Self
    }

    /// Check if implicit conversion from `from` to `to` is allowed
    ///
    /// The following implicit conversions are allowed:
    /// - Identical types
    /// - Anything to or from `Any`
    /// - Integer -> Long, Integer -> Decimal, Long -> Decimal
    /// - List<A> -> List<B> when A converts to B
    /// - Func<P.., R> -> Func<Q.., S> when each Q converts to P and R converts to S
    pub fn can_implicitly_convert(&self, from: &DataType, to: &DataType) -> bool {
        if from == to {
            return true;
        }

        if from.is_any() || to.is_any() {
            return true;
        }

        match (from, to) {
            (DataType::Integer, DataType::Long) => true,
            (DataType::Integer, DataType::Decimal) => true,
            (DataType::Long, DataType::Decimal) => true,

            (DataType::List(elem_from), DataType::List(elem_to)) => {
                self.can_implicitly_convert(elem_from, elem_to)
            }

            (
                DataType::Function {
                    parameters: params_from,
                    result: result_from,
                },
                DataType::Function {
                    parameters: params_to,
                    result: result_to,
                },
            ) => {
                params_from.len() == params_to.len()
                    && params_to
                        .iter()
                        .zip(params_from.iter())
                        .all(|(to_param, from_param)| {
                            self.can_implicitly_convert(to_param, from_param)
                        })
                    && self.can_implicitly_convert(result_from, result_to)
            }

            _ => false,
        }
    }

    /// Require that `from` implicitly converts to `to`
    pub fn check_assignable(&self, from: &DataType, to: &DataType) -> CoercionResult<()> {
        if self.can_implicitly_convert(from, to) {
            Ok(())
        } else {
            Err(CoercionError::CannotConvert {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    }

    /// Find the type both operands convert to
    ///
    /// `Any` yields the other operand's type so `x == null` keeps the type of `x`.
    pub fn common_type(&self, left: &DataType, right: &DataType) -> CoercionResult<DataType> {
        if left.is_any() {
            return Ok(right.clone());
        }
        if right.is_any() || left == right {
            return Ok(left.clone());
        }
        if self.can_implicitly_convert(left, right) {
            return Ok(right.clone());
        }
        if self.can_implicitly_convert(right, left) {
            return Ok(left.clone());
        }
        Err(CoercionError::NoCommonType {
            left: left.to_string(),
            right: right.to_string(),
        })
    }

    /// Check if two types can be compared for equality
    pub fn can_compare_equal(&self, left: &DataType, right: &DataType) -> bool {
        self.common_type(left, right).is_ok()
    }

    /// Check if two types can be ordered against each other
    pub fn can_compare_order(&self, left: &DataType, right: &DataType) -> bool {
        match self.common_type(left, right) {
            Ok(common) => common.is_ordered() || common.is_any(),
            Err(_) => false,
        }
    }

    /// Check whether a member typed `target` can stand in for one typed `source`
    ///
    /// Record types are accepted here because their members are matched
    /// one level further down; scalars must convert in at least one
    /// direction, and the enclosing node decides whether the usage still
    /// type-checks.
    pub fn can_substitute(&self, source: &DataType, target: &DataType) -> bool {
        match (source, target) {
            (DataType::Named(_), DataType::Named(_)) => true,
            (DataType::List(s), DataType::List(t)) => self.can_substitute(s, t),
            _ => {
                self.can_implicitly_convert(target, source)
                    || self.can_implicitly_convert(source, target)
            }
        }
    }
}
