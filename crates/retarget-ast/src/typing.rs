//! Typing rules shared by the builder, the checker and tree rewriters
//!
//! Each rule takes the static types of a node's children and returns the
//! node's static type, or the reason the combination is ill-typed.

use crate::{BinaryOp, MethodRef, UnaryOp, TypeErrorKind};
use retarget_types::{DataType, MemberInfo, TypeCoercer, TypeRegistry};

/// Typing rules over a type registry
#[derive(Debug, Clone, Copy)]
pub struct TypeRules<'r> {
    registry: &'r TypeRegistry,
    coercer: TypeCoercer,
}

impl<'r> TypeRules<'r> {
    /// Create rules resolving record types through `registry`
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            coercer: TypeCoercer::new(),
        }
    }

    /// The registry record types are resolved through
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// The member `member` of a value typed `target`
    pub fn member(&self, target: &DataType, member: &str) -> Result<MemberInfo, TypeErrorKind> {
        let type_name = target.type_name().ok_or_else(|| TypeErrorKind::NotARecord {
            member: member.to_string(),
            found: target.to_string(),
        })?;
        let descriptor = self
            .registry
            .get(type_name)
            .ok_or_else(|| TypeErrorKind::UnknownType {
                name: type_name.to_string(),
            })?;
        descriptor
            .member(member)
            .cloned()
            .ok_or_else(|| TypeErrorKind::UnknownMember {
                type_name: type_name.to_string(),
                member: member.to_string(),
            })
    }

    /// Result type of a binary operation
    pub fn binary(&self, op: BinaryOp, left: &DataType, right: &DataType) -> Result<DataType, TypeErrorKind> {
        let invalid = || TypeErrorKind::InvalidOperand {
            operator: op.symbol().to_string(),
            operands: format!("{} and {}", left, right),
        };

        match op {
            BinaryOp::And | BinaryOp::Or => {
                if self.coercer.can_implicitly_convert(left, &DataType::Boolean)
                    && self.coercer.can_implicitly_convert(right, &DataType::Boolean)
                {
                    Ok(DataType::Boolean)
                } else {
                    Err(invalid())
                }
            }
            BinaryOp::Equal | BinaryOp::NotEqual => {
                if self.coercer.can_compare_equal(left, right) {
                    Ok(DataType::Boolean)
                } else {
                    Err(invalid())
                }
            }
            BinaryOp::Less | BinaryOp::LessOrEqual | BinaryOp::Greater | BinaryOp::GreaterOrEqual => {
                if self.coercer.can_compare_order(left, right) {
                    Ok(DataType::Boolean)
                } else {
                    Err(invalid())
                }
            }
            BinaryOp::Add => {
                let common = self.coercer.common_type(left, right).map_err(|_| invalid())?;
                if common.is_numeric() || matches!(common, DataType::String) {
                    Ok(common)
                } else {
                    Err(invalid())
                }
            }
            BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => {
                let common = self.coercer.common_type(left, right).map_err(|_| invalid())?;
                if common.is_numeric() {
                    Ok(common)
                } else {
                    Err(invalid())
                }
            }
            BinaryOp::Coalesce => {
                if !left.is_nullable() {
                    return Err(invalid());
                }
                self.coercer.common_type(left, right).map_err(|_| invalid())
            }
        }
    }

    /// Result type of a unary operation
    pub fn unary(&self, op: UnaryOp, operand: &DataType) -> Result<DataType, TypeErrorKind> {
        match op {
            UnaryOp::Not if self.coercer.can_implicitly_convert(operand, &DataType::Boolean) => {
                Ok(DataType::Boolean)
            }
            UnaryOp::Negate if operand.is_numeric() => Ok(operand.clone()),
            UnaryOp::IsNull | UnaryOp::IsNotNull if operand.is_nullable() => Ok(DataType::Boolean),
            _ => Err(TypeErrorKind::InvalidOperand {
                operator: op.symbol().to_string(),
                operands: operand.to_string(),
            }),
        }
    }

    /// Result type of a conditional
    pub fn conditional(
        &self,
        test: &DataType,
        if_true: &DataType,
        if_false: &DataType,
    ) -> Result<DataType, TypeErrorKind> {
        if !self.coercer.can_implicitly_convert(test, &DataType::Boolean) {
            return Err(TypeErrorKind::TypeMismatch {
                context: "conditional test".to_string(),
                expected: DataType::Boolean.to_string(),
                found: test.to_string(),
            });
        }
        self.coercer
            .common_type(if_true, if_false)
            .map_err(|_| TypeErrorKind::TypeMismatch {
                context: "conditional branches".to_string(),
                expected: if_true.to_string(),
                found: if_false.to_string(),
            })
    }

    /// Result type of a call, checking receiver and arguments
    pub fn call(
        &self,
        method: &MethodRef,
        instance: Option<&DataType>,
        arguments: &[DataType],
    ) -> Result<DataType, TypeErrorKind> {
        match (method.receiver(), instance) {
            (None, None) => {}
            (Some(receiver), Some(actual)) => {
                if !self.coercer.can_implicitly_convert(actual, receiver) {
                    return Err(TypeErrorKind::InvalidReceiver {
                        method: method.qualified_name(),
                        message: format!("expected {}, found {}", receiver, actual),
                    });
                }
            }
            (None, Some(_)) => {
                return Err(TypeErrorKind::InvalidReceiver {
                    method: method.qualified_name(),
                    message: "static method called with a receiver".to_string(),
                });
            }
            (Some(_), None) => {
                return Err(TypeErrorKind::InvalidReceiver {
                    method: method.qualified_name(),
                    message: "instance method called without a receiver".to_string(),
                });
            }
        }

        if arguments.len() != method.arity() {
            return Err(TypeErrorKind::ArgumentCount {
                method: method.qualified_name(),
                expected: method.arity(),
                found: arguments.len(),
            });
        }

        for (index, (actual, expected)) in arguments.iter().zip(method.parameters.iter()).enumerate() {
            if !self.coercer.can_implicitly_convert(actual, expected) {
                return Err(TypeErrorKind::ArgumentType {
                    method: method.qualified_name(),
                    index,
                    expected: expected.to_string(),
                    found: actual.to_string(),
                });
            }
        }

        Ok(method.return_type.clone())
    }
}
