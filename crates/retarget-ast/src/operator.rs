//! Operators of binary and unary nodes

use serde::{Deserialize, Serialize};

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Logical and (short-circuit)
    And,
    /// Logical or (short-circuit)
    Or,

    /// Equality
    Equal,
    /// Inequality
    NotEqual,
    /// Less than
    Less,
    /// Less than or equal
    LessOrEqual,
    /// Greater than
    Greater,
    /// Greater than or equal
    GreaterOrEqual,

    /// Addition, or concatenation of strings
    Add,
    /// Subtraction
    Subtract,
    /// Multiplication
    Multiply,
    /// Division
    Divide,
    /// Remainder
    Modulo,

    /// Left operand unless it is null, else right operand
    Coalesce,
}

impl BinaryOp {
    /// Check if this is an equality operator
    pub const fn is_equality(&self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }

    /// Check if this is a comparison operator
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::Less
                | Self::LessOrEqual
                | Self::Greater
                | Self::GreaterOrEqual
        )
    }

    /// Check if this is a logical operator
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Check if this is an arithmetic operator
    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Modulo
        )
    }

    /// Get the operator symbol
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Coalesce => "??",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Logical not
    Not,
    /// Arithmetic negation
    Negate,
    /// Null test
    IsNull,
    /// Non-null test
    IsNotNull,
}

impl UnaryOp {
    /// Get the operator symbol
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Negate => "-",
            Self::IsNull => "is null",
            Self::IsNotNull => "is not null",
        }
    }

    /// Check if the operator is written after its operand
    pub const fn is_postfix(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(BinaryOp::Equal.is_comparison());
        assert!(BinaryOp::Equal.is_equality());
        assert!(!BinaryOp::Less.is_equality());
        assert!(BinaryOp::And.is_logical());
        assert!(BinaryOp::Modulo.is_arithmetic());
        assert!(!BinaryOp::Coalesce.is_arithmetic());
    }

    #[test]
    fn test_symbols() {
        assert_eq!(BinaryOp::Equal.symbol(), "==");
        assert_eq!(UnaryOp::Not.symbol(), "!");
        assert!(UnaryOp::IsNull.is_postfix());
    }
}
