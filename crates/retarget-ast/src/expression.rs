//! Expression tree nodes
//!
//! The set of node kinds is closed: every consumer of a tree matches on
//! [`Expression`] exhaustively, so adding a node kind is a compile error
//! everywhere it has to be handled.

use crate::{BinaryOp, BoxExpr, Lambda, Literal, MethodRef, UnaryOp};
use retarget_types::DataType;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// All expression kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum Expression {
    /// Reference to a lambda parameter
    Parameter(ParameterExpr),
    /// Member read (expr.member)
    Member(MemberExpr),
    /// Literal value
    Constant(ConstantExpr),
    /// Binary operation
    Binary(BinaryExpr),
    /// Unary operation
    Unary(UnaryExpr),
    /// Conditional (test ? a : b)
    Conditional(ConditionalExpr),
    /// Method invocation
    Call(CallExpr),
    /// Nested lambda, e.g. the predicate argument of `Any`
    Lambda(Lambda),
}

/// Reference to a lambda parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterExpr {
    /// Parameter name
    pub name: String,
    /// Static type
    pub data_type: DataType,
}

impl ParameterExpr {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Member read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberExpr {
    /// Expression the member is read from
    pub target: BoxExpr,
    /// Member name
    pub member: String,
    /// Record type declaring the member
    pub declaring_type: String,
    /// Static type of the member
    pub data_type: DataType,
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantExpr {
    /// The value
    pub value: Literal,
    /// Static type, normally the literal's own type
    pub data_type: DataType,
}

/// Binary operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: BoxExpr,
    pub right: BoxExpr,
    /// Result type
    pub data_type: DataType,
}

/// Unary operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: BoxExpr,
    /// Result type
    pub data_type: DataType,
}

/// Conditional expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalExpr {
    pub test: BoxExpr,
    pub if_true: BoxExpr,
    pub if_false: BoxExpr,
    /// Result type
    pub data_type: DataType,
}

/// Method invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallExpr {
    /// Method identity
    pub method: MethodRef,
    /// Receiver, present exactly for instance methods
    pub instance: Option<BoxExpr>,
    /// Arguments in declaration order
    pub arguments: Vec<Expression>,
}

impl Expression {
    /// Static type of this expression
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Parameter(p) => p.data_type.clone(),
            Self::Member(m) => m.data_type.clone(),
            Self::Constant(c) => c.data_type.clone(),
            Self::Binary(b) => b.data_type.clone(),
            Self::Unary(u) => u.data_type.clone(),
            Self::Conditional(c) => c.data_type.clone(),
            Self::Call(c) => c.method.return_type.clone(),
            Self::Lambda(l) => l.data_type(),
        }
    }

    /// Node kind name
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Parameter(_) => "Parameter",
            Self::Member(_) => "Member",
            Self::Constant(_) => "Constant",
            Self::Binary(_) => "Binary",
            Self::Unary(_) => "Unary",
            Self::Conditional(_) => "Conditional",
            Self::Call(_) => "Call",
            Self::Lambda(_) => "Lambda",
        }
    }

    /// Direct children, left to right
    pub fn children(&self) -> SmallVec<[&Expression; 4]> {
        let mut children = SmallVec::new();
        match self {
            Self::Parameter(_) | Self::Constant(_) => {}
            Self::Member(m) => children.push(m.target.as_ref()),
            Self::Binary(b) => {
                children.push(b.left.as_ref());
                children.push(b.right.as_ref());
            }
            Self::Unary(u) => children.push(u.operand.as_ref()),
            Self::Conditional(c) => {
                children.push(c.test.as_ref());
                children.push(c.if_true.as_ref());
                children.push(c.if_false.as_ref());
            }
            Self::Call(c) => {
                if let Some(instance) = &c.instance {
                    children.push(instance.as_ref());
                }
                children.extend(c.arguments.iter());
            }
            Self::Lambda(l) => children.push(l.body.as_ref()),
        }
        children
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Check whether a free reference to parameter `name` occurs in this subtree
    pub fn references_parameter(&self, name: &str) -> bool {
        match self {
            Self::Parameter(p) => p.name == name,
            Self::Lambda(l) if l.binds(name) => false,
            other => other.children().iter().any(|c| c.references_parameter(name)),
        }
    }

    /// Check if this is a constant
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// Try to get as a member access
    pub fn as_member(&self) -> Option<&MemberExpr> {
        match self {
            Self::Member(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get as a method call
    pub fn as_call(&self) -> Option<&CallExpr> {
        match self {
            Self::Call(c) => Some(c),
            _ => None,
        }
    }

    /// Try to get as a binary operation
    pub fn as_binary(&self) -> Option<&BinaryExpr> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter(p) => write!(f, "{}", p.name),
            Self::Member(m) => write!(f, "{}.{}", m.target, m.member),
            Self::Constant(c) => write!(f, "{}", c.value),
            Self::Binary(b) => write!(f, "({} {} {})", b.left, b.op.symbol(), b.right),
            Self::Unary(u) if u.op.is_postfix() => {
                write!(f, "({} {})", u.operand, u.op.symbol())
            }
            Self::Unary(u) => write!(f, "{}{}", u.op.symbol(), u.operand),
            Self::Conditional(c) => {
                write!(f, "({} ? {} : {})", c.test, c.if_true, c.if_false)
            }
            Self::Call(c) => {
                match &c.instance {
                    Some(instance) => write!(f, "{}.{}(", instance, c.method.name)?,
                    None => write!(f, "{}.{}(", c.method.declaring_type, c.method.name)?,
                }
                for (i, arg) in c.arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Self::Lambda(l) => write!(f, "{}", l),
        }
    }
}
