//! Literal values carried by constant nodes

use retarget_types::{DataType, StringComparison};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    /// Null literal
    Null,
    /// Boolean literal
    Boolean(bool),
    /// 32-bit signed integer
    Integer(i32),
    /// 64-bit signed integer
    Long(i64),
    /// Arbitrary precision decimal
    Decimal(Decimal),
    /// String literal
    String(String),
    /// String comparison mode
    Comparison(StringComparison),
}

impl Literal {
    /// Static type of this literal
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Null => DataType::Any,
            Self::Boolean(_) => DataType::Boolean,
            Self::Integer(_) => DataType::Integer,
            Self::Long(_) => DataType::Long,
            Self::Decimal(_) => DataType::Decimal,
            Self::String(_) => DataType::String,
            Self::Comparison(_) => DataType::StringComparison,
        }
    }

    /// Check if this is the null literal
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Long(l) => write!(f, "{}L", l),
            Self::Decimal(d) => write!(f, "{}m", d),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Comparison(mode) => write!(f, "{}", mode),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<Decimal> for Literal {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<StringComparison> for Literal {
    fn from(value: StringComparison) -> Self {
        Self::Comparison(value)
    }
}
