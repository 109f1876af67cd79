//! Runtime values

use indexmap::IndexMap;
use retarget_ast::{Lambda, Literal};
use retarget_types::StringComparison;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i32),
    /// Long value
    Long(i64),
    /// Decimal value
    Decimal(Decimal),
    /// String value
    String(String),
    /// String comparison mode
    Comparison(StringComparison),
    /// Record value
    Record(Record),
    /// List value
    List(Vec<Value>),
    /// Lambda together with the bindings visible where it was created
    Closure(Box<Closure>),
}

impl Value {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if value is `true`
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Boolean(true))
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Runtime type name, used in error messages
    pub fn type_name(&self) -> &str {
        match self {
            Self::Null => "Null",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Long(_) => "Long",
            Self::Decimal(_) => "Decimal",
            Self::String(_) => "String",
            Self::Comparison(_) => "StringComparison",
            Self::Record(r) => &r.type_name,
            Self::List(_) => "List",
            Self::Closure(_) => "Function",
        }
    }

    /// Shorthand for a string value
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Self::Null,
            Literal::Boolean(b) => Self::Boolean(*b),
            Literal::Integer(i) => Self::Integer(*i),
            Literal::Long(l) => Self::Long(*l),
            Literal::Decimal(d) => Self::Decimal(*d),
            Literal::String(s) => Self::String(s.clone()),
            Literal::Comparison(mode) => Self::Comparison(*mode),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Long(l) => write!(f, "{}L", l),
            Self::Decimal(d) => write!(f, "{}m", d),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Comparison(mode) => write!(f, "{}", mode),
            Self::Record(r) => write!(f, "{}", r),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Self::Closure(c) => write!(f, "{}", c.lambda),
        }
    }
}

/// Record value: a type name and named fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub type_name: String,
    pub fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field assignment
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.type_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, " }}")
    }
}

/// A lambda captured as a value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Closure {
    pub lambda: Lambda,
    /// Bindings captured from the enclosing scope, outermost first
    pub environment: Vec<(String, Value)>,
}
