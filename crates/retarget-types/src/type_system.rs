//! Static types of expression nodes
//!
//! Every node of an expression tree carries a `DataType`. Record types are
//! referenced by name and resolved through a [`TypeRegistry`](crate::TypeRegistry).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The static type of an expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of")]
pub enum DataType {
    // === Special Types ===
    /// The Any type - supertype of all types, also the type of `null`
    Any,

    // === Primitive Types ===
    /// Boolean type
    Boolean,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// Arbitrary precision decimal
    Decimal,
    /// Unicode string
    String,
    /// String comparison mode (ordinal, culture, ignore case)
    StringComparison,

    // === Structured Types ===
    /// Record type, resolved by name through a type registry
    Named(String),
    /// Ordered collection
    List(Box<DataType>),
    /// Function (lambda) type
    Function {
        parameters: Vec<DataType>,
        result: Box<DataType>,
    },
}

impl DataType {
    // === Constructors ===

    /// Create a named record type
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Create a list type
    pub fn list(element_type: DataType) -> Self {
        Self::List(Box::new(element_type))
    }

    /// Create a function type
    pub fn function(parameters: Vec<DataType>, result: DataType) -> Self {
        Self::Function {
            parameters,
            result: Box::new(result),
        }
    }

    /// Create the type of a predicate over `input`
    pub fn predicate(input: DataType) -> Self {
        Self::function(vec![input], DataType::Boolean)
    }

    // === Type Properties ===

    /// Check if this is the Any type
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Check if this is the Boolean type
    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean)
    }

    /// Check if this is a primitive type
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Boolean
                | Self::Integer
                | Self::Long
                | Self::Decimal
                | Self::String
                | Self::StringComparison
        )
    }

    /// Check if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::Decimal)
    }

    /// Check if this type is ordered (supports `<`, `<=`, `>`, `>=`)
    pub fn is_ordered(&self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::Decimal | Self::String)
    }

    /// Check if values of this type may be null
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            Self::Any | Self::String | Self::Named(_) | Self::List(_)
        )
    }

    /// Get the record type name for Named types
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Get the element type for List types
    pub fn element_type(&self) -> Option<&DataType> {
        match self {
            Self::List(elem) => Some(elem),
            _ => None,
        }
    }

    /// Get the result type for Function types
    pub fn result_type(&self) -> Option<&DataType> {
        match self {
            Self::Function { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Get the parameter types for Function types
    pub fn parameter_types(&self) -> Option<&[DataType]> {
        match self {
            Self::Function { parameters, .. } => Some(parameters),
            _ => None,
        }
    }

    /// Get the simple name of this type
    pub fn name(&self) -> &str {
        match self {
            Self::Any => "Any",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Long => "Long",
            Self::Decimal => "Decimal",
            Self::String => "String",
            Self::StringComparison => "StringComparison",
            Self::Named(name) => name,
            Self::List(_) => "List",
            Self::Function { .. } => "Func",
        }
    }

    /// Check whether `name` appears anywhere in this type
    pub fn mentions(&self, name: &str) -> bool {
        match self {
            Self::Named(n) => n == name,
            Self::List(elem) => elem.mentions(name),
            Self::Function { parameters, result } => {
                parameters.iter().any(|p| p.mentions(name)) || result.mentions(name)
            }
            _ => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(elem) => write!(f, "List<{}>", elem),
            Self::Function { parameters, result } => {
                write!(f, "Func<")?;
                for param in parameters {
                    write!(f, "{}, ", param)?;
                }
                write!(f, "{}>", result)
            }
            other => write!(f, "{}", other.name()),
        }
    }
}

impl From<&str> for DataType {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DataType::String.to_string(), "String");
        assert_eq!(DataType::named("Model").to_string(), "Model");
        assert_eq!(DataType::list(DataType::Integer).to_string(), "List<Integer>");
        assert_eq!(
            DataType::predicate(DataType::named("Data")).to_string(),
            "Func<Data, Boolean>"
        );
    }

    #[test]
    fn test_properties() {
        assert!(DataType::Long.is_numeric());
        assert!(DataType::String.is_ordered());
        assert!(!DataType::Boolean.is_ordered());
        assert!(DataType::named("Model").is_nullable());
        assert_eq!(DataType::named("Model").type_name(), Some("Model"));
        assert_eq!(
            DataType::predicate(DataType::Any).result_type(),
            Some(&DataType::Boolean)
        );
    }

    #[test]
    fn test_mentions() {
        let ty = DataType::list(DataType::named("Address"));
        assert!(ty.mentions("Address"));
        assert!(!ty.mentions("Model"));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&DataType::list(DataType::String)).unwrap();
        assert_eq!(json, r#"{"kind":"List","of":{"kind":"String"}}"#);
        let back: DataType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DataType::list(DataType::String));
    }
}
