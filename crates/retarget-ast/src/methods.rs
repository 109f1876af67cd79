//! Method identities and the standard method catalog
//!
//! A `MethodRef` is the full identity of a method: declaring type, name,
//! receiver, parameter types and return type. Two call nodes invoke the same
//! method exactly when their `MethodRef`s are equal; evaluators key their
//! implementations on it.

use retarget_types::DataType;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::fmt;

/// Parameter type list; most methods take at most three arguments
pub type ParameterTypes = SmallVec<[DataType; 3]>;

/// Static or instance method
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    /// Called without a receiver
    Static,
    /// Called on a receiver of the given type
    Instance { receiver: DataType },
}

/// Identity and signature of a method
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    /// Declaring type (e.g. "String", "Enumerable")
    pub declaring_type: String,
    /// Method name
    pub name: String,
    /// Static or instance
    pub kind: MethodKind,
    /// Parameter types, excluding the receiver
    pub parameters: ParameterTypes,
    /// Return type
    pub return_type: DataType,
}

impl MethodRef {
    /// Create a static method
    pub fn new_static(
        declaring_type: impl Into<String>,
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = DataType>,
        return_type: DataType,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            kind: MethodKind::Static,
            parameters: parameters.into_iter().collect(),
            return_type,
        }
    }

    /// Create an instance method
    pub fn new_instance(
        declaring_type: impl Into<String>,
        name: impl Into<String>,
        receiver: DataType,
        parameters: impl IntoIterator<Item = DataType>,
        return_type: DataType,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            kind: MethodKind::Instance { receiver },
            parameters: parameters.into_iter().collect(),
            return_type,
        }
    }

    /// Check if this is a static method
    pub fn is_static(&self) -> bool {
        matches!(self.kind, MethodKind::Static)
    }

    /// Receiver type of an instance method
    pub fn receiver(&self) -> Option<&DataType> {
        match &self.kind {
            MethodKind::Static => None,
            MethodKind::Instance { receiver } => Some(receiver),
        }
    }

    /// Number of arguments, excluding the receiver
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Qualified name (e.g. "String.Equals")
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.declaring_type, self.name)
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static() {
            write!(f, "static ")?;
        }
        write!(f, "{}.{}(", self.declaring_type, self.name)?;
        let mut first = true;
        if let Some(receiver) = self.receiver() {
            write!(f, "this {}", receiver)?;
            first = false;
        }
        for param in &self.parameters {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
            first = false;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

// === Standard catalog ===

/// `static String.Equals(String, String) -> Boolean`
pub fn string_equals() -> MethodRef {
    MethodRef::new_static(
        "String",
        "Equals",
        [DataType::String, DataType::String],
        DataType::Boolean,
    )
}

/// `static String.Equals(String, String, StringComparison) -> Boolean`
pub fn string_equals_with_comparison() -> MethodRef {
    MethodRef::new_static(
        "String",
        "Equals",
        [DataType::String, DataType::String, DataType::StringComparison],
        DataType::Boolean,
    )
}

/// `String.Equals(this String, String) -> Boolean`
pub fn string_equals_instance() -> MethodRef {
    MethodRef::new_instance(
        "String",
        "Equals",
        DataType::String,
        [DataType::String],
        DataType::Boolean,
    )
}

/// `String.Equals(this String, String, StringComparison) -> Boolean`
pub fn string_equals_instance_with_comparison() -> MethodRef {
    MethodRef::new_instance(
        "String",
        "Equals",
        DataType::String,
        [DataType::String, DataType::StringComparison],
        DataType::Boolean,
    )
}

/// `static String.Compare(String, String, StringComparison) -> Integer`
pub fn string_compare() -> MethodRef {
    MethodRef::new_static(
        "String",
        "Compare",
        [DataType::String, DataType::String, DataType::StringComparison],
        DataType::Integer,
    )
}

/// `String.StartsWith(this String, String) -> Boolean`
pub fn starts_with() -> MethodRef {
    string_predicate("StartsWith")
}

/// `String.EndsWith(this String, String) -> Boolean`
pub fn ends_with() -> MethodRef {
    string_predicate("EndsWith")
}

/// `String.Contains(this String, String) -> Boolean`
pub fn contains() -> MethodRef {
    string_predicate("Contains")
}

/// `String.ToUpper(this String) -> String`
pub fn to_upper() -> MethodRef {
    string_transform("ToUpper")
}

/// `String.ToLower(this String) -> String`
pub fn to_lower() -> MethodRef {
    string_transform("ToLower")
}

/// `String.Trim(this String) -> String`
pub fn trim() -> MethodRef {
    string_transform("Trim")
}

/// `static String.IsNullOrEmpty(String) -> Boolean`
pub fn is_null_or_empty() -> MethodRef {
    MethodRef::new_static("String", "IsNullOrEmpty", [DataType::String], DataType::Boolean)
}

/// `static Regex.IsMatch(String, String) -> Boolean`
pub fn regex_is_match() -> MethodRef {
    MethodRef::new_static(
        "Regex",
        "IsMatch",
        [DataType::String, DataType::String],
        DataType::Boolean,
    )
}

/// `static Enumerable.Any(List<Any>, Func<Any, Boolean>) -> Boolean`
pub fn any() -> MethodRef {
    quantifier("Any")
}

/// `static Enumerable.All(List<Any>, Func<Any, Boolean>) -> Boolean`
pub fn all() -> MethodRef {
    quantifier("All")
}

/// `static Enumerable.Contains(List<Any>, Any) -> Boolean`
pub fn list_contains() -> MethodRef {
    MethodRef::new_static(
        "Enumerable",
        "Contains",
        [DataType::list(DataType::Any), DataType::Any],
        DataType::Boolean,
    )
}

/// `static Enumerable.Count(List<Any>) -> Integer`
pub fn count() -> MethodRef {
    MethodRef::new_static(
        "Enumerable",
        "Count",
        [DataType::list(DataType::Any)],
        DataType::Integer,
    )
}

/// Every method of the standard catalog
pub fn standard() -> Vec<MethodRef> {
    vec![
        string_equals(),
        string_equals_with_comparison(),
        string_equals_instance(),
        string_equals_instance_with_comparison(),
        string_compare(),
        starts_with(),
        ends_with(),
        contains(),
        to_upper(),
        to_lower(),
        trim(),
        is_null_or_empty(),
        regex_is_match(),
        any(),
        all(),
        list_contains(),
        count(),
    ]
}

fn string_predicate(name: &str) -> MethodRef {
    MethodRef::new_instance("String", name, DataType::String, [DataType::String], DataType::Boolean)
}

fn string_transform(name: &str) -> MethodRef {
    MethodRef {
        declaring_type: "String".to_string(),
        name: name.to_string(),
        kind: MethodKind::Instance {
            receiver: DataType::String,
        },
        parameters: smallvec![],
        return_type: DataType::String,
    }
}

fn quantifier(name: &str) -> MethodRef {
    MethodRef::new_static(
        "Enumerable",
        name,
        [
            DataType::list(DataType::Any),
            DataType::predicate(DataType::Any),
        ],
        DataType::Boolean,
    )
}
