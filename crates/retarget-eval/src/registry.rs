//! Method registry for the evaluator
//!
//! Maps method identities to their implementations. Lookup is by the full
//! [`MethodRef`], so overloads that differ only in parameter list or
//! static/instance kind resolve to distinct implementations.

use crate::operators::values_equal;
use crate::{Evaluator, EvalError, EvalResult, Value, strings};
use once_cell::sync::Lazy;
use regex::Regex;
use retarget_ast::{MethodRef, methods};
use retarget_types::StringComparison;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type alias for method implementations
pub type MethodFn = Arc<dyn Fn(&Invocation<'_>) -> EvalResult<Value> + Send + Sync>;

/// Arguments of one method call
pub struct Invocation<'a> {
    /// Method being invoked
    pub method: &'a MethodRef,
    /// Receiver of an instance call
    pub instance: Option<&'a Value>,
    /// Evaluated arguments
    pub arguments: &'a [Value],
    /// Evaluator, for calling closure arguments
    pub evaluator: &'a Evaluator,
}

impl Invocation<'_> {
    /// Argument at `index`
    pub fn argument(&self, index: usize) -> EvalResult<&Value> {
        self.arguments.get(index).ok_or_else(|| EvalError::ArgumentCount {
            callee: self.method.qualified_name(),
            expected: index + 1,
            found: self.arguments.len(),
        })
    }

    /// Non-null receiver
    pub fn receiver(&self) -> EvalResult<&Value> {
        match self.instance {
            Some(value) if !value.is_null() => Ok(value),
            _ => Err(EvalError::null_reference(self.method.qualified_name())),
        }
    }

    /// String argument, or `None` for null
    pub fn nullable_string(&self, index: usize) -> EvalResult<Option<&str>> {
        nullable_string(self.argument(index)?)
    }

    /// Non-null string argument
    pub fn string(&self, index: usize) -> EvalResult<&str> {
        self.nullable_string(index)?
            .ok_or_else(|| EvalError::null_reference(self.method.qualified_name()))
    }

    /// Non-null string receiver
    pub fn receiver_string(&self) -> EvalResult<&str> {
        let receiver = self.receiver()?;
        receiver
            .as_string()
            .ok_or_else(|| EvalError::type_mismatch("String", receiver.type_name()))
    }

    /// Comparison mode argument
    pub fn comparison(&self, index: usize) -> EvalResult<StringComparison> {
        match self.argument(index)? {
            Value::Comparison(mode) => Ok(*mode),
            other => Err(EvalError::type_mismatch("StringComparison", other.type_name())),
        }
    }

    /// Non-null list argument
    pub fn list(&self, index: usize) -> EvalResult<&[Value]> {
        match self.argument(index)? {
            Value::List(items) => Ok(items),
            Value::Null => Err(EvalError::null_reference(self.method.qualified_name())),
            other => Err(EvalError::type_mismatch("List", other.type_name())),
        }
    }
}

fn nullable_string(value: &Value) -> EvalResult<Option<&str>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(EvalError::type_mismatch("String", other.type_name())),
    }
}

/// Registry of method implementations
#[derive(Clone, Default)]
pub struct MethodRegistry {
    methods: HashMap<MethodRef, MethodFn>,
}

static STANDARD: Lazy<MethodRegistry> = Lazy::new(MethodRegistry::build_standard);

impl MethodRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry implementing every method of the standard catalog
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    /// Register an implementation, replacing any previous one
    pub fn register<F>(&mut self, method: MethodRef, implementation: F)
    where
        F: Fn(&Invocation<'_>) -> EvalResult<Value> + Send + Sync + 'static,
    {
        self.methods.insert(method, Arc::new(implementation));
    }

    /// Implementation of `method`
    pub fn get(&self, method: &MethodRef) -> Option<&MethodFn> {
        self.methods.get(method)
    }

    pub fn contains(&self, method: &MethodRef) -> bool {
        self.methods.contains_key(method)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    fn build_standard() -> Self {
        let mut registry = Self::new();

        registry.register(methods::string_equals(), |inv| {
            Ok(Value::Boolean(nullable_equals(
                inv.nullable_string(0)?,
                inv.nullable_string(1)?,
                StringComparison::Ordinal,
            )))
        });
        registry.register(methods::string_equals_with_comparison(), |inv| {
            Ok(Value::Boolean(nullable_equals(
                inv.nullable_string(0)?,
                inv.nullable_string(1)?,
                inv.comparison(2)?,
            )))
        });
        registry.register(methods::string_equals_instance(), |inv| {
            Ok(Value::Boolean(nullable_equals(
                Some(inv.receiver_string()?),
                inv.nullable_string(0)?,
                StringComparison::Ordinal,
            )))
        });
        registry.register(methods::string_equals_instance_with_comparison(), |inv| {
            Ok(Value::Boolean(nullable_equals(
                Some(inv.receiver_string()?),
                inv.nullable_string(0)?,
                inv.comparison(1)?,
            )))
        });
        registry.register(methods::string_compare(), |inv| {
            let order = match (inv.nullable_string(0)?, inv.nullable_string(1)?) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => strings::compare(a, b, inv.comparison(2)?),
            };
            Ok(Value::Integer(order as i32))
        });

        registry.register(methods::starts_with(), |inv| {
            Ok(Value::Boolean(inv.receiver_string()?.starts_with(inv.string(0)?)))
        });
        registry.register(methods::ends_with(), |inv| {
            Ok(Value::Boolean(inv.receiver_string()?.ends_with(inv.string(0)?)))
        });
        registry.register(methods::contains(), |inv| {
            Ok(Value::Boolean(inv.receiver_string()?.contains(inv.string(0)?)))
        });
        registry.register(methods::to_upper(), |inv| {
            Ok(Value::String(inv.receiver_string()?.to_uppercase()))
        });
        registry.register(methods::to_lower(), |inv| {
            Ok(Value::String(inv.receiver_string()?.to_lowercase()))
        });
        registry.register(methods::trim(), |inv| {
            Ok(Value::String(inv.receiver_string()?.trim().to_string()))
        });
        registry.register(methods::is_null_or_empty(), |inv| {
            Ok(Value::Boolean(inv.nullable_string(0)?.is_none_or(str::is_empty)))
        });
        registry.register(methods::regex_is_match(), |inv| {
            let input = inv.string(0)?;
            let pattern = inv.string(1)?;
            let regex = Regex::new(pattern).map_err(|_| EvalError::InvalidRegex {
                pattern: pattern.to_string(),
            })?;
            Ok(Value::Boolean(regex.is_match(input)))
        });

        registry.register(methods::any(), |inv| {
            let predicate = inv.argument(1)?;
            for item in inv.list(0)? {
                if inv.evaluator.invoke(predicate, std::slice::from_ref(item))?.is_true() {
                    return Ok(Value::Boolean(true));
                }
            }
            Ok(Value::Boolean(false))
        });
        registry.register(methods::all(), |inv| {
            let predicate = inv.argument(1)?;
            for item in inv.list(0)? {
                if !inv.evaluator.invoke(predicate, std::slice::from_ref(item))?.is_true() {
                    return Ok(Value::Boolean(false));
                }
            }
            Ok(Value::Boolean(true))
        });
        registry.register(methods::list_contains(), |inv| {
            let needle = inv.argument(1)?;
            Ok(Value::Boolean(inv.list(0)?.iter().any(|item| values_equal(item, needle))))
        });
        registry.register(methods::count(), |inv| {
            let count = i32::try_from(inv.list(0)?.len()).map_err(|_| EvalError::overflow("Count"))?;
            Ok(Value::Integer(count))
        });

        registry
    }
}

/// String equality where null equals only null
fn nullable_equals(left: Option<&str>, right: Option<&str>, mode: StringComparison) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(a), Some(b)) => strings::equals(a, b, mode),
        _ => false,
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.methods.keys().map(ToString::to_string).collect();
        names.sort();
        f.debug_struct("MethodRegistry").field("methods", &names).finish()
    }
}
