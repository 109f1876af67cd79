//! Typed predicate conversion between structurally similar record types
//!
//! A predicate written against one record type (say a domain model) is
//! rewritten into an equivalent predicate over another type with matching
//! members (say a persistence record), so it can be evaluated against
//! collections of the second type.
//!
//! # Example
//!
//! ```ignore
//! use retarget::{ExpressionConverter, TreeBuilder, TypeRegistry};
//!
//! let b = TreeBuilder::new(&registry);
//! let model = b.parameter("model", DataType::named("Model"));
//! let body = b.equal(b.member(b.param(&model), "Value")?, b.string("A"))?;
//! let predicate = b.predicate(model, body)?;
//!
//! let converted = retarget::convert(&registry, &predicate, "Model", "Data")?;
//! assert_eq!(converted.to_string(), r#"model => (model.Value == "A")"#);
//! ```

// Re-export all public APIs from internal crates
pub use retarget_ast as ast;
pub use retarget_convert as convert;
pub use retarget_diagnostics as diagnostics;
pub use retarget_eval as eval;
pub use retarget_types as types;

// Convenience re-exports
pub use retarget_ast::{Expression, Lambda, Predicate, TreeBuilder, TypeChecker, methods};
pub use retarget_convert::{ByName, ExplicitMapping, ExpressionConverter, MemberCorrespondence};
pub use retarget_diagnostics::{Result, RetargetError};
pub use retarget_eval::{Evaluator, Record, Value};
pub use retarget_types::{DataType, StringComparison, TypeDescriptor, TypeRegistry};

/// Convert a predicate over `source` into one over `target`, matching members by name
///
/// Builds a throwaway converter; hold on to an [`ExpressionConverter`] when
/// converting repeatedly so member maps are cached.
pub fn convert(registry: &TypeRegistry, predicate: &Predicate, source: &str, target: &str) -> Result<Predicate> {
    log::debug!("one-shot conversion {} -> {}", source, target);
    Ok(ExpressionConverter::new(registry.clone()).convert(predicate, source, target)?)
}

/// Convert a predicate and keep the items it matches
pub fn convert_and_filter(
    registry: &TypeRegistry,
    predicate: &Predicate,
    source: &str,
    target: &str,
    items: &[Value],
) -> Result<Vec<Value>> {
    let converted = convert(registry, predicate, source, target)?;
    Ok(Evaluator::new().filter(&converted, items)?)
}
