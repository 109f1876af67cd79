//! Shared fixtures for the integration tests

#![allow(dead_code)]

use retarget::{DataType, Predicate, Record, TreeBuilder, TypeDescriptor, TypeRegistry, Value};
use retarget::ast::{Expression, ParameterExpr};

/// Domain types `Model`/`ModelAddress` and storage types `Data`/`DataAddress`,
/// plus `Entity`, whose members carry different names
pub fn registry() -> TypeRegistry {
    TypeRegistry::from_types([
        TypeDescriptor::new("Model")
            .property("Value", DataType::String)
            .property("Count", DataType::Integer)
            .property("Secret", DataType::String)
            .property("Tags", DataType::list(DataType::String))
            .property("Home", DataType::named("ModelAddress")),
        TypeDescriptor::new("ModelAddress").property("City", DataType::String),
        TypeDescriptor::new("Data")
            .property("Value", DataType::String)
            .property("Count", DataType::Long)
            .property("Tags", DataType::list(DataType::String))
            .property("Home", DataType::named("DataAddress")),
        TypeDescriptor::new("DataAddress").field("City", DataType::String),
        TypeDescriptor::new("Entity")
            .property("Label", DataType::String)
            .property("Total", DataType::Long),
    ])
    .unwrap()
}

/// Build `model => <body>` over `Model`
pub fn model_predicate<F>(registry: &TypeRegistry, body: F) -> Predicate
where
    F: FnOnce(&TreeBuilder<'_>, &ParameterExpr) -> Expression,
{
    let b = TreeBuilder::new(registry);
    let model = b.parameter("model", DataType::named("Model"));
    let body = body(&b, &model);
    b.predicate(model, body).unwrap()
}

/// `model.<member>`
pub fn member(b: &TreeBuilder<'_>, model: &ParameterExpr, name: &str) -> Expression {
    b.member(b.param(model), name).unwrap()
}

/// A `Data` record with only `Value` set
pub fn data(value: &str) -> Value {
    Record::new("Data").with("Value", value).into()
}

/// A complete `Data` record
pub fn data_row(value: Option<&str>, count: i64, city: &str, tags: &[&str]) -> Value {
    Record::new("Data")
        .with("Value", value)
        .with("Count", count)
        .with("Tags", tags.iter().map(|t| Value::string(*t)).collect::<Vec<_>>())
        .with("Home", Record::new("DataAddress").with("City", city))
        .into()
}

/// The `Model` record holding the same data as [`data_row`]
pub fn model_row(value: Option<&str>, count: i32, city: &str, tags: &[&str]) -> Value {
    Record::new("Model")
        .with("Value", value)
        .with("Count", count)
        .with("Secret", "s")
        .with("Tags", tags.iter().map(|t| Value::string(*t)).collect::<Vec<_>>())
        .with("Home", Record::new("ModelAddress").with("City", city))
        .into()
}
