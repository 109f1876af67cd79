//! End-to-end conversion tests: build over `Model`, convert to `Data`, filter

mod common;

use common::{data, data_row, member, model_predicate, registry};
use pretty_assertions::assert_eq;
use retarget::ast::{BinaryOp, Expression, Lambda};
use retarget::convert::ConvertError;
use retarget::diagnostics::{NodePath, PathSegment, RT0100};
use retarget::{
    DataType, Evaluator, ExplicitMapping, ExpressionConverter, Predicate, Record, StringComparison,
    TypeChecker, TypeDescriptor, TypeRegistry, Value, methods,
};
use rstest::rstest;
use std::sync::Arc;

fn abc() -> Vec<Value> {
    vec![data("A"), data("B"), data("C")]
}

fn run(predicate: &Predicate) -> Vec<Value> {
    let converter = ExpressionConverter::new(registry());
    let converted = converter.convert(predicate, "Model", "Data").unwrap();
    Evaluator::new().filter(&converted, &abc()).unwrap()
}

fn equals_with(mode: StringComparison, constant: &'static str) -> Predicate {
    model_predicate(&registry(), |b, m| {
        b.call(
            methods::string_equals_with_comparison(),
            vec![member(b, m, "Value"), b.string(constant), b.comparison(mode)],
        )
        .unwrap()
    })
}

#[test]
fn test_equality_operator() {
    let predicate = model_predicate(&registry(), |b, m| {
        b.equal(member(b, m, "Value"), b.string("A")).unwrap()
    });
    assert_eq!(run(&predicate), vec![data("A")]);
}

#[test]
fn test_static_equals_invariant_ignore_case() {
    let predicate = equals_with(StringComparison::InvariantCultureIgnoreCase, "A");
    assert_eq!(run(&predicate), vec![data("A")]);
}

#[test]
fn test_instance_equals_current_culture_ignore_case() {
    let predicate = model_predicate(&registry(), |b, m| {
        b.call_instance(
            methods::string_equals_instance_with_comparison(),
            member(b, m, "Value"),
            vec![
                b.string("A"),
                b.comparison(StringComparison::CurrentCultureIgnoreCase),
            ],
        )
        .unwrap()
    });
    assert_eq!(run(&predicate), vec![data("A")]);
}

#[rstest]
#[case("A", vec![data("A")])]
#[case("a", vec![])]
fn test_invariant_culture_is_case_sensitive(#[case] constant: &'static str, #[case] expected: Vec<Value>) {
    let predicate = equals_with(StringComparison::InvariantCulture, constant);
    assert_eq!(run(&predicate), expected);
}

#[rstest]
#[case(StringComparison::Ordinal, "a", 0)]
#[case(StringComparison::OrdinalIgnoreCase, "a", 1)]
#[case(StringComparison::CurrentCulture, "a", 0)]
#[case(StringComparison::CurrentCultureIgnoreCase, "a", 1)]
fn test_every_comparison_mode_survives(
    #[case] mode: StringComparison,
    #[case] constant: &'static str,
    #[case] matches: usize,
) {
    let predicate = equals_with(mode, constant);
    let converted = ExpressionConverter::new(registry())
        .convert(&predicate, "Model", "Data")
        .unwrap();

    assert!(converted.to_string().contains(&mode.to_string()));
    assert_eq!(Evaluator::new().filter(&converted, &abc()).unwrap().len(), matches);
}

#[test]
fn test_trivial_predicates() {
    let registry = registry();
    let converter = ExpressionConverter::new(registry.clone());
    for constant in [true, false] {
        let predicate = model_predicate(&registry, |b, _| b.boolean(constant));
        let converted = converter.convert(&predicate, "Model", "Data").unwrap();

        assert_eq!(converted.input_type(), &DataType::named("Data"));
        assert_eq!(converted.body(), predicate.body());
        let expected = if constant { abc() } else { vec![] };
        assert_eq!(Evaluator::new().filter(&converted, &abc()).unwrap(), expected);
    }
}

#[test]
fn test_unmapped_member_fails() {
    let predicate = model_predicate(&registry(), |b, m| {
        b.equal(member(b, m, "Secret"), b.string("x")).unwrap()
    });
    let err = ExpressionConverter::new(registry())
        .convert(&predicate, "Model", "Data")
        .unwrap_err();

    assert_eq!(
        err,
        ConvertError::UnmappedMember {
            source_type: "Model".to_string(),
            member: "Secret".to_string(),
            target_type: "Data".to_string(),
            path: NodePath::root()
                .child(PathSegment::Body)
                .child(PathSegment::Left),
        }
    );

    let err = retarget::RetargetError::from(err);
    assert_eq!(err.code(), RT0100);
}

#[test]
fn test_unmapped_member_deep_inside_fails_whole_conversion() {
    let predicate = model_predicate(&registry(), |b, m| {
        let ok = b.equal(member(b, m, "Value"), b.string("A")).unwrap();
        let secret = b.is_null(member(b, m, "Secret")).unwrap();
        b.or(ok, b.not(secret).unwrap()).unwrap()
    });
    let err = ExpressionConverter::new(registry())
        .convert(&predicate, "Model", "Data")
        .unwrap_err();

    assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("body.right.operand.operand"));
}

#[test]
fn test_structure_is_preserved() {
    let predicate = model_predicate(&registry(), |b, m| {
        let starts = b
            .call_instance(methods::starts_with(), member(b, m, "Value"), vec![b.string("A")])
            .unwrap();
        let small = b.less(member(b, m, "Count"), b.integer(10)).unwrap();
        b.and(starts, b.not(small).unwrap()).unwrap()
    });
    let converted = ExpressionConverter::new(registry())
        .convert(&predicate, "Model", "Data")
        .unwrap();

    fn shape(expr: &Expression, out: &mut Vec<&'static str>) {
        out.push(expr.kind_name());
        for child in expr.children() {
            shape(child, out);
        }
    }
    let (mut before, mut after) = (Vec::new(), Vec::new());
    shape(predicate.body(), &mut before);
    shape(converted.body(), &mut after);

    assert_eq!(before, after);
    assert_eq!(predicate.to_string(), converted.to_string());
}

#[test]
fn test_widened_member_type() {
    let predicate = model_predicate(&registry(), |b, m| {
        b.greater(member(b, m, "Count"), b.integer(1)).unwrap()
    });
    let converted = ExpressionConverter::new(registry())
        .convert(&predicate, "Model", "Data")
        .unwrap();

    let left = converted.body().as_binary().unwrap().left.as_member().unwrap();
    assert_eq!(left.data_type, DataType::Long);
    assert_eq!(left.declaring_type, "Data");

    let rows = [
        data_row(Some("x"), 1, "Oslo", &[]),
        data_row(Some("y"), 5_000_000_000, "Oslo", &[]),
    ];
    assert_eq!(Evaluator::new().filter(&converted, &rows).unwrap(), vec![rows[1].clone()]);
}

#[test]
fn test_nested_record_member() {
    let registry = registry();
    let predicate = model_predicate(&registry, |b, m| {
        let city = b.member_path(b.param(m), &["Home", "City"]).unwrap();
        b.call(
            methods::string_equals_with_comparison(),
            vec![
                city,
                b.string("oslo"),
                b.comparison(StringComparison::OrdinalIgnoreCase),
            ],
        )
        .unwrap()
    });
    let converter = ExpressionConverter::new(registry);
    let converted = converter.convert(&predicate, "Model", "Data").unwrap();

    assert!(converter.cache().contains("ModelAddress", "DataAddress"));
    let rows = [
        data_row(Some("a"), 1, "Oslo", &[]),
        data_row(Some("b"), 2, "Bergen", &[]),
    ];
    assert_eq!(Evaluator::new().filter(&converted, &rows).unwrap(), vec![rows[0].clone()]);
}

#[test]
fn test_nested_lambda_over_list_member() {
    let predicate = model_predicate(&registry(), |b, m| {
        let t = b.parameter("t", DataType::String);
        let body = b
            .call_instance(methods::contains(), b.param(&t), vec![b.string("vip")])
            .unwrap();
        b.call(methods::any(), vec![member(b, m, "Tags"), b.lambda_expr(vec![t], body)])
            .unwrap()
    });
    let converted = ExpressionConverter::new(registry())
        .convert(&predicate, "Model", "Data")
        .unwrap();

    assert_eq!(
        converted.to_string(),
        r#"model => Enumerable.Any(model.Tags, t => t.Contains("vip"))"#
    );
    let rows = [
        data_row(Some("a"), 1, "Oslo", &["new", "vip-gold"]),
        data_row(Some("b"), 2, "Oslo", &["new"]),
    ];
    assert_eq!(Evaluator::new().filter(&converted, &rows).unwrap(), vec![rows[0].clone()]);
}

/// `Model`/`Data` pairs whose nested records name their members differently:
/// `ModelLine.Name` is `DataLine.Title`, `ModelAddress.City` is `DataAddress.Town`
fn renamed_registry() -> TypeRegistry {
    TypeRegistry::from_types([
        TypeDescriptor::new("Model")
            .property("Flag", DataType::Boolean)
            .property("Home", DataType::named("ModelAddress"))
            .property("Work", DataType::named("ModelAddress"))
            .property("Lines", DataType::list(DataType::named("ModelLine"))),
        TypeDescriptor::new("ModelAddress").property("City", DataType::String),
        TypeDescriptor::new("ModelLine").property("Name", DataType::String),
        TypeDescriptor::new("Data")
            .property("Flag", DataType::Boolean)
            .property("Home", DataType::named("DataAddress"))
            .property("Work", DataType::named("DataAddress"))
            .property("Lines", DataType::list(DataType::named("DataLine"))),
        TypeDescriptor::new("DataAddress").property("Town", DataType::String),
        TypeDescriptor::new("DataLine").property("Title", DataType::String),
    ])
    .unwrap()
}

/// `model => Enumerable.Any(model.Lines, l => (l.Name == "x"))`
fn any_line_named(registry: &TypeRegistry) -> Predicate {
    model_predicate(registry, |b, m| {
        let l = b.parameter("l", DataType::named("ModelLine"));
        let body = b.equal(b.member(b.param(&l), "Name").unwrap(), b.string("x")).unwrap();
        b.call(methods::any(), vec![member(b, m, "Lines"), b.lambda_expr(vec![l], body)])
            .unwrap()
    })
}

fn renamed_row(flag: bool, home: &str, work: &str, lines: &[&str]) -> Value {
    Record::new("Data")
        .with("Flag", flag)
        .with("Home", Record::new("DataAddress").with("Town", home))
        .with("Work", Record::new("DataAddress").with("Town", work))
        .with(
            "Lines",
            lines
                .iter()
                .map(|title| Record::new("DataLine").with("Title", *title).into())
                .collect::<Vec<Value>>(),
        )
        .into()
}

#[test]
fn test_nested_lambda_parameter_follows_list_element_mapping() {
    let registry = renamed_registry();
    let converter = ExpressionConverter::new(registry.clone())
        .with_correspondence(ExplicitMapping::new().map_for("ModelLine", "Name", "Title"));
    let converted = converter
        .convert(&any_line_named(&registry), "Model", "Data")
        .unwrap();

    assert_eq!(
        converted.to_string(),
        r#"model => Enumerable.Any(model.Lines, l => (l.Title == "x"))"#
    );
    TypeChecker::new(&registry).check_predicate(&converted).unwrap();
    assert!(converter.cache().contains("ModelLine", "DataLine"));

    let rows = [
        renamed_row(false, "Oslo", "Oslo", &["a", "x"]),
        renamed_row(false, "Oslo", "Oslo", &["a"]),
        renamed_row(false, "Oslo", "Oslo", &[]),
    ];
    assert_eq!(Evaluator::new().filter(&converted, &rows).unwrap(), vec![rows[0].clone()]);
}

#[test]
fn test_nested_lambda_parameter_member_must_map() {
    let registry = renamed_registry();
    let err = ExpressionConverter::new(registry.clone())
        .convert(&any_line_named(&registry), "Model", "Data")
        .unwrap_err();

    assert_eq!(
        err,
        ConvertError::UnmappedMember {
            source_type: "ModelLine".into(),
            member: "Name".into(),
            target_type: "DataLine".into(),
            path: NodePath::root()
                .child(PathSegment::Body)
                .child(PathSegment::Argument(1))
                .child(PathSegment::Body)
                .child(PathSegment::Left),
        }
    );
}

#[rstest]
#[case::conditional(true, r#"model => ((model.Flag ? model.Home : model.Work).Town == "Oslo")"#)]
#[case::coalesce(false, r#"model => ((model.Home ?? model.Work).Town == "Oslo")"#)]
fn test_member_of_derived_record_follows_mapping(#[case] conditional: bool, #[case] expected: &str) {
    let registry = renamed_registry();
    let predicate = model_predicate(&registry, |b, m| {
        let address = if conditional {
            b.conditional(member(b, m, "Flag"), member(b, m, "Home"), member(b, m, "Work"))
                .unwrap()
        } else {
            b.binary(BinaryOp::Coalesce, member(b, m, "Home"), member(b, m, "Work"))
                .unwrap()
        };
        b.equal(b.member(address, "City").unwrap(), b.string("Oslo")).unwrap()
    });
    let converted = ExpressionConverter::new(registry.clone())
        .with_correspondence(ExplicitMapping::new().map_for("ModelAddress", "City", "Town"))
        .convert(&predicate, "Model", "Data")
        .unwrap();

    assert_eq!(converted.to_string(), expected);
    let town = converted.body().as_binary().unwrap().left.as_member().unwrap();
    assert_eq!(town.declaring_type, "DataAddress");
    TypeChecker::new(&registry).check_predicate(&converted).unwrap();

    let rows = [
        renamed_row(true, "Oslo", "Bergen", &[]),
        renamed_row(true, "Bergen", "Oslo", &[]),
    ];
    assert_eq!(Evaluator::new().filter(&converted, &rows).unwrap(), vec![rows[0].clone()]);
}

#[test]
fn test_member_of_derived_record_must_map() {
    let registry = renamed_registry();
    let predicate = model_predicate(&registry, |b, m| {
        let address = b
            .conditional(member(b, m, "Flag"), member(b, m, "Home"), member(b, m, "Work"))
            .unwrap();
        b.equal(b.member(address, "City").unwrap(), b.string("Oslo")).unwrap()
    });
    let err = ExpressionConverter::new(registry.clone())
        .convert(&predicate, "Model", "Data")
        .unwrap_err();

    assert_eq!(
        err,
        ConvertError::UnmappedMember {
            source_type: "ModelAddress".into(),
            member: "City".into(),
            target_type: "DataAddress".into(),
            path: NodePath::root().child(PathSegment::Body).child(PathSegment::Left),
        }
    );
}

#[test]
fn test_explicit_mapping() {
    let registry = registry();
    let predicate = model_predicate(&registry, |b, m| {
        let value = b.equal(member(b, m, "Value"), b.string("A")).unwrap();
        let count = b.greater(member(b, m, "Count"), b.integer(2)).unwrap();
        b.and(value, count).unwrap()
    });
    let converter = ExpressionConverter::new(registry)
        .with_correspondence(ExplicitMapping::new().map("Value", "Label").map("Count", "Total"));
    let converted = converter.convert(&predicate, "Model", "Entity").unwrap();

    assert_eq!(
        converted.to_string(),
        r#"model => ((model.Label == "A") && (model.Total > 2))"#
    );

    let rows: Vec<Value> = [("A", 3i64), ("A", 1), ("B", 9)]
        .into_iter()
        .map(|(label, total)| {
            Record::new("Entity")
                .with("Label", label)
                .with("Total", total)
                .into()
        })
        .collect();
    assert_eq!(Evaluator::new().filter(&converted, &rows).unwrap(), vec![rows[0].clone()]);
}

#[test]
fn test_incompatible_member_type() {
    let registry = registry();
    let predicate = model_predicate(&registry, |b, m| {
        b.equal(member(b, m, "Value"), b.string("A")).unwrap()
    });
    let converter = ExpressionConverter::new(registry)
        .with_correspondence(ExplicitMapping::new().map("Value", "Total"));
    let err = converter.convert(&predicate, "Model", "Entity").unwrap_err();

    assert!(matches!(err, ConvertError::IncompatibleMemberType { ref target_member, .. } if target_member == "Total"));
}

#[test]
fn test_malformed_inputs() {
    let registry = registry();
    let converter = ExpressionConverter::new(registry.clone());
    let predicate = model_predicate(&registry, |b, m| {
        b.equal(member(b, m, "Value"), b.string("A")).unwrap()
    });

    let err = converter.convert(&predicate, "Data", "Model").unwrap_err();
    assert!(matches!(err, ConvertError::MalformedTree { .. }));

    let err = converter.convert(&predicate, "Model", "Missing").unwrap_err();
    assert_eq!(err, ConvertError::UnknownType { name: "Missing".to_string() });

    let two = Lambda::new(
        vec![
            predicate.parameter().clone(),
            retarget::ast::ParameterExpr::new("other", DataType::named("Model")),
        ],
        predicate.body().clone(),
    );
    let err = converter.convert_lambda(&two, "Model", "Data").unwrap_err();
    assert!(matches!(err, ConvertError::MalformedTree { .. }));
}

#[test]
fn test_converted_predicate_json_round_trip() {
    let predicate = equals_with(StringComparison::InvariantCultureIgnoreCase, "A");
    let converted = ExpressionConverter::new(registry())
        .convert(&predicate, "Model", "Data")
        .unwrap();

    let json = retarget::ast::serialize::to_json(&converted).unwrap();
    let restored = retarget::ast::serialize::from_json(&json).unwrap();
    assert_eq!(restored, converted);
    TypeChecker::new(&registry()).check_predicate(&restored).unwrap();
}

#[test]
fn test_shared_converter_across_threads() {
    let registry = registry();
    let converter = Arc::new(ExpressionConverter::new(registry.clone()));
    let predicate = Arc::new(model_predicate(&registry, |b, m| {
        b.equal(member(b, m, "Value"), b.string("B")).unwrap()
    }));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let converter = Arc::clone(&converter);
            let predicate = Arc::clone(&predicate);
            std::thread::spawn(move || converter.convert(&predicate, "Model", "Data").unwrap())
        })
        .collect();

    let results: Vec<Predicate> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(converter.cache().len(), 1);
    assert_eq!(Evaluator::new().filter(&results[0], &abc()).unwrap(), vec![data("B")]);
}

#[test]
fn test_one_shot_helpers() {
    let registry = registry();
    let predicate = model_predicate(&registry, |b, m| {
        b.not_equal(member(b, m, "Value"), b.string("A")).unwrap()
    });

    let matched = retarget::convert_and_filter(&registry, &predicate, "Model", "Data", &abc()).unwrap();
    assert_eq!(matched, vec![data("B"), data("C")]);

    let err = retarget::convert(&registry, &predicate, "Model", "Nope").unwrap_err();
    assert_eq!(err.code(), retarget::diagnostics::RT0103);
}
