//! Converter benchmarks using divan
//!
//! Benchmarks for predicate conversion and filtering of converted predicates.

use retarget::ast::Expression;
use retarget::{
    DataType, Evaluator, ExpressionConverter, Predicate, Record, StringComparison, TreeBuilder,
    TypeDescriptor, TypeRegistry, Value, methods,
};

fn main() {
    divan::main();
}

fn registry() -> TypeRegistry {
    let fields = |name: &str, count: DataType| {
        TypeDescriptor::new(name)
            .property("Value", DataType::String)
            .property("Count", count)
            .property("Home", DataType::named(format!("{}Address", name)))
    };
    TypeRegistry::from_types([
        fields("Model", DataType::Integer),
        TypeDescriptor::new("ModelAddress").property("City", DataType::String),
        fields("Data", DataType::Long),
        TypeDescriptor::new("DataAddress").property("City", DataType::String),
    ])
    .unwrap()
}

/// `model => (model.Value == "A")`
fn simple(registry: &TypeRegistry) -> Predicate {
    let b = TreeBuilder::new(registry);
    let m = b.parameter("model", DataType::named("Model"));
    let body = b
        .equal(b.member(b.param(&m), "Value").unwrap(), b.string("A"))
        .unwrap();
    b.predicate(m, body).unwrap()
}

/// A disjunction of `width` comparisons touching every member
fn wide(registry: &TypeRegistry, width: usize) -> Predicate {
    let b = TreeBuilder::new(registry);
    let m = b.parameter("model", DataType::named("Model"));
    let term = |i: usize| -> Expression {
        match i % 3 {
            0 => b
                .call(
                    methods::string_equals_with_comparison(),
                    vec![
                        b.member(b.param(&m), "Value").unwrap(),
                        b.string(format!("v{}", i)),
                        b.comparison(StringComparison::OrdinalIgnoreCase),
                    ],
                )
                .unwrap(),
            1 => b
                .greater(b.member(b.param(&m), "Count").unwrap(), b.integer(i as i32))
                .unwrap(),
            _ => b
                .equal(
                    b.member_path(b.param(&m), &["Home", "City"]).unwrap(),
                    b.string(format!("c{}", i)),
                )
                .unwrap(),
        }
    };
    let body = (1..width).fold(term(0), |acc, i| b.or(acc, term(i)).unwrap());
    b.predicate(m, body).unwrap()
}

fn rows(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            Record::new("Data")
                .with("Value", if i % 2 == 0 { "A" } else { "B" })
                .with("Count", i as i64)
                .with("Home", Record::new("DataAddress").with("City", "Oslo"))
                .into()
        })
        .collect()
}

mod conversion {
    use super::*;

    #[divan::bench]
    fn simple_cold(bencher: divan::Bencher) {
        let registry = registry();
        let predicate = simple(&registry);

        bencher.bench_local(|| {
            let converter = ExpressionConverter::new(registry.clone());
            converter.convert(divan::black_box(&predicate), "Model", "Data")
        });
    }

    #[divan::bench]
    fn simple_cached(bencher: divan::Bencher) {
        let registry = registry();
        let predicate = simple(&registry);
        let converter = ExpressionConverter::new(registry.clone());

        bencher.bench_local(|| converter.convert(divan::black_box(&predicate), "Model", "Data"));
    }

    #[divan::bench(args = [4, 16, 64])]
    fn wide_cached(bencher: divan::Bencher, width: usize) {
        let registry = registry();
        let predicate = wide(&registry, width);
        let converter = ExpressionConverter::new(registry.clone());

        bencher.bench_local(|| converter.convert(divan::black_box(&predicate), "Model", "Data"));
    }
}

mod filtering {
    use super::*;

    #[divan::bench(args = [100, 1000])]
    fn converted_simple(bencher: divan::Bencher, n: usize) {
        let registry = registry();
        let converted = ExpressionConverter::new(registry.clone())
            .convert(&simple(&registry), "Model", "Data")
            .unwrap();
        let items = rows(n);
        let evaluator = Evaluator::new();

        bencher.bench_local(|| evaluator.filter(&converted, divan::black_box(&items)));
    }

    #[divan::bench(args = [100, 1000])]
    fn converted_wide(bencher: divan::Bencher, n: usize) {
        let registry = registry();
        let converted = ExpressionConverter::new(registry.clone())
            .convert(&wide(&registry, 16), "Model", "Data")
            .unwrap();
        let items = rows(n);
        let evaluator = Evaluator::new();

        bencher.bench_local(|| evaluator.filter(&converted, divan::black_box(&items)));
    }
}
