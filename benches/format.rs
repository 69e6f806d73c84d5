use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use tconf::{from_str, to_string, Array, Document, ObjectValue, Registry, Value};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct Product {
    sku: String,
    name: String,
    price: f32,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct NestedData {
    id: u32,
    metadata: Metadata,
    tags: Vec<String>,
}

const PRODUCT_TYPE: &str = "shop.Product";

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_serde::<Product>(PRODUCT_TYPE);
    registry
}

fn product(i: u32) -> Product {
    Product {
        sku: format!("SKU{}", i),
        name: format!("Product {}", i),
        price: 9.99 + i as f32,
        quantity: i,
    }
}

fn flat_document(size: u32) -> Document {
    let mut doc = Document::new();
    for i in 0..size {
        let section = format!("section{}", i / 10);
        doc.insert_commented(format!("{}.count{}", section, i), "A counter", i as i32);
        doc.insert_value(format!("{}.name{}", section, i), format!("entry {}", i));
    }
    doc
}

fn benchmark_generate_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_flat");
    let registry = registry();

    for size in [10, 100, 1000].iter() {
        let doc = flat_document(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| registry.generator().generate(black_box(doc)))
        });
    }
    group.finish();
}

fn benchmark_parse_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_flat");
    let registry = registry();

    for size in [10, 100, 1000].iter() {
        let text = registry.generator().generate(&flat_document(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| registry.parser().parse(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_object_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("object_array");
    let registry = registry();

    for size in [10, 100].iter() {
        let objects = (0..*size).map(|i| ObjectValue::new(PRODUCT_TYPE, product(i)));
        let mut doc = Document::new();
        doc.insert_value("products", Array::of_objects(PRODUCT_TYPE, objects).unwrap());
        let text = registry.generator().generate(&doc).unwrap();

        group.bench_with_input(BenchmarkId::new("generate", size), &doc, |b, doc| {
            b.iter(|| registry.generator().generate(black_box(doc)))
        });
        group.bench_with_input(BenchmarkId::new("parse", size), &text, |b, text| {
            b.iter(|| registry.parser().parse(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_primitive_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitive_array");
    let registry = registry();

    let mut doc = Document::new();
    doc.insert_value("integers", Value::from((0..100).collect::<Vec<i32>>()));
    doc.insert_value("floats", Value::from((0..100).map(|i| i as f32 * 1.5).collect::<Vec<f32>>()));
    doc.insert_value("booleans", Value::from((0..100).map(|i| i % 2 == 0).collect::<Vec<bool>>()));
    let text = registry.generator().generate(&doc).unwrap();

    group.bench_function("generate", |b| {
        b.iter(|| registry.generator().generate(black_box(&doc)))
    });
    group.bench_function("parse", |b| b.iter(|| registry.parser().parse(black_box(&text))));
    group.finish();
}

fn benchmark_serde_nested(c: &mut Criterion) {
    let registry = registry();
    let data = NestedData {
        id: 42,
        metadata: Metadata {
            created: "2023-01-01T00:00:00Z".to_string(),
            updated: "2023-12-31T23:59:59Z".to_string(),
            version: 3,
        },
        tags: vec![
            "important".to_string(),
            "verified".to_string(),
            "production".to_string(),
        ],
    };
    let text = to_string(&data, &registry).unwrap();

    c.bench_function("serialize_nested_struct", |b| {
        b.iter(|| to_string(black_box(&data), &registry))
    });
    c.bench_function("deserialize_nested_struct", |b| {
        b.iter(|| from_str::<NestedData>(black_box(&text), &registry))
    });
}

criterion_group!(
    benches,
    benchmark_generate_flat,
    benchmark_parse_flat,
    benchmark_object_array,
    benchmark_primitive_array,
    benchmark_serde_nested
);
criterion_main!(benches);
