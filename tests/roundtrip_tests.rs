mod common;

use common::*;
use tconf::{Array, Document, Entry, FormatOptions, ObjectValue, Value};

fn roundtrip(doc: &Document) -> Document {
    let registry = registry();
    let text = registry.generator().generate(doc).unwrap();
    registry.parser().parse(&text).unwrap()
}

#[test]
fn test_object_text_is_stable() {
    let config = text(
        r#"
veryCoolObject = Tpkg.VeryCoolObject {
    anInteger = 1234
    aFloat = 12.34
    aTrueBoolean = true
    aFalseBoolean = false
    aString = "Hello, World!"
}
"#,
    );

    let registry = registry();
    let doc = registry.parser().parse(&config).unwrap();
    let generated = registry.generator().generate(&doc).unwrap();
    assert_eq!(generated, config);
}

#[test]
fn test_commented_document() {
    let mut doc = Document::new();
    doc.insert_commented("server.host", "Bind address", "0.0.0.0");
    doc.insert_commented("server.port", "Bind port", 8080);
    doc.insert_value("server.tls.enabled", false);
    doc.insert_commented("ratio", "Sampling ratio", 0.25f32);
    doc.insert_value("tags", vec!["a", "b"]);

    assert_eq!(roundtrip(&doc), doc);
}

#[test]
fn test_objects_and_object_arrays() {
    let objects = vec![
        ObjectValue::new(VERY_COOL_OBJECT, VeryCoolObject::new(1, 0.5, "first")),
        ObjectValue::new(VERY_COOL_OBJECT, VeryCoolObject::new(2, 1.5, "second }")),
    ];

    let mut doc = Document::new();
    doc.insert_value("single", very_cool_object(7, 7.5, "ends with ]"));
    doc.insert_value("many", Array::of_objects(VERY_COOL_OBJECT, objects).unwrap());
    doc.insert_value(
        "nested.deep",
        Value::object(
            VERY_COOL_OBJECT_WITH_OBJECT,
            VeryCoolObjectWithObject {
                an_integer: 3,
                cool_object: VeryCoolObjectWithArray::new(&[-1, 0, 1], &[]),
            },
        ),
    );

    assert_eq!(roundtrip(&doc), doc);
}

#[test]
fn test_block_headers_roundtrip_with_recording() {
    let mut doc = Document::new();
    doc.insert_block("outer", "Outer block");
    doc.insert_block("outer.inner", "Inner block");
    doc.insert_commented("outer.inner.value", "A value", 1);
    doc.insert_value("outer.after", true);

    let registry = registry();
    let text = registry.generator().generate(&doc).unwrap();

    let options = FormatOptions::new().with_block_headers(true);
    let parsed = registry.parser_with_options(options).parse(&text).unwrap();
    assert_eq!(parsed, doc);

    let plain = registry.parser().parse(&text).unwrap();
    assert_eq!(plain.len(), 2);
    assert_eq!(plain.get("outer.inner.value"), Some(&Entry::commented("A value", 1)));
}

#[test]
fn test_sibling_blocks_at_same_depth() {
    let mut doc = Document::new();
    doc.insert_value("a.x.value", 1);
    doc.insert_value("a.y.value", 2);
    doc.insert_value("b.x.value", 3);

    let registry = registry();
    let text = registry.generator().generate(&doc).unwrap();
    assert_eq!(
        text,
        "a:\n    x:\n        value = 1\n    y:\n        value = 2\nb:\n    x:\n        value = 3\n"
    );
    assert_eq!(registry.parser().parse(&text).unwrap(), doc);
}

#[test]
fn test_float_formatting() {
    let mut doc = Document::new();
    doc.insert_value("whole", 3.0f32);
    doc.insert_value("small", 0.001f32);
    doc.insert_value("large", 16777216.0f32);

    let text = registry().generator().generate(&doc).unwrap();
    assert_eq!(text, "whole = 3.0\nsmall = 0.001\nlarge = 16777216.0\n");
    assert_eq!(roundtrip(&doc), doc);
}
