//! Property-based tests for the generate-then-parse guarantee
//!
//! Generated documents use the value space the format can express: unsigned
//! numbers outside arrays, signed numbers inside them, single-line strings.

mod common;

use common::*;
use proptest::prelude::*;
use tconf::{Array, Document, Entry, Value};

fn roundtrip(doc: &Document) -> bool {
    let registry = registry();
    match registry.generator().generate(doc) {
        Ok(text) => match registry.parser().parse(&text) {
            Ok(parsed) => {
                if parsed != *doc {
                    eprintln!("Generated text was: {}", text);
                }
                parsed == *doc
            }
            Err(e) => {
                eprintln!("Parse failed: {}", e);
                eprintln!("Generated text was: {}", text);
                false
            }
        },
        Err(e) => {
            eprintln!("Generate failed: {}", e);
            false
        }
    }
}

fn key_component() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,8}"
}

fn key_path() -> impl Strategy<Value = String> {
    prop::collection::vec(key_component(), 1..4).prop_map(|components| components.join("."))
}

fn single_line_string() -> impl Strategy<Value = String> {
    "[^\r\n]{0,24}"
}

fn finite_float() -> impl Strategy<Value = f32> {
    prop::num::f32::NORMAL | prop::num::f32::ZERO
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0..=i32::MAX).prop_map(Value::Int),
        finite_float().prop_map(|f| Value::Float(f.abs())),
        any::<bool>().prop_map(Value::Bool),
        single_line_string().prop_map(Value::String),
    ]
}

fn array() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::collection::vec(any::<i32>(), 0..6).prop_map(|v| Value::Array(Array::of_ints(v))),
        prop::collection::vec(finite_float(), 0..6).prop_map(|v| Value::Array(Array::of_floats(v))),
        prop::collection::vec(any::<bool>(), 0..6).prop_map(|v| Value::Array(Array::of_bools(v))),
        prop::collection::vec(single_line_string(), 0..6)
            .prop_map(|v| Value::Array(Array::of_strings(v))),
    ]
}

fn object() -> impl Strategy<Value = Value> {
    (0..=i32::MAX, finite_float(), single_line_string())
        .prop_map(|(i, f, s)| very_cool_object(i, f.abs(), &s))
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![4 => scalar(), 2 => array(), 1 => object()]
}

fn comment() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-zA-Z0-9][a-zA-Z0-9 ,.!?']{0,30}[a-zA-Z0-9.!?]"]
}

/// Documents whose keys never use a valued key as a block prefix.
fn document() -> impl Strategy<Value = Document> {
    prop::collection::vec((key_path(), comment(), value()), 0..12).prop_map(|entries| {
        let mut doc = Document::new();
        for (key, comment, value) in entries {
            let clashes = doc.keys().any(|existing| {
                existing.starts_with(&format!("{}.", key)) || key.starts_with(&format!("{}.", existing))
            });
            if !clashes {
                doc.insert(key, Entry::commented(comment, value));
            }
        }
        doc
    })
}

proptest! {
    #[test]
    fn prop_document_roundtrip(doc in document()) {
        prop_assert!(roundtrip(&doc));
    }

    #[test]
    fn prop_int_roundtrip(n in 0..=i32::MAX) {
        let mut doc = Document::new();
        doc.insert_value("n", n);
        prop_assert!(roundtrip(&doc));
    }

    #[test]
    fn prop_float_roundtrip(f in finite_float()) {
        let mut doc = Document::new();
        doc.insert_value("f", f.abs());
        prop_assert!(roundtrip(&doc));
    }

    #[test]
    fn prop_signed_arrays_roundtrip(ints in prop::collection::vec(any::<i32>(), 0..20)) {
        let mut doc = Document::new();
        doc.insert_value("ints", ints);
        prop_assert!(roundtrip(&doc));
    }

    #[test]
    fn prop_string_roundtrip(s in single_line_string()) {
        let mut doc = Document::new();
        doc.insert_commented("s", "text", s);
        prop_assert!(roundtrip(&doc));
    }

    #[test]
    fn prop_parse_never_panics(text in "[ a-z0-9=:#\\[\\]{}\"T.\n]{0,200}") {
        let _ = registry().parser().parse(&text);
    }
}
