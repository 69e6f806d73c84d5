//! Registering serializers for user-defined object types.
//!
//! Run with: cargo run --example custom_objects

use serde::{Deserialize, Serialize};
use std::error::Error;
use tconf::{take_field, Array, Document, FieldMap, ObjectValue, Registry, TypedSerializer, Value};

/// Handled by a hand-written serializer.
#[derive(Clone, Debug, PartialEq)]
struct Color {
    red: i32,
    green: i32,
    blue: i32,
}

struct ColorSerializer;

impl TypedSerializer for ColorSerializer {
    type Native = Color;

    fn deserialize(&self, mut fields: FieldMap) -> tconf::Result<Color> {
        Ok(Color {
            red: take_field(&mut fields, "red")?,
            green: take_field(&mut fields, "green")?,
            blue: take_field(&mut fields, "blue")?,
        })
    }

    fn serialize(&self, color: &Color, fields: &mut FieldMap) -> tconf::Result<()> {
        fields.insert("red".to_string(), Value::from(color.red));
        fields.insert("green".to_string(), Value::from(color.green));
        fields.insert("blue".to_string(), Value::from(color.blue));
        Ok(())
    }
}

/// Handled through serde.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Font {
    family: String,
    size: f32,
    bold: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut registry = Registry::new();
    registry
        .register_typed("theme.Color", ColorSerializer)
        .register_serde::<Font>("theme.Font");

    let palette = [
        Color { red: 255, green: 0, blue: 0 },
        Color { red: 0, green: 128, blue: 255 },
    ];

    let mut doc = Document::new();
    doc.insert_block("theme", "Editor theme");
    doc.insert_commented(
        "theme.font",
        "Main editor font",
        Value::object(
            "theme.Font",
            Font {
                family: "Fira Code".to_string(),
                size: 13.5,
                bold: false,
            },
        ),
    );
    doc.insert_value(
        "theme.palette",
        Array::of_objects(
            "theme.Color",
            palette.iter().cloned().map(|c| ObjectValue::new("theme.Color", c)),
        )?,
    );

    let text = registry.generator().generate(&doc)?;
    println!("{}", text);

    let parsed = registry.parser().parse(&text)?;
    let colors: Vec<&Color> = parsed
        .get_value("theme.palette")
        .and_then(Value::as_array)
        .map(|array| {
            array
                .iter()
                .filter_map(|v| v.as_object()?.downcast_ref::<Color>())
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(colors.len(), palette.len());
    println!("✓ parsed {} colors, first is {:?}", colors.len(), colors[0]);

    Ok(())
}
