//! Object types and serializers shared by the integration tests.

#![allow(dead_code)]

use tconf::{take_field, Error, FieldMap, Registry, Result, TypedSerializer, Value};

pub const VERY_COOL_OBJECT: &str = "pkg.VeryCoolObject";
pub const VERY_COOL_OBJECT_WITH_ARRAY: &str = "pkg.VeryCoolObjectWithArray";
pub const VERY_COOL_OBJECT_WITH_OBJECT: &str = "pkg.VeryCoolObjectWithObject";

#[derive(Clone, Debug, PartialEq)]
pub struct VeryCoolObject {
    pub an_integer: i32,
    pub a_float: f32,
    pub a_true_boolean: bool,
    pub a_false_boolean: bool,
    pub a_string: String,
}

impl VeryCoolObject {
    pub fn new(an_integer: i32, a_float: f32, a_string: &str) -> Self {
        VeryCoolObject {
            an_integer,
            a_float,
            a_true_boolean: true,
            a_false_boolean: false,
            a_string: a_string.to_string(),
        }
    }
}

pub struct VeryCoolObjectSerializer;

impl TypedSerializer for VeryCoolObjectSerializer {
    type Native = VeryCoolObject;

    fn deserialize(&self, mut fields: FieldMap) -> Result<VeryCoolObject> {
        Ok(VeryCoolObject {
            an_integer: take_field(&mut fields, "anInteger")?,
            a_float: take_field(&mut fields, "aFloat")?,
            a_true_boolean: take_field(&mut fields, "aTrueBoolean")?,
            a_false_boolean: take_field(&mut fields, "aFalseBoolean")?,
            a_string: take_field(&mut fields, "aString")?,
        })
    }

    fn serialize(&self, value: &VeryCoolObject, fields: &mut FieldMap) -> Result<()> {
        fields.insert("anInteger".to_string(), Value::from(value.an_integer));
        fields.insert("aFloat".to_string(), Value::from(value.a_float));
        fields.insert("aTrueBoolean".to_string(), Value::from(value.a_true_boolean));
        fields.insert("aFalseBoolean".to_string(), Value::from(value.a_false_boolean));
        fields.insert("aString".to_string(), Value::from(value.a_string.as_str()));
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VeryCoolObjectWithArray {
    pub first_array: Vec<i32>,
    pub second_array: Vec<String>,
}

impl VeryCoolObjectWithArray {
    pub fn new(first_array: &[i32], second_array: &[&str]) -> Self {
        VeryCoolObjectWithArray {
            first_array: first_array.to_vec(),
            second_array: second_array.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub struct VeryCoolObjectWithArraySerializer;

impl TypedSerializer for VeryCoolObjectWithArraySerializer {
    type Native = VeryCoolObjectWithArray;

    fn deserialize(&self, mut fields: FieldMap) -> Result<VeryCoolObjectWithArray> {
        Ok(VeryCoolObjectWithArray {
            first_array: take_field(&mut fields, "firstArray")?,
            second_array: take_field(&mut fields, "secondArray")?,
        })
    }

    fn serialize(&self, value: &VeryCoolObjectWithArray, fields: &mut FieldMap) -> Result<()> {
        fields.insert("firstArray".to_string(), Value::from(value.first_array.clone()));
        fields.insert("secondArray".to_string(), Value::from(value.second_array.clone()));
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VeryCoolObjectWithObject {
    pub an_integer: i32,
    pub cool_object: VeryCoolObjectWithArray,
}

pub struct VeryCoolObjectWithObjectSerializer;

impl TypedSerializer for VeryCoolObjectWithObjectSerializer {
    type Native = VeryCoolObjectWithObject;

    fn deserialize(&self, mut fields: FieldMap) -> Result<VeryCoolObjectWithObject> {
        let an_integer = take_field(&mut fields, "anInteger")?;
        let cool_object = match fields.shift_remove("coolObject") {
            Some(Value::Object(object)) => object
                .downcast_ref::<VeryCoolObjectWithArray>()
                .cloned()
                .ok_or_else(|| Error::type_mismatch(VERY_COOL_OBJECT_WITH_ARRAY, &object.type_name))?,
            Some(other) => {
                return Err(Error::type_mismatch(VERY_COOL_OBJECT_WITH_ARRAY, other.type_name()))
            }
            None => return Err(Error::custom("missing field 'coolObject'")),
        };

        Ok(VeryCoolObjectWithObject {
            an_integer,
            cool_object,
        })
    }

    fn serialize(&self, value: &VeryCoolObjectWithObject, fields: &mut FieldMap) -> Result<()> {
        fields.insert("anInteger".to_string(), Value::from(value.an_integer));
        fields.insert(
            "coolObject".to_string(),
            Value::object(VERY_COOL_OBJECT_WITH_ARRAY, value.cool_object.clone()),
        );
        Ok(())
    }
}

/// A registry with every fixture serializer.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_typed(VERY_COOL_OBJECT, VeryCoolObjectSerializer)
        .register_typed(VERY_COOL_OBJECT_WITH_ARRAY, VeryCoolObjectWithArraySerializer)
        .register_typed(VERY_COOL_OBJECT_WITH_OBJECT, VeryCoolObjectWithObjectSerializer);
    registry
}

pub fn very_cool_object(an_integer: i32, a_float: f32, a_string: &str) -> Value {
    Value::object(VERY_COOL_OBJECT, VeryCoolObject::new(an_integer, a_float, a_string))
}

/// Strips the leading newline of a raw string literal.
pub fn text(raw: &str) -> String {
    raw.strip_prefix('\n').unwrap_or(raw).to_string()
}
