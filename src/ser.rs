//! Serde serialization into field maps and documents.
//!
//! A serde value is first serialized into an intermediate [`Node`] tree,
//! which is then flattened:
//!
//! - [`to_fields`] for the flat field map of one object (used by
//!   [`SerdeSerializer`](crate::SerdeSerializer))
//! - [`to_document`] for a whole document, where nested structs and maps
//!   become dotted key paths introduced by block header entries
//!
//! ## Type mapping
//!
//! | Rust                         | Value                              |
//! |------------------------------|------------------------------------|
//! | `bool`                       | `Bool`                             |
//! | integers fitting in `i32`    | `Int`, out of range is an error    |
//! | `f32`, `f64`                 | `Float` (`f64` is narrowed)        |
//! | `char`, `String`, `&str`     | `String`                           |
//! | unit enum variants           | `String` holding the variant name  |
//! | `Vec<T>`, tuples, `[T; N]`   | `Array` of one primitive type      |
//! | structs, string-keyed maps   | blocks in a document               |
//! | `None`, `()`                 | omitted                            |
//!
//! ```rust
//! use serde::Serialize;
//! use tconf::{ser::to_document, Value};
//!
//! #[derive(Serialize)]
//! struct Server { host: String, port: u16 }
//!
//! #[derive(Serialize)]
//! struct Config { name: String, server: Server }
//!
//! let config = Config {
//!     name: "demo".to_string(),
//!     server: Server { host: "localhost".to_string(), port: 8080 },
//! };
//!
//! let doc = to_document(&config).unwrap();
//! assert!(doc.get("server").unwrap().is_block());
//! assert_eq!(doc.get_value("server.port"), Some(&Value::Int(8080)));
//! ```

use crate::format::{KEY_SEPARATOR, STRING_TYPE};
use crate::{Array, Document, Error, FieldMap, Result, Value};
use indexmap::IndexMap;
use serde::ser::{self, Serialize};

/// Serializes `value` into the flat field map of one object.
///
/// `value` must serialize as a struct or a string-keyed map. Nested structs
/// are rejected since an object body can only hold typed values.
pub fn to_fields<T>(value: &T) -> Result<FieldMap>
where
    T: Serialize + ?Sized,
{
    let entries = into_map(value.serialize(NodeSerializer)?)?;

    let mut fields = FieldMap::with_capacity(entries.len());
    for (key, node) in entries {
        if let Some(value) = into_value(&key, node)? {
            fields.insert(key, value);
        }
    }
    Ok(fields)
}

/// Serializes `value` into a document.
///
/// Every nested struct or map becomes a block: a [`Value::Null`] header entry
/// followed by the entries of its fields.
pub fn to_document<T>(value: &T) -> Result<Document>
where
    T: Serialize + ?Sized,
{
    let entries = into_map(value.serialize(NodeSerializer)?)?;

    let mut document = Document::new();
    flatten(&mut document, None, entries)?;
    tracing::trace!(entries = document.len(), "serialized document");
    Ok(document)
}

fn flatten(document: &mut Document, prefix: Option<&str>, entries: IndexMap<String, Node>) -> Result<()> {
    for (key, node) in entries {
        let path = match prefix {
            Some(prefix) => format!("{}{}{}", prefix, KEY_SEPARATOR, key),
            None => key,
        };
        match node {
            Node::Map(inner) => {
                document.insert_block(path.clone(), "");
                flatten(document, Some(&path), inner)?;
            }
            node => {
                if let Some(value) = into_value(&path, node)? {
                    document.insert_value(path, value);
                }
            }
        }
    }
    Ok(())
}

fn into_map(node: Node) -> Result<IndexMap<String, Node>> {
    match node {
        Node::Map(map) => Ok(map),
        _ => Err(Error::unsupported_type("top level must be a struct or a map")),
    }
}

/// Converts a leaf node into a value; `None` for omitted fields.
fn into_value(key: &str, node: Node) -> Result<Option<Value>> {
    match node {
        Node::None => Ok(None),
        Node::Scalar(value) => Ok(Some(value)),
        Node::Seq(elements) => into_array(key, elements).map(|array| Some(Value::Array(array))),
        Node::Map(_) => Err(Error::unsupported_type(&format!(
            "nested struct '{}' inside an object",
            key
        ))),
    }
}

fn into_array(key: &str, elements: Vec<Node>) -> Result<Array> {
    let mut values = Vec::with_capacity(elements.len());
    for element in elements {
        match element {
            Node::Scalar(value) => values.push(value),
            Node::Seq(_) => return Err(Error::unsupported_type("array of arrays not supported")),
            Node::None => {
                return Err(Error::unsupported_type(&format!("null element in array '{}'", key)))
            }
            Node::Map(_) => {
                return Err(Error::unsupported_type(&format!(
                    "struct element in array '{}'; register a serializer for it instead",
                    key
                )))
            }
        }
    }

    // An empty sequence has no element to take the type from.
    let element_type = values.first().map_or(STRING_TYPE, Value::type_name).to_string();
    let mut array = Array::new(element_type);
    for value in values {
        array.push(value)?;
    }
    Ok(array)
}

/// Intermediate tree built by [`NodeSerializer`].
#[derive(Debug)]
enum Node {
    None,
    Scalar(Value),
    Seq(Vec<Node>),
    Map(IndexMap<String, Node>),
}

struct NodeSerializer;

struct SerializeVec {
    vec: Vec<Node>,
}

struct SerializeMap {
    map: IndexMap<String, Node>,
    current_key: Option<String>,
}

fn int<T>(v: T) -> Result<Node>
where
    T: Copy + std::fmt::Display,
    i32: TryFrom<T>,
{
    i32::try_from(v)
        .map(|i| Node::Scalar(Value::Int(i)))
        .map_err(|_| Error::custom(format!("integer {} does not fit in an int", v)))
}

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = ser::Impossible<Node, Error>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = ser::Impossible<Node, Error>;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        Ok(Node::Scalar(Value::Bool(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        Ok(Node::Scalar(Value::Int(i32::from(v))))
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        Ok(Node::Scalar(Value::Int(i32::from(v))))
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        Ok(Node::Scalar(Value::Int(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        int(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        Ok(Node::Scalar(Value::Int(i32::from(v))))
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        Ok(Node::Scalar(Value::Int(i32::from(v))))
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        int(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        int(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        Ok(Node::Scalar(Value::Float(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        Ok(Node::Scalar(Value::Float(v as f32)))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        Ok(Node::Scalar(Value::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        Ok(Node::Scalar(Value::String(v.to_string())))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node> {
        let vec = v
            .iter()
            .map(|&b| Node::Scalar(Value::Int(i32::from(b))))
            .collect();
        Ok(Node::Seq(vec))
    }

    fn serialize_none(self) -> Result<Node> {
        Ok(Node::None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node> {
        Ok(Node::None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node> {
        Ok(Node::None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        Ok(Node::Scalar(Value::String(variant.to_string())))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type("newtype variants"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type("struct variants"))
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(value.serialize(NodeSerializer)?);
        Ok(())
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: IndexMap::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Seq(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Seq(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Seq(self.vec))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(NodeSerializer)? {
            Node::Scalar(Value::String(s)) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(Error::custom("map keys must be strings")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Map(self.map))
    }
}
