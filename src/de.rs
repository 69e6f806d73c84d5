//! Serde deserialization from field maps and documents.
//!
//! The inverse of [`ser`](crate::ser):
//!
//! - [`from_fields`] builds a value from the flat field map of one object
//! - [`from_document`] rebuilds the block tree from dotted key paths first,
//!   so nested structs match nested blocks
//!
//! Ints are accepted where floats are expected. Object values cannot be
//! deserialized through serde; read them from the [`Document`] directly.
//!
//! ```rust
//! use serde::Deserialize;
//! use tconf::{de::from_document, Document};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Server { host: String, port: u16 }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config { server: Server, verbose: Option<bool> }
//!
//! let mut doc = Document::new();
//! doc.insert_value("server.host", "localhost");
//! doc.insert_value("server.port", 8080);
//!
//! let config: Config = from_document(doc).unwrap();
//! assert_eq!(config.server.port, 8080);
//! assert_eq!(config.verbose, None);
//! ```

use crate::format::KEY_SEPARATOR;
use crate::{Document, Error, FieldMap, Result, Value};
use indexmap::IndexMap;
use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Deserializes `T` from the flat field map of one object.
pub fn from_fields<T>(fields: FieldMap) -> Result<T>
where
    T: DeserializeOwned,
{
    let section = fields
        .into_iter()
        .map(|(key, value)| (key, Node::Value(value)))
        .collect();
    T::deserialize(NodeDeserializer::new(Node::Section(section)))
}

/// Deserializes `T` from a document, treating dotted keys as nested blocks.
///
/// Comments are ignored. A [`Value::Null`] header entry creates an empty
/// section, so a struct with no fields can be read back.
///
/// # Errors
///
/// Fails when a key is used both as a value and as a block, or when the
/// values do not match the shape of `T`.
pub fn from_document<T>(document: Document) -> Result<T>
where
    T: DeserializeOwned,
{
    let root = build_tree(document)?;
    T::deserialize(NodeDeserializer::new(Node::Section(root)))
}

/// A value, or a block of further nodes.
#[derive(Debug)]
enum Node {
    Value(Value),
    Section(IndexMap<String, Node>),
}

fn build_tree(document: Document) -> Result<IndexMap<String, Node>> {
    let mut root = IndexMap::new();

    for (key, entry) in document {
        let components: Vec<&str> = key.split(KEY_SEPARATOR).collect();
        let (name, parents) = match components.split_last() {
            Some(split) => split,
            None => continue,
        };

        let mut section = &mut root;
        for parent in parents {
            section = match section
                .entry((*parent).to_string())
                .or_insert_with(|| Node::Section(IndexMap::new()))
            {
                Node::Section(inner) => inner,
                Node::Value(_) => return Err(conflict(&key)),
            };
        }

        if entry.is_block() {
            match section
                .entry((*name).to_string())
                .or_insert_with(|| Node::Section(IndexMap::new()))
            {
                Node::Section(_) => {}
                Node::Value(_) => return Err(conflict(&key)),
            }
        } else {
            if let Some(Node::Section(_)) = section.get(*name) {
                return Err(conflict(&key));
            }
            section.insert((*name).to_string(), Node::Value(entry.value));
        }
    }

    Ok(root)
}

fn conflict(key: &str) -> Error {
    Error::custom(format!("key '{}' is used both as a value and as a block", key))
}

struct NodeDeserializer {
    node: Node,
}

impl NodeDeserializer {
    fn new(node: Node) -> Self {
        NodeDeserializer { node }
    }
}

impl<'de> de::Deserializer<'de> for NodeDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.node {
            Node::Section(section) => visitor.visit_map(MapDeserializer::new(section)),
            Node::Value(value) => ValueDeserializer::new(value).deserialize_any(visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.node {
            Node::Value(Value::Null) => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.node {
            Node::Value(value) => ValueDeserializer::new(value).deserialize_enum(name, variants, visitor),
            Node::Section(_) => Err(Error::unsupported_type("enum variants with fields")),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Node>,
    node: Option<Node>,
}

impl MapDeserializer {
    fn new(section: IndexMap<String, Node>) -> Self {
        MapDeserializer {
            iter: section.into_iter(),
            node: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, node)) => {
                self.node = Some(node);
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.node.take() {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(i) => visitor.visit_i32(i),
            Value::Float(f) => visitor.visit_f32(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(array) => visitor.visit_seq(SeqDeserializer::new(array.elements)),
            Value::Object(object) => Err(Error::unsupported_type(&format!(
                "object of type '{}' cannot be deserialized through serde",
                object.type_name
            ))),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(variant.into_deserializer()),
            other => Err(Error::type_mismatch("unit variant name", other.type_name())),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}
