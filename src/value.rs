//! Value model for configuration entries.
//!
//! This module provides the [`Value`] enum, the typed [`Array`] container and
//! the opaque [`ObjectValue`] produced by registered serializers.
//!
//! ## Core Types
//!
//! - [`Value`]: null, string, int, float, boolean, array or object
//! - [`Array`]: an ordered, homogeneous sequence tagged with its element type
//! - [`ObjectValue`]: a native Rust value tagged with the type name its
//!   serializer is registered under
//! - [`FieldMap`]: the flat, ordered map an object is decomposed into
//!
//! ## Creating Values
//!
//! ```rust
//! use tconf::{Array, Value};
//!
//! let text = Value::from("hello");
//! let port = Value::from(8080);
//! let ratio = Value::from(0.5f32);
//! let ports = Value::from(vec![80, 443]);
//!
//! assert_eq!(port.type_name(), "int");
//! assert_eq!(ports, Value::Array(Array::of_ints([80, 443])));
//! ```
//!
//! ## Extracting Values
//!
//! ```rust
//! use tconf::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(vec!["a", "b"]);
//! let strings: Vec<String> = Vec::try_from(value).unwrap();
//! assert_eq!(strings, vec!["a", "b"]);
//! ```

use crate::format::{BOOLEAN_TYPE, FLOAT_TYPE, INT_TYPE, STRING_TYPE};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;

/// The flat, ordered field map exchanged with object serializers.
pub type FieldMap = IndexMap<String, Value>;

/// Any value an entry, array element or object field can hold.
///
/// `Null` only appears as the value of a block header entry; it has no
/// textual literal.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Int(i32),
    Float(f32),
    Bool(bool),
    Array(Array),
    Object(ObjectValue),
}

impl Value {
    /// Wraps a native value as an object of the given registered type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::Value;
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct Point { x: i32, y: i32 }
    ///
    /// let value = Value::object("geo.Point", Point { x: 1, y: 2 });
    /// assert_eq!(value.type_name(), "geo.Point");
    /// ```
    pub fn object<T: NativeObject>(type_name: impl Into<String>, native: T) -> Self {
        Value::Object(ObjectValue::new(type_name, native))
    }

    /// The type name used in `T<type>` prefixes: one of the primitive names,
    /// the element type of an array, or an object's registered type name.
    ///
    /// `Null` reports `"null"`, which is never a valid element type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::String(_) => STRING_TYPE,
            Value::Int(_) => INT_TYPE,
            Value::Float(_) => FLOAT_TYPE,
            Value::Bool(_) => BOOLEAN_TYPE,
            Value::Array(array) => &array.element_type,
            Value::Object(object) => &object.type_name,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` for strings, ints, floats and booleans.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::String(_) | Value::Int(_) | Value::Float(_) | Value::Bool(_)
        )
    }

    /// If the value is a string, returns it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::Value;
    ///
    /// assert_eq!(Value::from("hi").as_str(), Some("hi"));
    /// assert_eq!(Value::from(1).as_str(), None);
    /// ```
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Array(array) => write!(f, "T{} [{} elements]", array.element_type, array.len()),
            Value::Object(object) => write!(f, "T{} {{..}}", object.type_name),
        }
    }
}

/// A homogeneous array tagged with its element type name.
///
/// # Examples
///
/// ```rust
/// use tconf::{Array, Value};
///
/// let mut array = Array::new("int");
/// array.push(Value::Int(1)).unwrap();
/// assert!(array.push(Value::from("two")).is_err());
/// assert_eq!(array.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Array {
    pub element_type: String,
    pub elements: Vec<Value>,
}

impl Array {
    /// Creates an empty array of the given element type.
    pub fn new(element_type: impl Into<String>) -> Self {
        Array {
            element_type: element_type.into(),
            elements: Vec::new(),
        }
    }

    pub fn of_ints(values: impl IntoIterator<Item = i32>) -> Self {
        Array {
            element_type: INT_TYPE.to_string(),
            elements: values.into_iter().map(Value::Int).collect(),
        }
    }

    pub fn of_floats(values: impl IntoIterator<Item = f32>) -> Self {
        Array {
            element_type: FLOAT_TYPE.to_string(),
            elements: values.into_iter().map(Value::Float).collect(),
        }
    }

    pub fn of_bools(values: impl IntoIterator<Item = bool>) -> Self {
        Array {
            element_type: BOOLEAN_TYPE.to_string(),
            elements: values.into_iter().map(Value::Bool).collect(),
        }
    }

    pub fn of_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Array {
            element_type: STRING_TYPE.to_string(),
            elements: values.into_iter().map(|s| Value::String(s.into())).collect(),
        }
    }

    /// Creates an array of objects of one registered type.
    ///
    /// Fails with [`Error::TypeMismatch`] if any object carries another type name.
    pub fn of_objects(
        type_name: impl Into<String>,
        objects: impl IntoIterator<Item = ObjectValue>,
    ) -> Result<Self> {
        let mut array = Array::new(type_name);
        for object in objects {
            array.push(Value::Object(object))?;
        }
        Ok(array)
    }

    /// Appends an element, rejecting one whose type differs from the element type.
    pub fn push(&mut self, value: Value) -> Result<()> {
        if value.is_array() {
            return Err(Error::unsupported_type("array of arrays not supported"));
        }
        if value.type_name() != self.element_type {
            return Err(Error::type_mismatch(&self.element_type, value.type_name()));
        }
        self.elements.push(value);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }
}

/// A native value that can live inside an [`ObjectValue`].
///
/// Implemented for every `Clone + PartialEq + Debug + Send + Sync` type, so
/// user types only need the usual derives.
pub trait NativeObject: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn clone_native(&self) -> Box<dyn NativeObject>;
    fn eq_native(&self, other: &dyn NativeObject) -> bool;
    /// The Rust type name, for diagnostics.
    fn native_type_name(&self) -> &'static str;
}

impl<T> NativeObject for T
where
    T: Any + Clone + PartialEq + fmt::Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_native(&self) -> Box<dyn NativeObject> {
        Box::new(self.clone())
    }

    fn eq_native(&self, other: &dyn NativeObject) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn native_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// An opaque object value: a native Rust value plus the type name its
/// serializer is registered under.
///
/// The parser and generator never look inside `native`; only the registered
/// serializer does.
#[derive(Debug)]
pub struct ObjectValue {
    pub type_name: String,
    native: Box<dyn NativeObject>,
}

impl ObjectValue {
    pub fn new<T: NativeObject>(type_name: impl Into<String>, native: T) -> Self {
        ObjectValue {
            type_name: type_name.into(),
            native: Box::new(native),
        }
    }

    /// Wraps an already boxed native value, as returned by a serializer.
    pub fn from_boxed(type_name: impl Into<String>, native: Box<dyn NativeObject>) -> Self {
        ObjectValue {
            type_name: type_name.into(),
            native,
        }
    }

    #[must_use]
    pub fn native(&self) -> &dyn NativeObject {
        self.native.as_ref()
    }

    /// Borrows the native value as `T`, if that is its concrete type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::ObjectValue;
    ///
    /// let object = ObjectValue::new("app.Port", 8080u16);
    /// assert_eq!(object.downcast_ref::<u16>(), Some(&8080));
    /// assert_eq!(object.downcast_ref::<String>(), None);
    /// ```
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.native.as_any().downcast_ref::<T>()
    }
}

impl Clone for ObjectValue {
    fn clone(&self) -> Self {
        ObjectValue {
            type_name: self.type_name.clone(),
            native: self.native.clone_native(),
        }
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.native.eq_native(other.native.as_ref())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<ObjectValue> for Value {
    fn from(value: ObjectValue) -> Self {
        Value::Object(value)
    }
}

impl From<Vec<i32>> for Value {
    fn from(value: Vec<i32>) -> Self {
        Value::Array(Array::of_ints(value))
    }
}

impl From<Vec<f32>> for Value {
    fn from(value: Vec<f32>) -> Self {
        Value::Array(Array::of_floats(value))
    }
}

impl From<Vec<bool>> for Value {
    fn from(value: Vec<bool>) -> Self {
        Value::Array(Array::of_bools(value))
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::Array(Array::of_strings(value))
    }
}

impl From<Vec<&str>> for Value {
    fn from(value: Vec<&str>) -> Self {
        Value::Array(Array::of_strings(value))
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::type_mismatch(BOOLEAN_TYPE, other.type_name())),
        }
    }
}

impl TryFrom<Value> for i32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(Error::type_mismatch(INT_TYPE, other.type_name())),
        }
    }
}

impl TryFrom<Value> for f32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            other => Err(Error::type_mismatch(FLOAT_TYPE, other.type_name())),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::type_mismatch(STRING_TYPE, other.type_name())),
        }
    }
}

fn try_from_array<T>(value: Value, element_type: &str) -> Result<Vec<T>>
where
    T: TryFrom<Value, Error = Error>,
{
    match value {
        Value::Array(array) if array.element_type == element_type => {
            array.elements.into_iter().map(T::try_from).collect()
        }
        other => Err(Error::type_mismatch(
            &format!("array of {}", element_type),
            other.type_name(),
        )),
    }
}

impl TryFrom<Value> for Vec<i32> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        try_from_array(value, INT_TYPE)
    }
}

impl TryFrom<Value> for Vec<f32> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        try_from_array(value, FLOAT_TYPE)
    }
}

impl TryFrom<Value> for Vec<bool> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        try_from_array(value, BOOLEAN_TYPE)
    }
}

impl TryFrom<Value> for Vec<String> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        try_from_array(value, STRING_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::from("a").type_name(), "string");
        assert_eq!(Value::from(1).type_name(), "int");
        assert_eq!(Value::from(1.5f32).type_name(), "float");
        assert_eq!(Value::from(true).type_name(), "boolean");
        assert_eq!(Value::from(vec![true]).type_name(), "boolean");
        assert_eq!(Value::object("geo.Point", Point { x: 0, y: 0 }).type_name(), "geo.Point");
    }

    #[test]
    fn test_object_equality_uses_native_value() {
        let a = ObjectValue::new("geo.Point", Point { x: 1, y: 2 });
        let b = ObjectValue::new("geo.Point", Point { x: 1, y: 2 });
        let c = ObjectValue::new("geo.Point", Point { x: 2, y: 1 });
        let d = ObjectValue::new("geo.Other", Point { x: 1, y: 2 });

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_ne!(a, ObjectValue::new("geo.Point", 12i32));
    }

    #[test]
    fn test_object_clone_is_deep() {
        let a = ObjectValue::new("geo.Point", Point { x: 1, y: 2 });
        let b = a.clone();
        assert_eq!(b.downcast_ref::<Point>(), Some(&Point { x: 1, y: 2 }));
        assert_eq!(a, b);
    }

    #[test]
    fn test_array_push_rejects_mixed_types() {
        let mut array = Array::new("string");
        array.push(Value::from("a")).unwrap();

        let err = array.push(Value::from(1)).unwrap_err();
        assert_eq!(err, Error::type_mismatch("string", "int"));

        let err = array.push(Value::from(vec!["nested"])).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn test_of_objects() {
        let objects = vec![
            ObjectValue::new("geo.Point", Point { x: 1, y: 2 }),
            ObjectValue::new("geo.Point", Point { x: 3, y: 4 }),
        ];
        let array = Array::of_objects("geo.Point", objects).unwrap();
        assert_eq!(array.len(), 2);

        let mixed = vec![ObjectValue::new("geo.Line", Point { x: 1, y: 2 })];
        assert!(Array::of_objects("geo.Point", mixed).is_err());
    }

    #[test]
    fn test_try_from_arrays() {
        let ints: Vec<i32> = Vec::try_from(Value::from(vec![1, 2, 3])).unwrap();
        assert_eq!(ints, vec![1, 2, 3]);

        let err = Vec::<i32>::try_from(Value::from(vec![1.0f32])).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));

        assert_eq!(bool::try_from(Value::Bool(true)), Ok(true));
        assert!(String::try_from(Value::Int(3)).is_err());
    }
}
