//! The serializer registry.
//!
//! Object values are opaque to the parser and generator. Each object type is
//! handled by a serializer registered under its type name, which converts
//! between the native value and a flat [`FieldMap`].
//!
//! There are three ways to provide a serializer:
//!
//! - implement [`ObjectSerializer`] directly (untyped, works on `dyn NativeObject`)
//! - implement [`TypedSerializer`] for one native type and let the registry do
//!   the runtime type check
//! - call [`Registry::register_serde`] for a `Serialize + Deserialize` struct
//!
//! ## Examples
//!
//! ```rust
//! use tconf::{FieldMap, Registry, Result, TypedSerializer, Value};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! struct PointSerializer;
//!
//! impl TypedSerializer for PointSerializer {
//!     type Native = Point;
//!
//!     fn deserialize(&self, mut fields: FieldMap) -> Result<Point> {
//!         Ok(Point {
//!             x: tconf::take_field(&mut fields, "x")?,
//!             y: tconf::take_field(&mut fields, "y")?,
//!         })
//!     }
//!
//!     fn serialize(&self, point: &Point, fields: &mut FieldMap) -> Result<()> {
//!         fields.insert("x".to_string(), Value::from(point.x));
//!         fields.insert("y".to_string(), Value::from(point.y));
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register_typed("geo.Point", PointSerializer);
//!
//! let text = "origin = Tgeo.Point {\n    x = 0\n    y = 0\n}\n";
//! let doc = tconf::parse(text, &registry).unwrap();
//! let origin = doc.get_value("origin").and_then(Value::as_object).unwrap();
//! assert_eq!(origin.downcast_ref::<Point>(), Some(&Point { x: 0, y: 0 }));
//! ```

use crate::{Error, FieldMap, FormatOptions, Generator, NativeObject, Parser, Result, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Converts between one native object type and its flat field map.
///
/// This is the object-safe form stored in the registry.
pub trait ObjectSerializer: Send + Sync {
    /// Builds a native value from the fields parsed out of an object body.
    fn deserialize(&self, fields: FieldMap) -> Result<Box<dyn NativeObject>>;

    /// Decomposes a native value into fields, in the order they should be written.
    fn serialize(&self, native: &dyn NativeObject) -> Result<FieldMap>;
}

/// A serializer for one concrete native type.
///
/// The registry checks the runtime type of every value before calling
/// [`TypedSerializer::serialize`], reporting [`Error::TypeMismatch`] when a
/// value of another type is stored under this serializer's type name.
pub trait TypedSerializer: Send + Sync + 'static {
    type Native: NativeObject;

    fn deserialize(&self, fields: FieldMap) -> Result<Self::Native>;

    fn serialize(&self, value: &Self::Native, fields: &mut FieldMap) -> Result<()>;
}

struct Typed<S>(S);

impl<S: TypedSerializer> ObjectSerializer for Typed<S> {
    fn deserialize(&self, fields: FieldMap) -> Result<Box<dyn NativeObject>> {
        Ok(Box::new(self.0.deserialize(fields)?))
    }

    fn serialize(&self, native: &dyn NativeObject) -> Result<FieldMap> {
        let value = native
            .as_any()
            .downcast_ref::<S::Native>()
            .ok_or_else(|| {
                Error::type_mismatch(std::any::type_name::<S::Native>(), native.native_type_name())
            })?;
        let mut fields = FieldMap::new();
        self.0.serialize(value, &mut fields)?;
        Ok(fields)
    }
}

/// A [`TypedSerializer`] backed by serde.
///
/// Supports structs whose fields are primitives, `Option`s, unit enum
/// variants, or sequences of primitives. Nested structs are not supported
/// inside objects; write a [`TypedSerializer`] that stores them as nested
/// [`Value::Object`]s instead.
pub struct SerdeSerializer<T>(PhantomData<fn() -> T>);

impl<T> SerdeSerializer<T> {
    #[must_use]
    pub fn new() -> Self {
        SerdeSerializer(PhantomData)
    }
}

impl<T> Default for SerdeSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypedSerializer for SerdeSerializer<T>
where
    T: Serialize + DeserializeOwned + NativeObject,
{
    type Native = T;

    fn deserialize(&self, fields: FieldMap) -> Result<T> {
        crate::de::from_fields(fields)
    }

    fn serialize(&self, value: &T, fields: &mut FieldMap) -> Result<()> {
        fields.extend(crate::ser::to_fields(value)?);
        Ok(())
    }
}

/// Removes a field from a field map and converts it, for use in
/// [`TypedSerializer::deserialize`] implementations.
///
/// # Examples
///
/// ```rust
/// use tconf::{take_field, FieldMap, Value};
///
/// let mut fields = FieldMap::new();
/// fields.insert("port".to_string(), Value::Int(8080));
///
/// let port: i32 = take_field(&mut fields, "port").unwrap();
/// assert_eq!(port, 8080);
/// assert!(take_field::<i32>(&mut fields, "port").is_err());
/// ```
pub fn take_field<T>(fields: &mut FieldMap, key: &str) -> Result<T>
where
    T: TryFrom<Value, Error = Error>,
{
    let value = fields
        .shift_remove(key)
        .ok_or_else(|| Error::custom(format!("missing field '{}'", key)))?;
    T::try_from(value)
}

/// Maps type names to object serializers.
///
/// Populate the registry before parsing or generating; the parser and
/// generator only read from it. Registering a name twice replaces the
/// earlier serializer.
#[derive(Clone, Default)]
pub struct Registry {
    serializers: HashMap<String, Arc<dyn ObjectSerializer>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `serializer` under `type_name`, replacing any earlier registration.
    pub fn register<S>(&mut self, type_name: impl Into<String>, serializer: S) -> &mut Self
    where
        S: ObjectSerializer + 'static,
    {
        let type_name = type_name.into();
        tracing::debug!(type_name = %type_name, "registering object serializer");
        self.serializers.insert(type_name, Arc::new(serializer));
        self
    }

    /// Registers a serializer for one concrete native type.
    pub fn register_typed<S>(&mut self, type_name: impl Into<String>, serializer: S) -> &mut Self
    where
        S: TypedSerializer,
    {
        self.register(type_name, Typed(serializer))
    }

    /// Registers a serde-backed serializer for `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde::{Deserialize, Serialize};
    /// use tconf::Registry;
    ///
    /// #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    /// struct Limits { max_connections: i32, burst: f32 }
    ///
    /// let mut registry = Registry::new();
    /// registry.register_serde::<Limits>("app.Limits");
    /// assert!(registry.contains("app.Limits"));
    /// ```
    pub fn register_serde<T>(&mut self, type_name: impl Into<String>) -> &mut Self
    where
        T: Serialize + DeserializeOwned + NativeObject,
    {
        self.register_typed(type_name, SerdeSerializer::<T>::new())
    }

    /// Looks up the serializer registered under `type_name`.
    #[must_use]
    pub fn lookup(&self, type_name: &str) -> Option<&dyn ObjectSerializer> {
        self.serializers.get(type_name).map(|s| s.as_ref())
    }

    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.serializers.contains_key(type_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.serializers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty()
    }

    /// Registered type names, in no particular order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.serializers.keys().map(String::as_str)
    }

    #[must_use]
    pub fn parser(&self) -> Parser<'_> {
        Parser::new(self)
    }

    #[must_use]
    pub fn parser_with_options(&self, options: FormatOptions) -> Parser<'_> {
        Parser::with_options(self, options)
    }

    #[must_use]
    pub fn generator(&self) -> Generator<'_> {
        Generator::new(self)
    }

    #[must_use]
    pub fn generator_with_options(&self, options: FormatOptions) -> Generator<'_> {
        Generator::with_options(self, options)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.type_names().collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("types", &names).finish()
    }
}
