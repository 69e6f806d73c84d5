//! # tconf
//!
//! A parser and generator for an indentation-based, typed configuration format.
//!
//! ## The Format
//!
//! ```text
//! # Comments attach to the next entry
//! server:
//!     host = "127.0.0.1"
//!     port = 8080
//!     ratio = 0.75
//!     verbose = false
//! ports = Tint [
//!     80
//!     443
//! ]
//! origin = Tgeo.Point {
//!     x = 0
//!     y = 0
//! }
//! ```
//!
//! - Blocks nest by 4-space indentation; keys join with `.` into key paths
//! - Primitives are strings, ints (`i32`), floats (`f32`) and booleans
//! - Arrays are homogeneous and tagged with their element type
//! - Objects are tagged with a type name and handled by a serializer
//!   registered under that name
//!
//! ## Key Features
//!
//! - **Comment Preserving**: every entry carries the comment written above it
//! - **Ordered**: documents keep the physical order of their entries
//! - **Pluggable Objects**: user types convert to and from flat field maps
//!   through a [`Registry`]
//! - **Serde Compatible**: structs map onto blocks with [`to_string`] and
//!   [`from_str`]
//! - **Line Accurate Errors**: parse errors carry the 1-based line and its text
//!
//! ## Quick Start
//!
//! ```rust
//! use tconf::{Document, Registry, Value};
//!
//! let registry = Registry::new();
//!
//! let mut doc = Document::new();
//! doc.insert_commented("server.port", "Listening port", 8080);
//! doc.insert_value("server.host", "localhost");
//!
//! let text = tconf::generate(&doc, &registry).unwrap();
//! assert_eq!(
//!     text,
//!     "server:\n    # Listening port\n    port = 8080\n    host = \"localhost\"\n"
//! );
//!
//! let parsed = tconf::parse(&text, &registry).unwrap();
//! assert_eq!(parsed, doc);
//! assert_eq!(parsed.get_value("server.port"), Some(&Value::Int(8080)));
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use tconf::Registry;
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Database {
//!     url: String,
//!     pool_size: u16,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Config {
//!     name: String,
//!     database: Database,
//!     features: Vec<String>,
//! }
//!
//! let config = Config {
//!     name: "demo".to_string(),
//!     database: Database { url: "postgres://localhost/demo".to_string(), pool_size: 8 },
//!     features: vec!["cache".to_string()],
//! };
//!
//! let registry = Registry::new();
//! let text = tconf::to_string(&config, &registry).unwrap();
//! assert!(text.contains("database:\n    url = \"postgres://localhost/demo\"\n"));
//!
//! let back: Config = tconf::from_str(&text, &registry).unwrap();
//! assert_eq!(back, config);
//! ```
//!
//! ## Limitations
//!
//! - Numbers outside arrays have no sign and no exponent
//! - Strings are single-line and have no escape sequences
//! - Arrays do not nest
//!
//! ## Demos
//!
//! See the `demos/` directory:
//!
//! - **`basic.rs`** - Parsing, editing and generating a commented document
//! - **`custom_objects.rs`** - Registering serializers for user types
//!
//! Run any demo with: `cargo run --example <name>`

pub mod de;
pub mod document;
pub mod error;
pub mod format;
pub mod generator;
pub mod options;
pub mod parser;
pub mod registry;
pub mod ser;
pub mod value;

pub use document::{Document, Entry};
pub use error::{Error, Result};
pub use generator::Generator;
pub use options::{FormatOptions, LineEnding};
pub use parser::Parser;
pub use registry::{take_field, ObjectSerializer, Registry, SerdeSerializer, TypedSerializer};
pub use value::{Array, FieldMap, NativeObject, ObjectValue, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Parses configuration text into a document.
///
/// # Examples
///
/// ```rust
/// use tconf::{parse, Registry, Value};
///
/// let doc = parse("# The answer\nanswer = 42\n", &Registry::new()).unwrap();
/// let entry = doc.get("answer").unwrap();
/// assert_eq!(entry.comment, "The answer");
/// assert_eq!(entry.value, Value::Int(42));
/// ```
///
/// # Errors
///
/// Returns an error on the first line that does not follow the format, or
/// when an object's type has no registered serializer.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(text: &str, registry: &Registry) -> Result<Document> {
    registry.parser().parse(text)
}

/// Parses configuration text with custom options.
///
/// # Examples
///
/// ```rust
/// use tconf::{parse_with_options, FormatOptions, Registry};
///
/// let options = FormatOptions::new().with_block_headers(true);
/// let doc = parse_with_options("# Section\na:\n    b = 1\n", &Registry::new(), options).unwrap();
///
/// let header = doc.get("a").unwrap();
/// assert!(header.is_block());
/// assert_eq!(header.comment, "Section");
/// ```
///
/// # Errors
///
/// Same as [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(text: &str, registry: &Registry, options: FormatOptions) -> Result<Document> {
    registry.parser_with_options(options).parse(text)
}

/// Generates configuration text for a document.
///
/// # Errors
///
/// Returns an error if an object's type has no registered serializer, or a
/// key or value cannot be written in the format.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn generate(document: &Document, registry: &Registry) -> Result<String> {
    registry.generator().generate(document)
}

/// Generates configuration text with custom options.
///
/// # Examples
///
/// ```rust
/// use tconf::{generate_with_options, Document, FormatOptions, LineEnding, Registry};
///
/// let mut doc = Document::new();
/// doc.insert_value("a", true);
///
/// let options = FormatOptions::new().with_line_ending(LineEnding::CrLf);
/// let text = generate_with_options(&doc, &Registry::new(), options).unwrap();
/// assert_eq!(text, "a = true\r\n");
/// ```
///
/// # Errors
///
/// Same as [`generate`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn generate_with_options(
    document: &Document,
    registry: &Registry,
    options: FormatOptions,
) -> Result<String> {
    registry.generator_with_options(options).generate(document)
}

/// Serializes any `T: Serialize` struct or map to configuration text.
///
/// Nested structs become blocks. Object values are not produced by serde;
/// `registry` is only consulted for the generator.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use tconf::{to_string, Registry};
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let text = to_string(&Point { x: 1, y: 2 }, &Registry::new()).unwrap();
/// assert_eq!(text, "x = 1\ny = 2\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value has a shape the format cannot hold, such as
/// nested sequences or negative numbers outside a sequence.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T, registry: &Registry) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let document = ser::to_document(value)?;
    registry.generator().generate(&document)
}

/// Deserializes an instance of `T` from configuration text.
///
/// Block headers are kept while parsing, so an empty block reads back as an
/// empty struct or map.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use tconf::{from_str, Registry};
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x = 1\ny = 2\n", &Registry::new()).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the text does not parse, or its values do not match
/// the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(text: &str, registry: &Registry) -> Result<T>
where
    T: DeserializeOwned,
{
    let options = FormatOptions::new().with_block_headers(true);
    let document = registry.parser_with_options(options).parse(text)?;
    de::from_document(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
        location: Point,
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let registry = Registry::new();
        let point = Point { x: 1, y: 2 };
        let text = to_string(&point, &registry).unwrap();
        let point_back: Point = from_str(&text, &registry).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let registry = Registry::new();
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
            location: Point { x: 3, y: 4 },
        };

        let text = to_string(&user, &registry).unwrap();
        assert_eq!(
            text,
            "id = 123\n\
             name = \"Alice\"\n\
             active = true\n\
             tags = Tstring [\n    \"admin\"\n    \"user\"\n]\n\
             location:\n    x = 3\n    y = 4\n"
        );

        let user_back: User = from_str(&text, &registry).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_parse_generate_roundtrip() {
        let registry = Registry::new();
        let mut doc = Document::new();
        doc.insert_commented("a.b", "first", 1);
        doc.insert_value("a.c", 2.5f32);
        doc.insert_value("d", vec![true, false]);

        let text = generate(&doc, &registry).unwrap();
        assert_eq!(parse(&text, &registry).unwrap(), doc);
    }

    #[test]
    fn test_crlf_roundtrip() {
        let registry = Registry::new();
        let mut doc = Document::new();
        doc.insert_value("a.b", "x");

        let options = FormatOptions::new().with_line_ending(LineEnding::CrLf);
        let text = generate_with_options(&doc, &registry, options).unwrap();
        assert_eq!(text, "a:\r\n    b = \"x\"\r\n");
        assert_eq!(parse(&text, &registry).unwrap(), doc);
    }

    #[test]
    fn test_negative_field_is_unrepresentable() {
        let err = to_string(&Point { x: -1, y: 0 }, &Registry::new()).unwrap_err();
        assert!(matches!(err, Error::Unrepresentable { .. }));
    }
}
