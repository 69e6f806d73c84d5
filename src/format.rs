//! Format reference and reserved tokens.
//!
//! This module documents the configuration format as implemented by this
//! library and exposes every reserved token as a constant.
//!
//! # Overview
//!
//! A document is a sequence of lines. Each line is blank, a comment, a block
//! header, or a `key = value` entry. Nesting is expressed by indentation of
//! exactly [`INDENT_SIZE`] spaces per level, and every entry is addressed by
//! its dotted key path (`server.http.port`).
//!
//! ```text
//! # Listening address
//! server:
//!     host = "127.0.0.1"
//!     port = 8080
//!     tls:
//!         enabled = false
//! retries = 3
//! ```
//!
//! parses into the entries `server.host`, `server.port`,
//! `server.tls.enabled` and `retries`.
//!
//! # Grammar
//!
//! ```text
//! document     := line*
//! line         := blank | comment-line | block-header | entry-line
//! comment-line := WS* '#' text
//! block-header := WS* key ':'
//! entry-line   := WS* key WS* '=' WS* value
//! value        := string | int | float | bool | typed-array | typed-object
//! string       := '"' text '"'
//! int          := [0-9]+
//! float        := [0-9]+ '.' [0-9]+
//! bool         := 'true' | 'false'          (case-insensitive)
//! typed-array  := 'T' type-name WS* '[' NEWLINE (array-elem NEWLINE)* WS* ']'
//! typed-object := 'T' type-name WS* '{' NEWLINE (entry-line NEWLINE)* WS* '}'
//! ```
//!
//! ## Primitives
//!
//! | Type | Type name | Syntax | Example |
//! |------|-----------|--------|---------|
//! | String | `string` | double-quoted, no escapes | `name = "Alice"` |
//! | Integer | `int` | unsigned decimal digits, 32-bit | `port = 8080` |
//! | Float | `float` | `digits.digits`, 32-bit | `ratio = 0.75` |
//! | Boolean | `boolean` | `true` / `false`, any case | `debug = TRUE` |
//!
//! There is no sign and no exponent in the top-level numeric grammar. A
//! quoted string is taken verbatim between the outermost quotes: `"a"b"`
//! is the three characters `a"b`. Strings cannot span lines.
//!
//! ## Arrays
//!
//! Arrays declare one element type and hold one element per line:
//!
//! ```text
//! ports = Tint [
//!     8080
//!     8443
//! ]
//! ```
//!
//! Elements are read with the rule for the declared type. Integer and
//! float elements accept a sign (`-5`), string elements must be quoted, and
//! elements of an object type are written as bare `{ ... }` bodies:
//!
//! ```text
//! users = Tapp.User [
//!     {
//!         name = "alice"
//!     }
//! ]
//! ```
//!
//! Arrays do not nest and do not contain block headers.
//!
//! ## Objects
//!
//! Objects name a registered type and list flat `key = value` fields, which
//! may themselves be typed arrays or objects:
//!
//! ```text
//! owner = Tapp.User {
//!     name = "alice"
//!     roles = Tstring [
//!         "admin"
//!     ]
//! }
//! ```
//!
//! The field map is handed to the serializer registered under the type
//! name. Object bodies do not contain block headers.
//!
//! ## Comments
//!
//! A comment line attaches to the next entry parsed. Only the last comment
//! line before an entry is kept. Comments are full-line only; `#` inside a
//! value is ordinary text.
//!
//! # Limitations
//!
//! - No multi-line strings and no escape sequences
//! - No negative numbers or exponents outside arrays
//! - No nested arrays
//! - No circular object references

/// Spaces per nesting level.
pub const INDENT_SIZE: usize = 4;
/// Opens a typed array.
pub const ARRAY_OPEN: char = '[';
/// Closes a typed array.
pub const ARRAY_CLOSE: char = ']';
/// Opens a typed object.
pub const OBJECT_OPEN: char = '{';
/// Closes a typed object.
pub const OBJECT_CLOSE: char = '}';
/// Separates a key from its value.
pub const KEY_VALUE_DELIMITER: char = '=';
/// Ends a block header.
pub const BLOCK_START: char = ':';
/// Prefixes the type name of an array or object.
pub const TYPE_PREFIX: char = 'T';
/// Starts a comment line.
pub const COMMENT_PREFIX: char = '#';
/// Joins the components of a key path.
pub const KEY_SEPARATOR: char = '.';
/// Delimits a string literal.
pub const QUOTE: char = '"';

pub const STRING_TYPE: &str = "string";
pub const INT_TYPE: &str = "int";
pub const FLOAT_TYPE: &str = "float";
pub const BOOLEAN_TYPE: &str = "boolean";

/// Returns `true` for the four built-in element type names.
#[must_use]
pub fn is_primitive_type(type_name: &str) -> bool {
    matches!(type_name, STRING_TYPE | INT_TYPE | FLOAT_TYPE | BOOLEAN_TYPE)
}

/// The indentation prefix for a nesting level.
#[must_use]
pub fn indentation(level: usize) -> String {
    " ".repeat(level * INDENT_SIZE)
}
