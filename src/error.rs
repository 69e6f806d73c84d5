//! Error types for parsing and generating configuration text.
//!
//! Every failure is fatal to the call that produced it: there is no partial
//! document and no resynchronisation after a bad line.
//!
//! ## Error Categories
//!
//! - **Malformed lines**: no `=` or `:` on a line, or an empty key
//! - **Malformed values**: bad literals, unclosed arrays/objects, nested arrays
//! - **Indentation errors**: a line nested deeper than any open block
//! - **Missing serializers**: a type name with no registered serializer
//! - **Type mismatches**: a native value handed to the wrong serializer
//! - **Unrepresentable values**: generator input the grammar cannot express
//!
//! Parse errors carry the 1-based line number and the offending text.
//!
//! ## Examples
//!
//! ```rust
//! use tconf::{parse, Error, Registry};
//!
//! let err = parse("foo\n", &Registry::new()).unwrap_err();
//! assert!(matches!(err, Error::MalformedLine { line: 1, .. }));
//! assert_eq!(err.line(), Some(1));
//! ```

use std::fmt;
use thiserror::Error;

/// All errors raised by the parser, the generator, and serializers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A structural line that cannot be split into a key and a value.
    #[error("Malformed line {line}: {msg}\n{text}")]
    MalformedLine {
        line: usize,
        text: String,
        msg: String,
    },

    /// A value literal or typed body that does not follow the grammar.
    #[error("Malformed value at line {line}: {msg}\n{text}")]
    MalformedValue {
        line: usize,
        text: String,
        msg: String,
    },

    /// A line indented deeper than the innermost open block.
    #[error("Indentation error at line {line}: expected at most {expected} spaces, found {found}\n{text}\nHelp: open a block with 'key:' before indenting")]
    Indentation {
        line: usize,
        text: String,
        expected: usize,
        found: usize,
    },

    /// Parse-time lookup of an object type that has no serializer.
    #[error("No deserializer found for type '{type_name}' (object opened at line {line})")]
    NoDeserializer { line: usize, type_name: String },

    /// Generate-time lookup of an object type that has no serializer.
    #[error("No serializer found for type '{type_name}'")]
    NoSerializer { type_name: String },

    /// A value whose runtime type is not the one the consumer expected.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Generator input that has no textual form.
    #[error("Cannot generate '{key}': {msg}")]
    Unrepresentable { key: String, msg: String },

    /// A Rust type shape the serde adapter cannot map onto the format.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error, typically raised by a user serializer.
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a malformed-line error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::Error;
    ///
    /// let err = Error::malformed_line(3, "foo", "expected '=' or ':'");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn malformed_line(line: usize, text: &str, msg: &str) -> Self {
        Error::MalformedLine {
            line,
            text: text.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a malformed-value error.
    pub fn malformed_value(line: usize, text: &str, msg: &str) -> Self {
        Error::MalformedValue {
            line,
            text: text.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an indentation error. `expected` and `found` are space counts.
    pub fn indentation(line: usize, text: &str, expected: usize, found: usize) -> Self {
        Error::Indentation {
            line,
            text: text.to_string(),
            expected,
            found,
        }
    }

    pub fn no_deserializer(line: usize, type_name: &str) -> Self {
        Error::NoDeserializer {
            line,
            type_name: type_name.to_string(),
        }
    }

    pub fn no_serializer(type_name: &str) -> Self {
        Error::NoSerializer {
            type_name: type_name.to_string(),
        }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::Error;
    ///
    /// let err = Error::type_mismatch("int", "string");
    /// assert!(err.to_string().contains("expected int"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn unrepresentable(key: &str, msg: &str) -> Self {
        Error::Unrepresentable {
            key: key.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::Error;
    ///
    /// let err = Error::custom("missing field 'port'");
    /// assert!(err.to_string().contains("missing field"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// The 1-based line number for errors raised while parsing.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::MalformedLine { line, .. }
            | Error::MalformedValue { line, .. }
            | Error::Indentation { line, .. }
            | Error::NoDeserializer { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
