//! Parsing configuration text into a [`Document`].
//!
//! ## Overview
//!
//! The parser works line by line over the whole input:
//!
//! - **Block tracking**: a stack of open block paths, popped when a line is
//!   indented less than the stack is deep
//! - **Comments**: the last comment line is held and attached to the next entry
//! - **Typed values**: arrays and objects span several lines and are read by
//!   recursive descent over a shared line cursor
//! - **Error reporting**: every error carries the 1-based line number and text
//!
//! ## Usage
//!
//! ```rust
//! use tconf::{Registry, Value};
//!
//! let text = "\
//! ## Listening port
//! server:
//!     port = 8080
//! debug = false
//! ";
//!
//! let registry = Registry::new();
//! let doc = registry.parser().parse(text).unwrap();
//!
//! let port = doc.get("server.port").unwrap();
//! assert_eq!(port.value, Value::Int(8080));
//! assert_eq!(doc.get_value("debug"), Some(&Value::Bool(false)));
//! ```

use crate::format::{
    ARRAY_CLOSE, ARRAY_OPEN, BLOCK_START, BOOLEAN_TYPE, COMMENT_PREFIX, FLOAT_TYPE, INDENT_SIZE,
    INT_TYPE, KEY_SEPARATOR, KEY_VALUE_DELIMITER, OBJECT_CLOSE, OBJECT_OPEN, QUOTE, STRING_TYPE,
    TYPE_PREFIX,
};
use crate::{
    Array, Document, Entry, Error, FieldMap, FormatOptions, ObjectValue, Registry, Result, Value,
};

/// Parses configuration text, resolving object types through a [`Registry`].
///
/// A parser holds no state between calls; the same parser can be reused for
/// any number of documents.
#[derive(Debug, Clone)]
pub struct Parser<'r> {
    registry: &'r Registry,
    options: FormatOptions,
}

/// One physical line with its 1-based number.
#[derive(Clone, Copy)]
struct SourceLine<'a> {
    number: usize,
    text: &'a str,
}

/// Line cursor shared by the recursive array and object readers.
struct Cursor<'a> {
    lines: Vec<&'a str>,
    next: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor {
            lines: text.lines().collect(),
            next: 0,
        }
    }

    fn next_line(&mut self) -> Option<SourceLine<'a>> {
        let text = *self.lines.get(self.next)?;
        self.next += 1;
        Some(SourceLine {
            number: self.next,
            text,
        })
    }
}

enum Line<'a> {
    Header(&'a str),
    Entry { key: &'a str, value: &'a str },
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_options(registry, FormatOptions::default())
    }

    pub fn with_options(registry: &'r Registry, options: FormatOptions) -> Self {
        Parser { registry, options }
    }

    /// Parses `text` into a document of commented entries.
    ///
    /// Both `\n` and `\r\n` line endings are accepted.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed line, malformed value, indentation error
    /// or object type without a registered serializer. Errors raised by a
    /// serializer are reported as malformed values at the object's opening
    /// line.
    pub fn parse(&self, text: &str) -> Result<Document> {
        tracing::debug!(bytes = text.len(), "parsing document");

        let mut cursor = Cursor::new(text);
        let mut document = Document::new();
        let mut parents: Vec<String> = Vec::new();
        let mut comment = String::new();

        while let Some(line) = cursor.next_line() {
            let trimmed = line.text.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix(COMMENT_PREFIX) {
                comment = rest.trim().to_string();
                continue;
            }

            let spaces = leading_whitespace(line.text);
            let level = spaces / INDENT_SIZE;
            while level < parents.len() {
                if let Some(closed) = parents.pop() {
                    tracing::trace!(block = %closed, "closing block");
                }
            }
            if level > parents.len() {
                return Err(Error::indentation(
                    line.number,
                    line.text,
                    parents.len() * INDENT_SIZE,
                    spaces,
                ));
            }

            match split_line(line)? {
                Line::Header(key) => {
                    let path = join_path(parents.last(), key);
                    tracing::trace!(block = %path, line = line.number, "opening block");
                    // Without recorded headers the comment stays pending for
                    // the next value entry.
                    if self.options.record_block_headers {
                        let comment = std::mem::take(&mut comment);
                        document.insert(path.clone(), Entry::block(comment));
                    }
                    parents.push(path);
                }
                Line::Entry { key, value } => {
                    let path = join_path(parents.last(), key);
                    let value = self.parse_value(value, line, &mut cursor)?;
                    let entry = Entry {
                        comment: std::mem::take(&mut comment),
                        value,
                    };
                    document.insert(path, entry);
                }
            }
        }

        tracing::debug!(entries = document.len(), "parsed document");
        Ok(document)
    }

    /// Parses `text` and drops comments and block headers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::{Registry, Value};
    ///
    /// let registry = Registry::new();
    /// let values = registry.parser().parse_values("# note\nanswer = 42\n").unwrap();
    /// assert_eq!(values.get("answer"), Some(&Value::Int(42)));
    /// ```
    pub fn parse_values(&self, text: &str) -> Result<FieldMap> {
        self.parse(text).map(Document::into_values)
    }

    /// Parses the text after `=`. `line` is the line the value starts on.
    fn parse_value(&self, text: &str, line: SourceLine<'_>, cursor: &mut Cursor<'_>) -> Result<Value> {
        if let Some(s) = unquote(text) {
            return Ok(Value::String(s.to_string()));
        }
        if is_int_literal(text) {
            return text
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|_| Error::malformed_value(line.number, line.text, "integer out of range"));
        }
        if is_float_literal(text) {
            return text
                .parse::<f32>()
                .map(Value::Float)
                .map_err(|_| Error::malformed_value(line.number, line.text, "invalid float"));
        }
        if text.eq_ignore_ascii_case("true") {
            return Ok(Value::Bool(true));
        }
        if text.eq_ignore_ascii_case("false") {
            return Ok(Value::Bool(false));
        }
        if let Some(rest) = text.strip_prefix(TYPE_PREFIX) {
            return self.parse_typed(rest, line, cursor);
        }

        Err(Error::malformed_value(
            line.number,
            line.text,
            &format!("invalid value '{}'", text),
        ))
    }

    /// Parses `<type> [` or `<type> {` (the text after the type prefix).
    fn parse_typed(&self, rest: &str, line: SourceLine<'_>, cursor: &mut Cursor<'_>) -> Result<Value> {
        let open = match rest.chars().last() {
            Some(c @ (ARRAY_OPEN | OBJECT_OPEN)) => c,
            _ => {
                return Err(Error::malformed_value(
                    line.number,
                    line.text,
                    &format!("expected '{}' or '{}' after the type name", ARRAY_OPEN, OBJECT_OPEN),
                ))
            }
        };

        let type_name = rest[..rest.len() - 1].trim();
        if type_name.is_empty() {
            return Err(Error::malformed_value(line.number, line.text, "missing type name"));
        }

        tracing::trace!(type_name, line = line.number, "reading typed value");
        if open == ARRAY_OPEN {
            self.parse_array(type_name, line, cursor)
        } else {
            self.parse_object(type_name, line, cursor)
        }
    }

    fn parse_array(&self, element_type: &str, opener: SourceLine<'_>, cursor: &mut Cursor<'_>) -> Result<Value> {
        let mut array = Array::new(element_type);

        loop {
            let line = cursor.next_line().ok_or_else(|| {
                Error::malformed_value(opener.number, opener.text, "array is never closed")
            })?;
            let trimmed = line.text.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
                continue;
            }

            // Checked first so a string ending in ']' or ':' stays a string.
            if element_type == STRING_TYPE {
                if let Some(s) = unquote(trimmed) {
                    array.elements.push(Value::String(s.to_string()));
                    continue;
                }
            }

            if trimmed.ends_with(ARRAY_OPEN) {
                return Err(Error::malformed_value(
                    line.number,
                    line.text,
                    "array of arrays not supported",
                ));
            }
            if trimmed.ends_with(BLOCK_START) {
                return Err(Error::malformed_value(
                    line.number,
                    line.text,
                    "block start not supported in array",
                ));
            }
            if trimmed.ends_with(ARRAY_CLOSE) {
                break;
            }

            let element = self.parse_element(element_type, trimmed, line, cursor)?;
            array.elements.push(element);
        }

        Ok(Value::Array(array))
    }

    fn parse_element(
        &self,
        element_type: &str,
        text: &str,
        line: SourceLine<'_>,
        cursor: &mut Cursor<'_>,
    ) -> Result<Value> {
        let invalid = |expected: &str| {
            Error::malformed_value(
                line.number,
                line.text,
                &format!("expected {} in array of '{}', found '{}'", expected, element_type, text),
            )
        };

        match element_type {
            INT_TYPE => text.parse::<i32>().map(Value::Int).map_err(|_| invalid("an int")),
            FLOAT_TYPE => text.parse::<f32>().map(Value::Float).map_err(|_| invalid("a float")),
            BOOLEAN_TYPE => {
                if text.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(invalid("a boolean"))
                }
            }
            STRING_TYPE => Err(invalid("a double-quoted string")),
            _ if text.len() == 1 && text.ends_with(OBJECT_OPEN) => {
                self.parse_object(element_type, line, cursor)
            }
            _ => Err(invalid(&format!("'{}' opening an object", OBJECT_OPEN))),
        }
    }

    /// Reads an object body up to its closing brace and hands the fields to
    /// the serializer registered for `type_name`.
    fn parse_object(&self, type_name: &str, opener: SourceLine<'_>, cursor: &mut Cursor<'_>) -> Result<Value> {
        let mut fields = FieldMap::new();

        loop {
            let line = cursor.next_line().ok_or_else(|| {
                Error::malformed_value(
                    opener.number,
                    opener.text,
                    &format!("object of type '{}' is never closed", type_name),
                )
            })?;
            let trimmed = line.text.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
                continue;
            }

            // Nested bodies are consumed by the recursive call below, so the
            // first bare closing brace seen here balances this object's opener.
            if trimmed.ends_with(OBJECT_CLOSE) && !trimmed.contains(KEY_VALUE_DELIMITER) {
                break;
            }

            match split_line(line)? {
                Line::Header(_) => {
                    return Err(Error::malformed_value(
                        line.number,
                        line.text,
                        "block start not supported in object",
                    ))
                }
                Line::Entry { key, value } => {
                    let value = self.parse_value(value, line, cursor)?;
                    fields.insert(key.to_string(), value);
                }
            }
        }

        let serializer = self
            .registry
            .lookup(type_name)
            .ok_or_else(|| Error::no_deserializer(opener.number, type_name))?;

        tracing::trace!(type_name, fields = fields.len(), "deserializing object");
        let native = serializer
            .deserialize(fields)
            .map_err(|e| {
                Error::malformed_value(
                    opener.number,
                    opener.text,
                    &format!("cannot deserialize '{}': {}", type_name, e),
                )
            })?;
        Ok(Value::Object(ObjectValue::from_boxed(type_name, native)))
    }
}

/// Splits a structural line at whichever of `=` or `:` comes first.
fn split_line(line: SourceLine<'_>) -> Result<Line<'_>> {
    let trimmed = line.text.trim();
    let at = trimmed
        .find(|c: char| c == KEY_VALUE_DELIMITER || c == BLOCK_START)
        .ok_or_else(|| {
            Error::malformed_line(
                line.number,
                line.text,
                &format!("expected '{}' or '{}'", KEY_VALUE_DELIMITER, BLOCK_START),
            )
        })?;

    let key = trimmed[..at].trim();
    if key.is_empty() {
        return Err(Error::malformed_line(line.number, line.text, "expected a key"));
    }

    let rest = trimmed[at + 1..].trim();
    if trimmed[at..].starts_with(KEY_VALUE_DELIMITER) {
        Ok(Line::Entry { key, value: rest })
    } else if rest.is_empty() {
        Ok(Line::Header(key))
    } else {
        Err(Error::malformed_line(
            line.number,
            line.text,
            &format!("unexpected text after block start '{}'", BLOCK_START),
        ))
    }
}

fn join_path(parent: Option<&String>, key: &str) -> String {
    match parent {
        Some(parent) => format!("{}{}{}", parent, KEY_SEPARATOR, key),
        None => key.to_string(),
    }
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// The text between the outermost quotes, taken verbatim.
fn unquote(text: &str) -> Option<&str> {
    if text.len() >= 2 && text.starts_with(QUOTE) && text.ends_with(QUOTE) {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

fn is_int_literal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn is_float_literal(text: &str) -> bool {
    match text.split_once('.') {
        Some((whole, fraction)) => is_int_literal(whole) && is_int_literal(fraction),
        None => false,
    }
}
