//! Generating configuration text from a [`Document`].
//!
//! Entries are written in document order. Dotted keys are split into block
//! headers and a final `name = value` line; the generator tracks the path of
//! the innermost open block and only writes the headers that are not already
//! open.
//!
//! ```rust
//! use tconf::{Document, Registry};
//!
//! let mut doc = Document::new();
//! doc.insert_value("a.b", 1);
//! doc.insert_value("a.c", 2);
//!
//! let text = Registry::new().generator().generate(&doc).unwrap();
//! assert_eq!(text, "a:\n    b = 1\n    c = 2\n");
//! ```

use crate::format::{
    indentation, ARRAY_CLOSE, ARRAY_OPEN, BLOCK_START, COMMENT_PREFIX, KEY_SEPARATOR,
    KEY_VALUE_DELIMITER, OBJECT_CLOSE, OBJECT_OPEN, QUOTE, TYPE_PREFIX,
};
use crate::{
    Array, Document, Entry, Error, FieldMap, FormatOptions, ObjectValue, Registry, Result, Value,
};

/// Writes documents as configuration text, decomposing objects through a
/// [`Registry`].
#[derive(Debug, Clone)]
pub struct Generator<'r> {
    registry: &'r Registry,
    options: FormatOptions,
}

struct Writer {
    out: String,
    newline: &'static str,
}

impl Writer {
    fn line(&mut self, level: usize, text: &str) {
        self.out.push_str(&indentation(level));
        self.out.push_str(text);
        self.out.push_str(self.newline);
    }

    fn comment(&mut self, level: usize, comment: &str) {
        self.line(level, &format!("{} {}", COMMENT_PREFIX, comment));
    }

    fn header(&mut self, level: usize, name: &str) {
        self.line(level, &format!("{}{}", name, BLOCK_START));
    }
}

impl<'r> Generator<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_options(registry, FormatOptions::default())
    }

    pub fn with_options(registry: &'r Registry, options: FormatOptions) -> Self {
        Generator { registry, options }
    }

    /// Generates text for `document`.
    ///
    /// A [`Value::Null`] entry writes only its comment and its block header.
    ///
    /// # Errors
    ///
    /// - [`Error::NoSerializer`] for an object type missing from the registry
    /// - [`Error::TypeMismatch`] for an array element of the wrong type, or a
    ///   native value handed to a serializer for another type
    /// - [`Error::Unrepresentable`] for keys, strings or numbers the grammar
    ///   cannot express
    pub fn generate(&self, document: &Document) -> Result<String> {
        tracing::debug!(entries = document.len(), "generating document");

        let mut writer = Writer {
            out: String::new(),
            newline: self.options.line_ending.as_str(),
        };
        let mut open: Vec<&str> = Vec::new();

        for (key, entry) in document {
            let components = split_key(key)?;
            let (name, parents) = match components.split_last() {
                Some(split) => split,
                None => return Err(Error::unrepresentable(key, "empty key")),
            };

            let common = open
                .iter()
                .zip(parents)
                .take_while(|(open, parent)| open == parent)
                .count();
            open.truncate(common);
            for (level, parent) in parents.iter().enumerate().skip(common) {
                writer.header(level, parent);
                open.push(*parent);
            }

            let level = parents.len();
            write_comment(&mut writer, key, level, entry)?;

            if entry.is_block() {
                writer.header(level, name);
                open.push(*name);
            } else {
                self.write_entry(&mut writer, key, level, name, &entry.value)?;
            }
        }

        tracing::debug!(bytes = writer.out.len(), "generated document");
        Ok(writer.out)
    }

    /// Generates text for comment-free values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::{FieldMap, Registry, Value};
    ///
    /// let mut values = FieldMap::new();
    /// values.insert("name".to_string(), Value::from("demo"));
    ///
    /// let text = Registry::new().generator().generate_values(&values).unwrap();
    /// assert_eq!(text, "name = \"demo\"\n");
    /// ```
    pub fn generate_values(&self, values: &FieldMap) -> Result<String> {
        let document: Document = values
            .iter()
            .map(|(key, value)| (key.clone(), Entry::new(value.clone())))
            .collect();
        self.generate(&document)
    }

    /// Writes `name = value`, spanning several lines for arrays and objects.
    /// `key` is the full path, used in error messages.
    fn write_entry(
        &self,
        writer: &mut Writer,
        key: &str,
        level: usize,
        name: &str,
        value: &Value,
    ) -> Result<()> {
        match value {
            Value::Array(array) => {
                let opener = typed_opener(key, &array.element_type, ARRAY_OPEN)?;
                writer.line(level, &format!("{} {} {}", name, KEY_VALUE_DELIMITER, opener));
                self.write_elements(writer, key, level + 1, array)?;
                writer.line(level, &ARRAY_CLOSE.to_string());
            }
            Value::Object(object) => {
                let opener = typed_opener(key, &object.type_name, OBJECT_OPEN)?;
                writer.line(level, &format!("{} {} {}", name, KEY_VALUE_DELIMITER, opener));
                self.write_fields(writer, key, level + 1, object)?;
                writer.line(level, &OBJECT_CLOSE.to_string());
            }
            scalar => {
                let text = render_scalar(key, scalar, false)?;
                writer.line(level, &format!("{} {} {}", name, KEY_VALUE_DELIMITER, text));
            }
        }
        Ok(())
    }

    fn write_elements(&self, writer: &mut Writer, key: &str, level: usize, array: &Array) -> Result<()> {
        for element in &array.elements {
            if element.is_array() {
                return Err(Error::unsupported_type("array of arrays not supported"));
            }
            if element.type_name() != array.element_type {
                return Err(Error::type_mismatch(&array.element_type, element.type_name()));
            }

            match element {
                Value::Object(object) => {
                    writer.line(level, &OBJECT_OPEN.to_string());
                    self.write_fields(writer, key, level + 1, object)?;
                    writer.line(level, &OBJECT_CLOSE.to_string());
                }
                scalar => writer.line(level, &render_scalar(key, scalar, true)?),
            }
        }
        Ok(())
    }

    fn write_fields(&self, writer: &mut Writer, key: &str, level: usize, object: &ObjectValue) -> Result<()> {
        let serializer = self
            .registry
            .lookup(&object.type_name)
            .ok_or_else(|| Error::no_serializer(&object.type_name))?;

        tracing::trace!(type_name = %object.type_name, "serializing object");
        let fields = serializer.serialize(object.native())?;

        for (field, value) in &fields {
            let path = format!("{}{}{}", key, KEY_SEPARATOR, field);
            validate_name(&path, field)?;
            self.write_entry(writer, &path, level, field, value)?;
        }
        Ok(())
    }
}

fn write_comment(writer: &mut Writer, key: &str, level: usize, entry: &Entry) -> Result<()> {
    if !entry.has_comment() {
        return Ok(());
    }
    if has_line_break(&entry.comment) {
        return Err(Error::unrepresentable(key, "comment contains a line break"));
    }
    if entry.comment.trim() != entry.comment {
        return Err(Error::unrepresentable(
            key,
            "comment has leading or trailing whitespace",
        ));
    }
    writer.comment(level, &entry.comment);
    Ok(())
}

fn split_key(key: &str) -> Result<Vec<&str>> {
    let components: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    for component in &components {
        validate_name(key, component)?;
    }
    Ok(components)
}

/// Checks that `name` reads back as the same key.
fn validate_name(key: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::unrepresentable(key, "empty key component"));
    }
    if name.trim() != name {
        return Err(Error::unrepresentable(key, "key has leading or trailing whitespace"));
    }
    if name.starts_with(COMMENT_PREFIX) {
        return Err(Error::unrepresentable(key, "key starts with a comment prefix"));
    }
    let reserved = |c: char| matches!(c, KEY_VALUE_DELIMITER | BLOCK_START | KEY_SEPARATOR | '\n' | '\r');
    if name.contains(reserved) {
        return Err(Error::unrepresentable(key, "key contains a reserved character"));
    }
    Ok(())
}

fn typed_opener(key: &str, type_name: &str, open: char) -> Result<String> {
    let reserved = |c: char| {
        c.is_whitespace()
            || matches!(
                c,
                ARRAY_OPEN | ARRAY_CLOSE | OBJECT_OPEN | OBJECT_CLOSE | KEY_VALUE_DELIMITER | BLOCK_START | COMMENT_PREFIX | QUOTE
            )
    };
    if type_name.is_empty() || type_name.contains(reserved) {
        return Err(Error::unrepresentable(key, &format!("invalid type name '{}'", type_name)));
    }
    Ok(format!("{}{} {}", TYPE_PREFIX, type_name, open))
}

/// Renders a scalar literal. Array elements are parsed with the element
/// type's own rules, which accept a sign; entry values are not.
fn render_scalar(key: &str, value: &Value, in_array: bool) -> Result<String> {
    match value {
        Value::String(s) => {
            if has_line_break(s) {
                return Err(Error::unrepresentable(key, "string contains a line break"));
            }
            Ok(format!("{}{}{}", QUOTE, s, QUOTE))
        }
        Value::Int(i) => {
            if *i < 0 && !in_array {
                return Err(Error::unrepresentable(key, "negative numbers are only allowed in arrays"));
            }
            Ok(i.to_string())
        }
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(Error::unrepresentable(key, "float is not finite"));
            }
            if f.is_sign_negative() && !in_array {
                return Err(Error::unrepresentable(key, "negative numbers are only allowed in arrays"));
            }
            Ok(render_float(*f))
        }
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(Error::unrepresentable(key, "null is only allowed as a block header")),
        Value::Array(_) | Value::Object(_) => Err(Error::unrepresentable(key, "typed value in scalar position")),
    }
}

/// Shortest round-trip decimal, always with a fractional part.
fn render_float(value: f32) -> String {
    let mut text = value.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}
