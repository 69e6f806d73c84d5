//! Ordered documents of commented entries.
//!
//! A [`Document`] maps dotted key paths to [`Entry`] values. It wraps an
//! [`IndexMap`] because insertion order is meaningful: it is the physical line
//! order of generated text and the order entries appear in while parsing.
//!
//! ## Examples
//!
//! ```rust
//! use tconf::{Document, Entry, Value};
//!
//! let mut doc = Document::new();
//! doc.insert_block("server", "Listening address");
//! doc.insert_value("server.host", "127.0.0.1");
//! doc.insert_commented("server.port", "Defaults to 8080", 8080);
//!
//! assert_eq!(doc.len(), 3);
//! assert_eq!(doc.get_value("server.port"), Some(&Value::Int(8080)));
//!
//! let keys: Vec<_> = doc.keys().cloned().collect();
//! assert_eq!(keys, vec!["server", "server.host", "server.port"]);
//! ```

use crate::{FieldMap, Value};
use indexmap::IndexMap;

/// A value plus the comment written on the line above it.
///
/// An empty comment means "no comment". An entry whose value is
/// [`Value::Null`] is a block header: it exists to attach a comment to the
/// `key:` line that opens a nested block.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Entry {
    pub comment: String,
    pub value: Value,
}

impl Entry {
    /// Creates an entry without a comment.
    pub fn new(value: impl Into<Value>) -> Self {
        Entry {
            comment: String::new(),
            value: value.into(),
        }
    }

    pub fn commented(comment: impl Into<String>, value: impl Into<Value>) -> Self {
        Entry {
            comment: comment.into(),
            value: value.into(),
        }
    }

    /// Creates a block header entry carrying only a comment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::Entry;
    ///
    /// let header = Entry::block("Network settings");
    /// assert!(header.is_block());
    /// assert!(header.has_comment());
    /// ```
    pub fn block(comment: impl Into<String>) -> Self {
        Entry {
            comment: comment.into(),
            value: Value::Null,
        }
    }

    #[must_use]
    pub fn has_comment(&self) -> bool {
        !self.comment.is_empty()
    }

    #[must_use]
    pub fn is_block(&self) -> bool {
        self.value.is_null()
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::new(value)
    }
}

/// An ordered map from dotted key paths to entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document(IndexMap<String, Entry>);

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Document(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Document(IndexMap::with_capacity(capacity))
    }

    /// Inserts an entry, returning the previous entry under the same key.
    ///
    /// Re-inserting a key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, entry: Entry) -> Option<Entry> {
        self.0.insert(key.into(), entry)
    }

    pub fn insert_value(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Entry> {
        self.insert(key, Entry::new(value))
    }

    pub fn insert_commented(
        &mut self,
        key: impl Into<String>,
        comment: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Entry> {
        self.insert(key, Entry::commented(comment, value))
    }

    /// Inserts a block header entry for `key` carrying `comment`.
    pub fn insert_block(&mut self, key: impl Into<String>, comment: impl Into<String>) -> Option<Entry> {
        self.insert(key, Entry::block(comment))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.0.get(key)
    }

    /// Returns the value stored under `key`, ignoring its comment.
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.0.get(key).map(|entry| &entry.value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes an entry, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Entry> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Entry> {
        self.0.iter()
    }

    /// Drops all comments and block headers, keeping only valued entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tconf::{Document, Value};
    ///
    /// let mut doc = Document::new();
    /// doc.insert_block("a", "block");
    /// doc.insert_commented("a.b", "an int", 1);
    ///
    /// let values = doc.into_values();
    /// assert_eq!(values.len(), 1);
    /// assert_eq!(values.get("a.b"), Some(&Value::Int(1)));
    /// ```
    #[must_use]
    pub fn into_values(self) -> FieldMap {
        self.0
            .into_iter()
            .filter(|(_, entry)| !entry.is_block())
            .map(|(key, entry)| (key, entry.value))
            .collect()
    }
}

impl From<FieldMap> for Document {
    fn from(values: FieldMap) -> Self {
        values
            .into_iter()
            .map(|(key, value)| (key, Entry::new(value)))
            .collect()
    }
}

impl IntoIterator for Document {
    type Item = (String, Entry);
    type IntoIter = indexmap::map::IntoIter<String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Entry);
    type IntoIter = indexmap::map::Iter<'a, String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Entry)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, Entry)>>(iter: T) -> Self {
        Document(IndexMap::from_iter(iter))
    }
}
