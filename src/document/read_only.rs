//! Documents returned by Solr in query results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document from a search result.
///
/// Result documents are plain decoded JSON: field order and value types are
/// whatever Solr returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadOnlyDocument {
    fields: Map<String, Value>,
}

impl ReadOnlyDocument {
    /// Wrap a decoded field map.
    pub fn new(fields: Map<String, Value>) -> Self {
        ReadOnlyDocument { fields }
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a field value as text, if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// All fields, in response order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for ReadOnlyDocument {
    fn from(fields: Map<String, Value>) -> Self {
        ReadOnlyDocument::new(fields)
    }
}
