//! Update document structure.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::field_value::Field;
use crate::document::modifier::Modifier;
use crate::error::{LucernaError, Result};

/// A document to be sent to Solr in an add command.
///
/// Fields keep their insertion order so payloads are deterministic. A field
/// holds either one scalar or an ordered sequence of scalars; see [`Field`].
///
/// When any field carries an atomic update [`Modifier`], the document becomes a
/// partial update: Solr locates the stored document through the unique key, so
/// [`Document::fields`] refuses to hand out the fields until the key field is
/// set and has a value.
///
/// # Examples
///
/// ```
/// use lucerna::document::{Document, Modifier};
///
/// let mut doc = Document::new();
/// doc.set_field("id", "book-1", None, None)
///     .add_field("cat", "fiction", None, None)
///     .add_field("cat", "classic", None, None);
///
/// let mut partial = Document::new();
/// partial
///     .set_key("id")
///     .set_field("id", "book-1", None, None)
///     .set_field("popularity", 1, None, Some(Modifier::Inc));
/// assert!(partial.fields().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The field values, in insertion order
    fields: Vec<(String, Field)>,
    /// Index-time boosts per field
    field_boosts: HashMap<String, f32>,
    /// Atomic update modifiers per field
    modifiers: HashMap<String, Modifier>,
    /// Name of the unique key field, required for atomic updates
    key: Option<String>,
    /// Optimistic concurrency version, sent as `_version_`
    version: Option<i64>,
    /// Document boost
    boost: Option<f32>,
    /// Strip control characters from text values
    filter_control_characters: bool,
}

impl Document {
    /// Version value that lets Solr skip the concurrency check.
    pub const VERSION_DONT_CARE: i64 = 0;
    /// Version value requiring the document to already exist.
    pub const VERSION_MUST_EXIST: i64 = 1;
    /// Version value requiring the document not to exist yet.
    pub const VERSION_MUST_NOT_EXIST: i64 = -1;

    /// Create a new empty document.
    pub fn new() -> Self {
        Document {
            fields: Vec::new(),
            field_boosts: HashMap::new(),
            modifiers: HashMap::new(),
            key: None,
            version: None,
            boost: None,
            filter_control_characters: true,
        }
    }

    /// Create a document from an initial set of fields.
    pub fn with_fields<I, S, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Field>,
    {
        let mut doc = Document::new();
        for (name, value) in fields {
            doc.set_field(name, value, None, None);
        }
        doc
    }

    /// Set a field value, replacing any previous value.
    ///
    /// A null value without a modifier removes the field and its boost. With
    /// a modifier (typically [`Modifier::Set`]) the null is kept, which tells
    /// Solr to clear the stored field.
    pub fn set_field<S, V>(
        &mut self,
        name: S,
        value: V,
        boost: Option<f32>,
        modifier: Option<Modifier>,
    ) -> &mut Self
    where
        S: Into<String>,
        V: Into<Field>,
    {
        let name = name.into();
        let mut value = value.into();

        if value.is_null() && modifier.is_none() {
            return self.remove_field(&name);
        }

        if self.filter_control_characters {
            value.map_text(strip_control_characters);
        }

        match self.position(&name) {
            Some(index) => self.fields[index].1 = value,
            None => self.fields.push((name.clone(), value)),
        }
        if let Some(boost) = boost {
            self.field_boosts.insert(name.clone(), boost);
        }
        if let Some(modifier) = modifier {
            self.modifiers.insert(name, modifier);
        }
        self
    }

    /// Add a value to a field.
    ///
    /// The first value behaves like [`Document::set_field`]. Further values
    /// turn the field into an ordered sequence: `[old, new, newer, ...]`.
    pub fn add_field<S, V>(
        &mut self,
        name: S,
        value: V,
        boost: Option<f32>,
        modifier: Option<Modifier>,
    ) -> &mut Self
    where
        S: Into<String>,
        V: Into<Field>,
    {
        let name = name.into();
        let Some(index) = self.position(&name) else {
            return self.set_field(name, value, boost, modifier);
        };

        let mut value = value.into();
        if self.filter_control_characters {
            value.map_text(strip_control_characters);
        }
        self.fields[index].1.append(value);

        if let Some(boost) = boost {
            self.field_boosts.insert(name.clone(), boost);
        }
        if let Some(modifier) = modifier {
            self.modifiers.insert(name, modifier);
        }
        self
    }

    /// Remove a field value and its boost. Missing fields are ignored.
    pub fn remove_field(&mut self, name: &str) -> &mut Self {
        if let Some(index) = self.position(name) {
            self.fields.remove(index);
        }
        self.field_boosts.remove(name);
        self
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.position(name).map(|index| &self.fields[index].1)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Get all field names, in insertion order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Get all fields for serialization.
    ///
    /// Fails when the document uses atomic update modifiers but the unique
    /// key is not defined or has no value.
    pub fn fields(&self) -> Result<&[(String, Field)]> {
        if !self.modifiers.is_empty() {
            let has_key_value = self
                .key
                .as_deref()
                .is_some_and(|key| self.has_field(key));
            if !has_key_value {
                return Err(LucernaError::runtime(
                    "A document that uses modifiers (atomic updates) must have a key defined before it is used",
                ));
            }
        }
        Ok(&self.fields)
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Remove all fields, boosts and modifiers.
    pub fn clear(&mut self) -> &mut Self {
        self.fields.clear();
        self.field_boosts.clear();
        self.modifiers.clear();
        self
    }

    /// Set the index-time boost of a field.
    pub fn set_field_boost(&mut self, name: impl Into<String>, boost: f32) -> &mut Self {
        self.field_boosts.insert(name.into(), boost);
        self
    }

    /// Get the boost of a field, if any.
    pub fn get_field_boost(&self, name: &str) -> Option<f32> {
        self.field_boosts.get(name).copied()
    }

    /// Set the atomic update modifier of a field.
    ///
    /// Accepts a [`Modifier`] or its Solr name; unknown names fail with
    /// [`LucernaError::InvalidArgument`].
    pub fn set_field_modifier<M>(&mut self, name: impl Into<String>, modifier: M) -> Result<&mut Self>
    where
        M: TryInto<Modifier>,
        LucernaError: From<M::Error>,
    {
        let modifier = modifier.try_into()?;
        self.modifiers.insert(name.into(), modifier);
        Ok(self)
    }

    /// Get the atomic update modifier of a field, if any.
    pub fn get_field_modifier(&self, name: &str) -> Option<Modifier> {
        self.modifiers.get(name).copied()
    }

    /// Check if any field carries an atomic update modifier.
    pub fn has_modifiers(&self) -> bool {
        !self.modifiers.is_empty()
    }

    /// Designate the unique key field.
    pub fn set_key(&mut self, name: impl Into<String>) -> &mut Self {
        self.key = Some(name.into());
        self
    }

    /// Designate the unique key field and set its value.
    pub fn set_key_value<V: Into<Field>>(&mut self, name: impl Into<String>, value: V) -> &mut Self {
        let name = name.into();
        self.key = Some(name.clone());
        self.set_field(name, value, None, None)
    }

    /// Get the unique key field name.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Set the optimistic concurrency version.
    pub fn set_version(&mut self, version: i64) -> &mut Self {
        self.version = Some(version);
        self
    }

    /// Get the optimistic concurrency version.
    pub fn version(&self) -> Option<i64> {
        self.version
    }

    /// Set the document boost.
    pub fn set_boost(&mut self, boost: f32) -> &mut Self {
        self.boost = Some(boost);
        self
    }

    /// Get the document boost.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    /// Enable or disable control character filtering for values set later.
    pub fn set_filter_control_characters(&mut self, filter: bool) -> &mut Self {
        self.filter_control_characters = filter;
        self
    }

    /// Check whether control character filtering is enabled.
    pub fn filter_control_characters(&self) -> bool {
        self.filter_control_characters
    }

    /// Create a builder for constructing documents.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(field, _)| field == name)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove ASCII control characters Solr rejects in XML (TAB, LF and CR stay).
fn strip_control_characters(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}'))
        .collect()
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    /// Set a field value.
    pub fn field<S: Into<String>, V: Into<Field>>(mut self, name: S, value: V) -> Self {
        self.document.set_field(name, value, None, None);
        self
    }

    /// Add a value to a (possibly multi-valued) field.
    pub fn add_field<S: Into<String>, V: Into<Field>>(mut self, name: S, value: V) -> Self {
        self.document.add_field(name, value, None, None);
        self
    }

    /// Set a field value with an atomic update modifier.
    pub fn update<S: Into<String>, V: Into<Field>>(
        mut self,
        name: S,
        value: V,
        modifier: Modifier,
    ) -> Self {
        self.document.set_field(name, value, None, Some(modifier));
        self
    }

    /// Set a field value with an index-time boost.
    pub fn boosted_field<S: Into<String>, V: Into<Field>>(
        mut self,
        name: S,
        value: V,
        boost: f32,
    ) -> Self {
        self.document.set_field(name, value, Some(boost), None);
        self
    }

    /// Set the unique key field and its value.
    pub fn key<S: Into<String>, V: Into<Field>>(mut self, name: S, value: V) -> Self {
        self.document.set_key_value(name, value);
        self
    }

    /// Set the optimistic concurrency version.
    pub fn version(mut self, version: i64) -> Self {
        self.document.set_version(version);
        self
    }

    /// Set the document boost.
    pub fn boost(mut self, boost: f32) -> Self {
        self.document.set_boost(boost);
        self
    }

    /// Build the final document.
    pub fn build(self) -> Document {
        self.document
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
