//! Document converter for creating update documents from files.
//!
//! This module provides a DocumentConverter trait and a JSON Lines
//! implementation that turns each line of a file into a [`Document`].

use std::path::Path;

use serde_json::{Map, Value};

use crate::document::document::Document;
use crate::document::field_value::Field;
use crate::error::Result;

pub mod jsonl;

/// A trait for converting various file formats into Document iterators.
///
/// # Example
///
/// ```no_run
/// use lucerna::document::converter::DocumentConverter;
/// use lucerna::document::converter::jsonl::JsonlDocumentConverter;
///
/// let converter = JsonlDocumentConverter::new();
/// for doc in converter.convert("documents.jsonl").unwrap() {
///     let doc = doc.unwrap();
///     println!("JSONL Document: {:?}", doc);
/// }
/// ```
pub trait DocumentConverter {
    /// The iterator type that yields documents.
    type Iter: Iterator<Item = Result<Document>>;

    /// Convert a file into an iterator of Documents.
    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter>;
}

/// Build a document from a decoded JSON object.
///
/// Arrays become multi-valued fields. Nested objects are not scalars and are
/// rejected.
pub fn document_from_json(object: &Map<String, Value>) -> Result<Document> {
    let mut doc = Document::new();
    for (name, value) in object {
        doc.set_field(name.as_str(), Field::from_json(value)?, None, None);
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::field_value::FieldValue;
    use serde_json::json;

    #[test]
    fn test_document_from_json() {
        let value = json!({"id": "1", "tags": ["a", "b"], "price": 9.5, "gone": null});
        let doc = document_from_json(value.as_object().unwrap()).unwrap();

        assert_eq!(doc.field_names(), vec!["id", "tags", "price"]);
        assert_eq!(doc.get_field("tags"), Some(&Field::from(vec!["a", "b"])));
        assert_eq!(
            doc.get_field("price").and_then(Field::as_single),
            Some(&FieldValue::Float(9.5))
        );
    }

    #[test]
    fn test_nested_object_rejected() {
        let value = json!({"id": "1", "meta": {"a": 1}});
        assert!(document_from_json(value.as_object().unwrap()).is_err());
    }
}
