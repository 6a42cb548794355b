//! JSONL format document converter.
//!
//! Converts JSONL (JSON Lines) files into update Documents.
//! Each line in the file should be a single JSON object:
//! ```jsonl
//! {"id": "1", "title": "Rust Programming", "cat": ["book", "tech"]}
//! {"id": "2", "title": "Python Basics", "year": 2023}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;

use crate::document::converter::{DocumentConverter, document_from_json};
use crate::document::document::Document;
use crate::error::{LucernaError, Result};

/// A document converter for JSONL format.
#[derive(Debug, Clone, Default)]
pub struct JsonlDocumentConverter {
    /// Field designated as unique key on every converted document.
    key: Option<String>,
}

impl JsonlDocumentConverter {
    /// Create a new JSONL converter.
    pub fn new() -> Self {
        JsonlDocumentConverter { key: None }
    }

    /// Create a JSONL converter that marks `key` as the unique key field.
    pub fn with_key(key: impl Into<String>) -> Self {
        JsonlDocumentConverter {
            key: Some(key.into()),
        }
    }

    /// Parse a single JSON line into a Document.
    pub fn parse_json_line(&self, line: &str) -> Result<Document> {
        let value: Value = serde_json::from_str(line)?;
        let Value::Object(map) = value else {
            return Err(LucernaError::unexpected_value(format!(
                "expected a JSON object per line, got: {line}"
            )));
        };

        let mut doc = document_from_json(&map)?;
        if let Some(key) = &self.key {
            doc.set_key(key.as_str());
        }
        Ok(doc)
    }
}

/// Iterator over JSONL documents.
pub struct JsonlDocumentIterator {
    reader: BufReader<File>,
    converter: JsonlDocumentConverter,
    line_number: usize,
}

impl Iterator for JsonlDocumentIterator {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    self.line_number += 1;
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let line_number = self.line_number;
                    return Some(self.converter.parse_json_line(line).map_err(|e| {
                        LucernaError::unexpected_value(format!("line {line_number}: {e}"))
                    }));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

impl DocumentConverter for JsonlDocumentConverter {
    type Iter = JsonlDocumentIterator;

    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter> {
        let file = File::open(path.as_ref())?;

        Ok(JsonlDocumentIterator {
            reader: BufReader::new(file),
            converter: self.clone(),
            line_number: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::field_value::{Field, FieldValue};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_jsonl_multiple_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": "1", "title": "Test1", "year": 2024}}"#).unwrap();
        writeln!(file, r#"{{"id": "2", "title": "Test2", "year": 2023}}"#).unwrap();
        file.flush().unwrap();

        let converter = JsonlDocumentConverter::new();
        let docs: Vec<_> = converter.convert(file.path()).unwrap().collect();

        assert_eq!(docs.len(), 2);
        let doc1 = docs[0].as_ref().unwrap();
        assert_eq!(
            doc1.get_field("title").and_then(Field::as_single),
            Some(&FieldValue::Text("Test1".to_string()))
        );

        let doc2 = docs[1].as_ref().unwrap();
        assert_eq!(
            doc2.get_field("year").and_then(Field::as_single),
            Some(&FieldValue::Integer(2023))
        );
    }

    #[test]
    fn test_jsonl_empty_lines_and_key() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": "a"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"id": "b", "cat": ["x", "y"]}}"#).unwrap();
        file.flush().unwrap();

        let converter = JsonlDocumentConverter::with_key("id");
        let docs: Vec<_> = converter
            .convert(file.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].key(), Some("id"));
        assert!(docs[1].get_field("cat").unwrap().is_multi());
    }

    #[test]
    fn test_jsonl_reports_line_number() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": "a"}}"#).unwrap();
        writeln!(file, "[1, 2]").unwrap();
        file.flush().unwrap();

        let converter = JsonlDocumentConverter::new();
        let results: Vec<_> = converter.convert(file.path()).unwrap().collect();
        let err = results[1].as_ref().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
