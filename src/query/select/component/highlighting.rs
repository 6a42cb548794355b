//! Result highlighting (`hl=true`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::request::Request;
use crate::error::{LucernaError, Result};
use crate::query::result::object_section;

/// The highlighting component of a select query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Highlighting {
    /// Fields to highlight; empty lets Solr use its default.
    pub fields: Vec<String>,
    pub snippets: Option<u32>,
    pub fragsize: Option<u32>,
    pub simple_prefix: Option<String>,
    pub simple_postfix: Option<String>,
    /// `original`, `fastVector` or `unified`.
    pub method: Option<String>,
    /// Highlight terms of this query instead of the main query.
    pub query: Option<String>,
    pub require_field_match: Option<bool>,
}

impl Highlighting {
    pub fn new() -> Self {
        Highlighting::default()
    }

    pub fn add_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.fields.push(field.into());
        self
    }

    pub fn set_simple_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.simple_prefix = Some(prefix.into());
        self
    }

    pub fn set_simple_postfix(&mut self, postfix: impl Into<String>) -> &mut Self {
        self.simple_postfix = Some(postfix.into());
        self
    }

    pub(crate) fn build_params(&self, request: &mut Request) {
        request.add_param("hl", true);
        if !self.fields.is_empty() {
            request.add_param("hl.fl", self.fields.join(","));
        }
        request
            .add_param_opt("hl.snippets", self.snippets)
            .add_param_opt("hl.fragsize", self.fragsize)
            .add_param_opt("hl.simple.pre", self.simple_prefix.as_deref())
            .add_param_opt("hl.simple.post", self.simple_postfix.as_deref())
            .add_param_opt("hl.method", self.method.as_deref())
            .add_param_opt("hl.q", self.query.as_deref())
            .add_param_opt("hl.requireFieldMatch", self.require_field_match);
    }

    pub(crate) fn parse(&self, data: &Map<String, Value>) -> Result<Option<HighlightingResult>> {
        let Some(highlighting) = object_section(data, "highlighting")? else {
            return Ok(None);
        };

        let mut result = HighlightingResult::default();
        for (doc, fields) in highlighting {
            let fields = fields.as_object().ok_or_else(|| {
                LucernaError::unexpected_value(format!("invalid highlighting for document {doc}"))
            })?;
            let fields = fields
                .iter()
                .map(|(field, snippets)| {
                    let snippets = match snippets {
                        Value::Array(items) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect(),
                        Value::String(s) => vec![s.clone()],
                        _ => Vec::new(),
                    };
                    (field.clone(), snippets)
                })
                .collect();
            result
                .documents
                .push((doc.clone(), HighlightedDocument { fields }));
        }
        Ok(Some(result))
    }
}

/// Snippets per field of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightedDocument {
    pub fields: Vec<(String, Vec<String>)>,
}

impl HighlightedDocument {
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, s)| s.as_slice())
    }
}

/// Highlighted documents keyed by unique key, in result order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightingResult {
    pub documents: Vec<(String, HighlightedDocument)>,
}

impl HighlightingResult {
    pub fn get(&self, key: &str) -> Option<&HighlightedDocument> {
        self.documents
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, d)| d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params() {
        let mut hl = Highlighting::new();
        hl.add_field("title")
            .add_field("body")
            .set_simple_prefix("<b>")
            .set_simple_postfix("</b>");
        hl.snippets = Some(3);

        let mut request = Request::new();
        hl.build_params(&mut request);
        assert_eq!(request.param("hl"), Some("true"));
        assert_eq!(request.param("hl.fl"), Some("title,body"));
        assert_eq!(request.param("hl.snippets"), Some("3"));
        assert_eq!(request.param("hl.simple.pre"), Some("<b>"));
        assert_eq!(request.param("hl.fragsize"), None);
    }

    #[test]
    fn test_parse() {
        let data = json!({"highlighting": {
            "doc1": {"title": ["a <b>rust</b> book"]},
            "doc2": {}
        }});
        let result = Highlighting::new()
            .parse(data.as_object().unwrap())
            .unwrap()
            .unwrap();

        assert_eq!(
            result.get("doc1").unwrap().get("title"),
            Some(&["a <b>rust</b> book".to_string()][..])
        );
        assert!(result.get("doc2").unwrap().fields.is_empty());
        assert!(result.get("doc3").is_none());
    }
}
