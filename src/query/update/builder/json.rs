//! JSON update format.
//!
//! Solr's JSON update syntax allows repeated keys inside the top-level
//! object (`{"add": {...}, "add": {...}, "commit": {}}`), which no map type
//! can hold, so the outer object is assembled as text and only the entries
//! go through `serde_json`.

use serde_json::{Map, Value};

use crate::client::request::Request;
use crate::document::Document;
use crate::error::{LucernaError, Result};
use crate::query::update::builder::{RequestFormat, UpdateRequestBuilder, base_request, ensure_utf8};
use crate::query::update::command::{Command, CommandType};
use crate::query::update::query::UpdateQuery;

/// Builds JSON update bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRequestBuilder;

impl UpdateRequestBuilder for JsonRequestBuilder {
    fn build(&self, query: &UpdateQuery) -> Result<Request> {
        ensure_utf8(query.input_encoding(), RequestFormat::Json)?;
        let body = self.raw_data(query)?;

        let mut request = base_request(query);
        request
            .set_content_type("application/json")
            .set_raw_data(body.into_bytes());
        Ok(request)
    }
}

impl JsonRequestBuilder {
    pub fn raw_data(&self, query: &UpdateQuery) -> Result<String> {
        let mut entries = Vec::new();

        for (_, command) in query.commands() {
            match command {
                Command::Add(add) => {
                    for doc in add.documents() {
                        let mut entry = Map::new();
                        entry.insert("doc".to_string(), self.document_json(doc)?);
                        if let Some(boost) = doc.boost() {
                            entry.insert("boost".to_string(), float_json(boost)?);
                        }
                        insert_opt(&mut entry, "overwrite", add.overwrite());
                        insert_opt(&mut entry, "commitWithin", add.commit_within());
                        entries.push(entry_text("add", entry));
                    }
                }
                Command::Delete(delete) => {
                    for id in delete.ids() {
                        let mut entry = Map::new();
                        entry.insert("id".to_string(), id.to_json()?);
                        entries.push(entry_text("delete", entry));
                    }
                    for query in delete.queries() {
                        let mut entry = Map::new();
                        entry.insert("query".to_string(), Value::String(query.clone()));
                        entries.push(entry_text("delete", entry));
                    }
                }
                Command::Commit(commit) => {
                    let mut entry = Map::new();
                    insert_opt(&mut entry, "softCommit", commit.soft_commit);
                    insert_opt(&mut entry, "waitSearcher", commit.wait_searcher);
                    insert_opt(&mut entry, "expungeDeletes", commit.expunge_deletes);
                    entries.push(entry_text("commit", entry));
                }
                Command::Optimize(optimize) => {
                    let mut entry = Map::new();
                    insert_opt(&mut entry, "softCommit", optimize.soft_commit);
                    insert_opt(&mut entry, "waitSearcher", optimize.wait_searcher);
                    insert_opt(&mut entry, "maxSegments", optimize.max_segments);
                    entries.push(entry_text("optimize", entry));
                }
                Command::Rollback(_) => entries.push(entry_text("rollback", Map::new())),
                Command::RawXml(_) => {
                    return Err(LucernaError::runtime(format!(
                        "Unsupported command type for JSON requests: {}",
                        CommandType::RawXml
                    )));
                }
            }
        }

        Ok(format!("{{{}}}", entries.join(",")))
    }

    /// Field map of one document, with modifier wrapping and `_version_`.
    pub fn document_json(&self, doc: &Document) -> Result<Value> {
        let mut fields = Map::new();
        for (name, field) in doc.fields()? {
            let value = field.to_json()?;
            let value = match doc.get_field_modifier(name) {
                Some(modifier) => {
                    let mut wrapped = Map::new();
                    wrapped.insert(modifier.as_str().to_string(), value);
                    Value::Object(wrapped)
                }
                None => value,
            };
            fields.insert(name.clone(), value);
        }
        if let Some(version) = doc.version() {
            fields.insert("_version_".to_string(), Value::from(version));
        }
        Ok(Value::Object(fields))
    }
}

fn entry_text(key: &str, entry: Map<String, Value>) -> String {
    format!("\"{key}\":{}", Value::Object(entry))
}

fn insert_opt<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.into());
    }
}

/// An f32 as the JSON number of its shortest decimal form, so 1.2 stays 1.2
/// instead of widening to 1.2000000476837158.
fn float_json(value: f32) -> Result<Value> {
    value
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| LucernaError::invalid_argument(format!("{value} cannot be encoded as JSON")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{FieldValue, Modifier};
    use crate::query::query::Query;
    use serde_json::json;

    #[test]
    fn test_documents_produce_one_add_entry_each() {
        let mut first = Document::new();
        first
            .set_field("id", "1", None, None)
            .add_field("cat", "a", None, None)
            .add_field("cat", "b", None, None);
        first.set_boost(1.2);
        let mut second = Document::new();
        second.set_field("id", "2", Some(3.0), None);

        let mut update = UpdateQuery::new();
        update.add_documents([first, second], Some(false), Some(1000));

        let body = JsonRequestBuilder.raw_data(&update).unwrap();
        assert_eq!(
            body,
            concat!(
                r#"{"add":{"doc":{"id":"1","cat":["a","b"]},"boost":1.2,"overwrite":false,"commitWithin":1000},"#,
                r#""add":{"doc":{"id":"2"},"overwrite":false,"commitWithin":1000}}"#
            )
        );
    }

    #[test]
    fn test_modifiers_and_version() {
        let mut doc = Document::new();
        doc.set_key("id")
            .set_field("id", "1", None, None)
            .set_field("views", 1, None, Some(Modifier::Inc))
            .set_field("old", FieldValue::Null, None, Some(Modifier::Set))
            .set_version(42);

        assert_eq!(
            JsonRequestBuilder.document_json(&doc).unwrap(),
            json!({"id": "1", "views": {"inc": 1}, "old": {"set": null}, "_version_": 42})
        );
    }

    #[test]
    fn test_delete_commit_optimize_rollback() {
        let mut update = UpdateQuery::new();
        update
            .add_delete_by_ids([1, 2])
            .add_delete_query("cat:a")
            .add_commit(Some(true), Some(false), None)
            .add_optimize(None, None, Some(2))
            .add_rollback();

        let body = JsonRequestBuilder.raw_data(&update).unwrap();
        assert_eq!(
            body,
            concat!(
                r#"{"delete":{"id":1},"delete":{"id":2},"delete":{"query":"cat:a"},"#,
                r#""commit":{"softCommit":true,"waitSearcher":false},"#,
                r#""optimize":{"maxSegments":2},"rollback":{}}"#
            )
        );
    }

    #[test]
    fn test_raw_xml_is_unsupported() {
        let mut update = UpdateQuery::new();
        update
            .set_request_format(RequestFormat::Json)
            .add_raw_xml_command("<commit/>");

        let err = update.build_request().unwrap_err();
        assert!(matches!(err, LucernaError::Runtime(_)));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let mut doc = Document::new();
        doc.set_field("score", f64::NAN, None, None);
        let mut update = UpdateQuery::new();
        update.add_document(doc, None, None);
        assert!(JsonRequestBuilder.raw_data(&update).is_err());
    }

    #[test]
    fn test_request_headers() {
        let mut update = UpdateQuery::new();
        update
            .set_request_format(RequestFormat::Json)
            .add_commit(None, None, None);

        let request = update.build_request().unwrap();
        assert_eq!(request.content_type(), Some("application/json"));
        assert_eq!(request.raw_data(), Some(r#"{"commit":{}}"#.as_bytes()));
    }
}
