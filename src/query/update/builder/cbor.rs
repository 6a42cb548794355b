//! CBOR update format.
//!
//! The body is an indefinite-length array of document maps, the layout
//! Solr's CBOR loader streams. Only add commands can be expressed; their
//! options travel as request parameters, as does a single trailing commit.

use ciborium_ll::{Encoder, Header, simple};

use crate::client::request::Request;
use crate::document::field_value::format_date;
use crate::document::{Document, Field, FieldValue};
use crate::error::{LucernaError, Result};
use crate::query::update::builder::{RequestFormat, UpdateRequestBuilder, base_request, ensure_utf8};
use crate::query::update::command::{AddCommand, Command, CommitCommand};
use crate::query::update::query::UpdateQuery;

/// Builds CBOR update bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborRequestBuilder;

impl UpdateRequestBuilder for CborRequestBuilder {
    fn build(&self, query: &UpdateQuery) -> Result<Request> {
        ensure_utf8(query.input_encoding(), RequestFormat::Cbor)?;

        let (adds, commit) = split_commands(query)?;
        let mut overwrite = None;
        let mut commit_within = None;
        for add in &adds {
            merge_option("overwrite", &mut overwrite, add.overwrite())?;
            merge_option("commitWithin", &mut commit_within, add.commit_within())?;
        }
        let body = self.raw_data(query)?;

        let mut request = base_request(query);
        request
            .add_param_opt("overwrite", overwrite)
            .add_param_opt("commitWithin", commit_within);
        if let Some(commit) = commit {
            request
                .set_param("commit", true)
                .add_param_opt("softCommit", commit.soft_commit)
                .add_param_opt("waitSearcher", commit.wait_searcher)
                .add_param_opt("expungeDeletes", commit.expunge_deletes);
        }
        request
            .set_content_type("application/cbor")
            .set_raw_data(body);
        Ok(request)
    }
}

impl CborRequestBuilder {
    pub fn raw_data(&self, query: &UpdateQuery) -> Result<Vec<u8>> {
        let mut writer = CborWriter::default();
        writer.header(Header::Array(None))?;
        let (adds, _) = split_commands(query)?;
        for add in adds {
            for doc in add.documents() {
                self.write_document(&mut writer, doc)?;
            }
        }
        writer.header(Header::Break)?;
        Ok(writer.into_inner())
    }

    fn write_document(&self, writer: &mut CborWriter, doc: &Document) -> Result<()> {
        let fields = doc.fields()?;
        let len = fields.len() + usize::from(doc.version().is_some());
        writer.header(Header::Map(Some(len)))?;

        for (name, field) in fields {
            writer.text(name)?;
            match doc.get_field_modifier(name) {
                Some(modifier) => {
                    writer.header(Header::Map(Some(1)))?;
                    writer.text(modifier.as_str())?;
                    writer.field(field)?;
                }
                None => writer.field(field)?,
            }
        }

        if let Some(version) = doc.version() {
            writer.text("_version_")?;
            writer.scalar(&FieldValue::Integer(version))?;
        }
        Ok(())
    }
}

/// Add commands of `query`, plus the commit when it is the last command.
fn split_commands(query: &UpdateQuery) -> Result<(Vec<&AddCommand>, Option<&CommitCommand>)> {
    let mut commands = query.commands();
    let mut commit = None;
    if let Some(((_, Command::Commit(last)), rest)) = commands.split_last() {
        commit = Some(last);
        commands = rest;
    }

    let adds = commands
        .iter()
        .map(|(_, command)| match command {
            Command::Add(add) => Ok(add),
            other => Err(LucernaError::runtime(format!(
                "Unsupported command type for CBOR requests: {}",
                other.command_type()
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((adds, commit))
}

fn merge_option<T: PartialEq + Copy + std::fmt::Display>(
    name: &str,
    current: &mut Option<T>,
    next: Option<T>,
) -> Result<()> {
    match (*current, next) {
        (Some(a), Some(b)) if a != b => Err(LucernaError::invalid_argument(format!(
            "Add commands in one CBOR request disagree on {name}: {a} and {b}"
        ))),
        (None, Some(b)) => {
            *current = Some(b);
            Ok(())
        }
        _ => Ok(()),
    }
}

#[derive(Default)]
struct CborWriter {
    buffer: Vec<u8>,
}

impl CborWriter {
    fn header(&mut self, header: Header) -> Result<()> {
        Encoder::from(&mut self.buffer)
            .push(header)
            .map_err(|e| LucernaError::serialization(format!("CBOR encoding failed: {e}")))
    }

    fn text(&mut self, value: &str) -> Result<()> {
        self.header(Header::Text(Some(value.len())))?;
        self.buffer.extend_from_slice(value.as_bytes());
        Ok(())
    }

    /// Floats are always written at double precision.
    fn double(&mut self, value: f64) {
        self.buffer.push(0xfb);
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    fn scalar(&mut self, value: &FieldValue) -> Result<()> {
        match value {
            FieldValue::Null => self.header(Header::Simple(simple::NULL)),
            FieldValue::Boolean(true) => self.header(Header::Simple(simple::TRUE)),
            FieldValue::Boolean(false) => self.header(Header::Simple(simple::FALSE)),
            FieldValue::Integer(i) if *i >= 0 => self.header(Header::Positive(i.unsigned_abs())),
            // CBOR stores a negative n as -1 - n
            FieldValue::Integer(i) => self.header(Header::Negative((-1 - *i).unsigned_abs())),
            FieldValue::Float(f) => {
                self.double(*f);
                Ok(())
            }
            FieldValue::Text(s) => self.text(s),
            FieldValue::DateTime(dt) => self.text(&format_date(dt)),
        }
    }

    fn field(&mut self, field: &Field) -> Result<()> {
        match field {
            Field::Single(value) => self.scalar(value),
            Field::Multi(values) => {
                self.header(Header::Array(Some(values.len())))?;
                values.iter().try_for_each(|value| self.scalar(value))
            }
        }
    }

    fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Modifier;
    use crate::query::query::Query;

    fn encode(doc: Document) -> Vec<u8> {
        let mut update = UpdateQuery::new();
        update.add_document(doc, None, None);
        CborRequestBuilder.raw_data(&update).unwrap()
    }

    #[test]
    fn test_integers() {
        let mut doc = Document::new();
        doc.set_field("n", -5, None, None);
        // [_ {"n": -5}]
        assert_eq!(encode(doc), vec![0x9f, 0xa1, 0x61, b'n', 0x24, 0xff]);

        let mut doc = Document::new();
        doc.set_field("n", 5, None, None);
        assert_eq!(encode(doc), vec![0x9f, 0xa1, 0x61, b'n', 0x05, 0xff]);
    }

    #[test]
    fn test_double_and_multi_values() {
        let mut doc = Document::new();
        doc.set_field("f", 1.5, None, None)
            .add_field("t", true, None, None)
            .add_field("t", FieldValue::Null, None, None);

        let mut expected = vec![0x9f, 0xa2, 0x61, b'f', 0xfb];
        expected.extend_from_slice(&1.5f64.to_be_bytes());
        expected.extend_from_slice(&[0x61, b't', 0x82, 0xf5, 0xf6, 0xff]);
        assert_eq!(encode(doc), expected);
    }

    #[test]
    fn test_modifier_and_version() {
        let mut doc = Document::new();
        doc.set_key("id")
            .set_field("id", "a", None, None)
            .set_field("c", 2, None, Some(Modifier::Inc))
            .set_version(-1);

        let mut expected = vec![0x9f, 0xa3];
        expected.extend_from_slice(&[0x62, b'i', b'd', 0x61, b'a']);
        expected.extend_from_slice(&[0x61, b'c', 0xa1, 0x63, b'i', b'n', b'c', 0x02]);
        expected.extend_from_slice(&[0x69]);
        expected.extend_from_slice(b"_version_");
        expected.extend_from_slice(&[0x20, 0xff]);
        assert_eq!(encode(doc), expected);
    }

    #[test]
    fn test_only_add_supported() {
        let mut update = UpdateQuery::new();
        update
            .set_request_format(RequestFormat::Cbor)
            .add_document(Document::new(), None, None)
            .add_delete_by_id("1");

        let err = update.build_request().unwrap_err();
        assert!(matches!(err, LucernaError::Runtime(_)));
        assert!(err.to_string().contains("delete"));

        // a commit is only accepted as the last command
        let mut update = UpdateQuery::new();
        update
            .set_request_format(RequestFormat::Cbor)
            .add_commit(None, None, None)
            .add_document(Document::new(), None, None);
        assert!(update.build_request().is_err());
    }

    #[test]
    fn test_trailing_commit_becomes_params() {
        let mut doc = Document::new();
        doc.set_field("id", "1", None, None);

        let mut update = UpdateQuery::new();
        update
            .set_request_format(RequestFormat::Cbor)
            .add_document(doc.clone(), None, None)
            .add_commit(Some(true), None, Some(false));

        let request = update.build_request().unwrap();
        assert_eq!(request.param("commit"), Some("true"));
        assert_eq!(request.param("softCommit"), Some("true"));
        assert_eq!(request.param("waitSearcher"), None);
        assert_eq!(request.param("expungeDeletes"), Some("false"));
        assert_eq!(request.raw_data(), Some(encode(doc).as_slice()));
    }

    #[test]
    fn test_add_options_become_params() {
        let mut doc = Document::new();
        doc.set_field("id", "1", None, None);

        let mut update = UpdateQuery::new();
        update
            .set_request_format(RequestFormat::Cbor)
            .add_document(doc.clone(), Some(false), Some(250))
            .add_document(doc.clone(), None, Some(250));

        let request = update.build_request().unwrap();
        assert_eq!(request.content_type(), Some("application/cbor"));
        assert_eq!(request.param("overwrite"), Some("false"));
        assert_eq!(request.param("commitWithin"), Some("250"));

        update.add_document(doc, Some(true), None);
        let err = update.build_request().unwrap_err();
        assert!(matches!(err, LucernaError::InvalidArgument(_)));
    }
}
