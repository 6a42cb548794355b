//! XML update format.

use std::fmt::Display;

use quick_xml::escape::escape;

use crate::client::request::Request;
use crate::document::{Document, Field, FieldValue, Modifier};
use crate::error::{LucernaError, Result};
use crate::query::update::builder::{UpdateRequestBuilder, base_request};
use crate::query::update::command::{
    AddCommand, Command, CommitCommand, DeleteCommand, OptimizeCommand,
};
use crate::query::update::query::UpdateQuery;

/// Builds `<update>` XML bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlRequestBuilder;

impl UpdateRequestBuilder for XmlRequestBuilder {
    fn build(&self, query: &UpdateQuery) -> Result<Request> {
        let charset = Charset::parse(query.input_encoding())?;
        let body = charset.encode(&self.raw_data(query)?)?;

        let mut request = base_request(query);
        request
            .set_content_type(format!("text/xml; charset={}", charset.as_str()))
            .set_raw_data(body);
        Ok(request)
    }
}

impl XmlRequestBuilder {
    /// Serialize all commands of `query` into one `<update>` document.
    pub fn raw_data(&self, query: &UpdateQuery) -> Result<String> {
        let mut xml = String::from("<update>");
        for (_, command) in query.commands() {
            match command {
                Command::Add(add) => self.add_xml(add, &mut xml)?,
                Command::Delete(delete) => self.delete_xml(delete, &mut xml),
                Command::Commit(commit) => self.commit_xml(commit, &mut xml),
                Command::Optimize(optimize) => self.optimize_xml(optimize, &mut xml),
                Command::Rollback(_) => xml.push_str("<rollback/>"),
                Command::RawXml(raw) => {
                    for fragment in raw.commands() {
                        xml.push_str(fragment);
                    }
                }
            }
        }
        xml.push_str("</update>");
        Ok(xml)
    }

    fn add_xml(&self, add: &AddCommand, xml: &mut String) -> Result<()> {
        xml.push_str("<add");
        push_attribute(xml, "overwrite", add.overwrite());
        push_attribute(xml, "commitWithin", add.commit_within());
        xml.push('>');

        for doc in add.documents() {
            self.document_xml(doc, xml)?;
        }

        xml.push_str("</add>");
        Ok(())
    }

    fn document_xml(&self, doc: &Document, xml: &mut String) -> Result<()> {
        xml.push_str("<doc");
        push_attribute(xml, "boost", doc.boost());
        xml.push('>');

        for (name, field) in doc.fields()? {
            let boost = doc.get_field_boost(name);
            let modifier = doc.get_field_modifier(name);
            match field {
                Field::Multi(values) if values.is_empty() => {
                    // an emptied multi-valued field is only meaningful as an update
                    if modifier.is_some() {
                        field_xml(xml, name, boost, &FieldValue::Null, Some(Modifier::Set));
                    }
                }
                Field::Multi(values) => {
                    for value in values {
                        field_xml(xml, name, boost, value, modifier);
                    }
                }
                Field::Single(value) => field_xml(xml, name, boost, value, modifier),
            }
        }

        if let Some(version) = doc.version() {
            field_xml(xml, "_version_", None, &FieldValue::Integer(version), None);
        }

        xml.push_str("</doc>");
        Ok(())
    }

    fn delete_xml(&self, delete: &DeleteCommand, xml: &mut String) {
        xml.push_str("<delete>");
        for id in delete.ids() {
            xml.push_str("<id>");
            xml.push_str(&escape(id.to_solr_string().as_str()));
            xml.push_str("</id>");
        }
        for query in delete.queries() {
            xml.push_str("<query>");
            xml.push_str(&escape(query.as_str()));
            xml.push_str("</query>");
        }
        xml.push_str("</delete>");
    }

    fn commit_xml(&self, commit: &CommitCommand, xml: &mut String) {
        xml.push_str("<commit");
        push_attribute(xml, "softCommit", commit.soft_commit);
        push_attribute(xml, "waitSearcher", commit.wait_searcher);
        push_attribute(xml, "expungeDeletes", commit.expunge_deletes);
        xml.push_str("/>");
    }

    fn optimize_xml(&self, optimize: &OptimizeCommand, xml: &mut String) {
        xml.push_str("<optimize");
        push_attribute(xml, "softCommit", optimize.soft_commit);
        push_attribute(xml, "waitSearcher", optimize.wait_searcher);
        push_attribute(xml, "maxSegments", optimize.max_segments);
        xml.push_str("/>");
    }
}

fn push_attribute<T: Display>(xml: &mut String, name: &str, value: Option<T>) {
    if let Some(value) = value {
        xml.push(' ');
        xml.push_str(name);
        xml.push_str("=\"");
        xml.push_str(&escape(value.to_string().as_str()));
        xml.push('"');
    }
}

fn field_xml(
    xml: &mut String,
    name: &str,
    boost: Option<f32>,
    value: &FieldValue,
    modifier: Option<Modifier>,
) {
    xml.push_str("<field");
    push_attribute(xml, "name", Some(name));
    push_attribute(xml, "boost", boost);
    push_attribute(xml, "update", modifier);

    if value.is_null() {
        xml.push_str(" null=\"true\"/>");
    } else {
        xml.push('>');
        xml.push_str(&escape(value.to_solr_string().as_str()));
        xml.push_str("</field>");
    }
}

/// Charsets an XML body can be sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Utf8,
    Latin1,
    Ascii,
}

impl Charset {
    fn parse(encoding: &str) -> Result<Self> {
        match encoding.trim().to_ascii_lowercase().as_str() {
            "" | "utf-8" | "utf8" => Ok(Charset::Utf8),
            "iso-8859-1" | "latin1" => Ok(Charset::Latin1),
            "us-ascii" | "ascii" => Ok(Charset::Ascii),
            other => Err(LucernaError::invalid_argument(format!(
                "Unsupported input encoding for XML requests: {other}"
            ))),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Latin1 => "iso-8859-1",
            Charset::Ascii => "us-ascii",
        }
    }

    fn max_char(&self) -> u32 {
        match self {
            Charset::Utf8 => u32::from(char::MAX),
            Charset::Latin1 => 0xff,
            Charset::Ascii => 0x7f,
        }
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        if *self == Charset::Utf8 {
            return Ok(text.as_bytes().to_vec());
        }
        text.chars()
            .map(|c| {
                u8::try_from(u32::from(c))
                    .ok()
                    .filter(|b| u32::from(*b) <= self.max_char())
                    .ok_or_else(|| {
                        LucernaError::invalid_argument(format!(
                            "Character {c:?} cannot be encoded as {}",
                            self.as_str()
                        ))
                    })
            })
            .collect()
    }
}
