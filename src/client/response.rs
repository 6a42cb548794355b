//! HTTP response as returned by an adapter.

use serde_json::{Map, Value};

use crate::client::xml::decode_solr_xml;
use crate::error::{LucernaError, Result};
use crate::query::ResponseWriter;

/// Status, headers and raw body of a Solr response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    status_code: u16,
    status_message: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    pub fn new(
        status_code: u16,
        status_message: impl Into<String>,
        headers: Vec<(String, String)>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Response {
            status_code,
            status_message: status_message.into(),
            headers,
            body: body.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.body)
            .map_err(|e| LucernaError::unexpected_value(format!("response body is not UTF-8: {e}")))
    }

    /// Decode the body written by `writer` into a JSON object.
    ///
    /// XML responses are mapped onto the same shape Solr produces for
    /// `wt=json&json.nl=map`, so result parsers work on either writer.
    pub fn data(&self, writer: ResponseWriter) -> Result<Map<String, Value>> {
        match writer {
            ResponseWriter::Json => match serde_json::from_slice::<Value>(&self.body)? {
                Value::Object(map) => Ok(map),
                other => Err(LucernaError::unexpected_value(format!(
                    "expected a JSON object response, got {other}"
                ))),
            },
            ResponseWriter::Xml => decode_solr_xml(self.body_str()?),
        }
    }

    /// Best-effort error text: Solr's `error.msg` when present, otherwise
    /// the HTTP status message.
    pub fn error_message(&self) -> String {
        serde_json::from_slice::<Value>(&self.body)
            .ok()
            .and_then(|value| {
                value
                    .pointer("/error/msg")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| self.status_message.clone())
    }
}
