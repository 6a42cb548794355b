//! Base query trait and the options shared by every query type.

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use crate::client::request::Request;
use crate::client::response::Response;
use crate::error::Result;

/// Kind of a query, used for logging and plugin decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Select,
    Update,
    Ping,
    System,
    ManagedResource,
    ManagedResources,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Select => "select",
            QueryType::Update => "update",
            QueryType::Ping => "ping",
            QueryType::System => "system",
            QueryType::ManagedResource => "managed_resource",
            QueryType::ManagedResources => "managed_resources",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Solr response writer requested through the `wt` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseWriter {
    #[default]
    Json,
    Xml,
}

impl ResponseWriter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseWriter::Json => "json",
            ResponseWriter::Xml => "xml",
        }
    }
}

/// Settings every query carries regardless of its type.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// Request handler path, relative to the core URI.
    pub handler: String,
    pub response_writer: ResponseWriter,
    /// `omitHeader`; when unset Solr's default applies.
    pub omit_header: Option<bool>,
    /// `timeAllowed` in milliseconds.
    pub time_allowed: Option<u64>,
    /// Extra parameters appended after the query's own.
    pub params: Vec<(String, String)>,
}

impl QueryOptions {
    pub fn new(handler: impl Into<String>) -> Self {
        QueryOptions {
            handler: handler.into(),
            response_writer: ResponseWriter::Json,
            omit_header: None,
            time_allowed: None,
            params: Vec::new(),
        }
    }

    /// Write the handler and common parameters onto `request`.
    pub fn apply(&self, request: &mut Request) {
        request
            .set_handler(self.handler.as_str())
            .add_param("wt", self.response_writer.as_str())
            .add_param_opt("omitHeader", self.omit_header)
            .add_param_opt("timeAllowed", self.time_allowed);
    }

    /// Append the extra parameters.
    pub fn apply_extra_params(&self, request: &mut Request) {
        for (name, value) in &self.params {
            request.add_param(name.as_str(), value);
        }
    }
}

/// A query that turns into a Solr request and parses its response.
pub trait Query: Send + Sync + Debug {
    /// Parsed result type.
    type Output;

    /// Get the kind of this query.
    fn query_type(&self) -> QueryType;

    fn options(&self) -> &QueryOptions;

    fn options_mut(&mut self) -> &mut QueryOptions;

    /// Build the request for this query.
    fn build_request(&self) -> Result<Request>;

    /// Parse a response to the request built by [`Query::build_request`].
    fn parse_response(&self, response: &Response) -> Result<Self::Output>;

    /// Whether a response with `status` carries a parseable result.
    fn accepts_status(&self, status: u16) -> bool {
        (200..300).contains(&status)
    }

    fn set_handler(&mut self, handler: impl Into<String>) -> &mut Self
    where
        Self: Sized,
    {
        self.options_mut().handler = handler.into();
        self
    }

    fn set_response_writer(&mut self, writer: ResponseWriter) -> &mut Self
    where
        Self: Sized,
    {
        self.options_mut().response_writer = writer;
        self
    }

    fn set_omit_header(&mut self, omit: bool) -> &mut Self
    where
        Self: Sized,
    {
        self.options_mut().omit_header = Some(omit);
        self
    }

    fn set_time_allowed(&mut self, millis: u64) -> &mut Self
    where
        Self: Sized,
    {
        self.options_mut().time_allowed = Some(millis);
        self
    }

    /// Add a parameter that has no dedicated setter.
    fn add_param(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self
    where
        Self: Sized,
    {
        self.options_mut()
            .params
            .push((name.into(), value.to_string()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_apply() {
        let mut options = QueryOptions::new("select");
        options.omit_header = Some(false);
        options.params.push(("debug".to_string(), "timing".to_string()));

        let mut request = Request::new();
        options.apply(&mut request);
        options.apply_extra_params(&mut request);

        assert_eq!(request.handler(), "select");
        assert_eq!(request.query_string(), "wt=json&omitHeader=false&debug=timing");
    }
}
