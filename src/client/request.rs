//! Transport-neutral HTTP request description.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request against a Solr handler.
///
/// Parameters are multi-valued and keep their insertion order, so the query
/// string of a request is deterministic. The handler is relative to the
/// endpoint's core or collection URI, for example `select` or
/// `schema/analysis/stopwords/english`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    method: Method,
    handler: String,
    params: Vec<(String, String)>,
    raw_data: Option<Vec<u8>>,
    content_type: Option<String>,
    headers: Vec<(String, String)>,
}

impl Request {
    /// Create an empty GET request.
    pub fn new() -> Self {
        Request::default()
    }

    pub fn set_method(&mut self, method: Method) -> &mut Self {
        self.method = method;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn set_handler(&mut self, handler: impl Into<String>) -> &mut Self {
        self.handler = handler.into();
        self
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Append a value for `name`, keeping any values already present.
    pub fn add_param(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Append a value for `name` when one is given.
    pub fn add_param_opt<T: ToString>(&mut self, name: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.add_param(name, value);
        }
        self
    }

    /// Replace all values of `name` with a single value.
    ///
    /// The new value takes the position of the first existing one, or is
    /// appended when the parameter was not set.
    pub fn set_param(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        let name = name.into();
        let value = value.to_string();
        match self.params.iter().position(|(n, _)| *n == name) {
            Some(index) => {
                self.params[index].1 = value;
                let mut seen = false;
                self.params.retain(|(n, _)| {
                    if *n != name {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.params.push((name, value)),
        }
        self
    }

    /// Remove every value of `name`.
    pub fn remove_param(&mut self, name: &str) -> &mut Self {
        self.params.retain(|(n, _)| n != name);
        self
    }

    pub fn clear_params(&mut self) -> &mut Self {
        self.params.clear();
        self
    }

    /// First value of `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All values of `name`, in insertion order.
    pub fn param_values(&self, name: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn set_raw_data(&mut self, data: impl Into<Vec<u8>>) -> &mut Self {
        self.raw_data = Some(data.into());
        self
    }

    pub fn raw_data(&self) -> Option<&[u8]> {
        self.raw_data.as_deref()
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace any header with the same (case-insensitive) name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Percent-encoded `name=value` pairs joined with `&`.
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Handler plus query string, relative to the endpoint base URI.
    pub fn uri(&self) -> String {
        let query_string = self.query_string();
        if query_string.is_empty() {
            self.handler.clone()
        } else {
            format!("{}?{}", self.handler, query_string)
        }
    }
}
