//! Request builders for the update wire formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::client::request::{Method, Request};
use crate::error::{LucernaError, Result};
use crate::query::query::Query;
use crate::query::update::query::UpdateQuery;

pub mod cbor;
pub mod json;
pub mod xml;

pub use cbor::CborRequestBuilder;
pub use json::JsonRequestBuilder;
pub use xml::XmlRequestBuilder;

/// Wire format of an update request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestFormat {
    #[default]
    Xml,
    Json,
    Cbor,
}

impl RequestFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestFormat::Xml => "xml",
            RequestFormat::Json => "json",
            RequestFormat::Cbor => "cbor",
        }
    }

    /// The builder producing this format.
    pub fn builder(&self) -> &'static dyn UpdateRequestBuilder {
        match self {
            RequestFormat::Xml => &XmlRequestBuilder,
            RequestFormat::Json => &JsonRequestBuilder,
            RequestFormat::Cbor => &CborRequestBuilder,
        }
    }
}

impl fmt::Display for RequestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestFormat {
    type Err = LucernaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(RequestFormat::Xml),
            "json" => Ok(RequestFormat::Json),
            "cbor" => Ok(RequestFormat::Cbor),
            _ => Err(LucernaError::invalid_argument(format!(
                "Unsupported request format: {s}"
            ))),
        }
    }
}

/// Turns an [`UpdateQuery`] into a POST request with an encoded body.
pub trait UpdateRequestBuilder: Send + Sync {
    fn build(&self, query: &UpdateQuery) -> Result<Request>;
}

/// POST request with the handler and common parameters of `query`.
pub(crate) fn base_request(query: &UpdateQuery) -> Request {
    let mut request = Request::new();
    query.options().apply(&mut request);
    query.options().apply_extra_params(&mut request);
    request.set_method(Method::Post);
    request
}

/// Fail unless `encoding` names UTF-8 (or is empty).
pub(crate) fn ensure_utf8(encoding: &str, format: RequestFormat) -> Result<()> {
    let encoding = encoding.trim().to_ascii_lowercase();
    if encoding.is_empty() || encoding == "utf-8" || encoding == "utf8" {
        Ok(())
    } else {
        Err(LucernaError::invalid_argument(format!(
            "{} requests can only be UTF-8, got input encoding {encoding}",
            format.as_str().to_ascii_uppercase()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_utf8() {
        assert!(ensure_utf8("UTF-8", RequestFormat::Json).is_ok());
        assert!(ensure_utf8("utf8", RequestFormat::Cbor).is_ok());
        assert!(ensure_utf8("", RequestFormat::Xml).is_ok());

        let err = ensure_utf8("iso-8859-1", RequestFormat::Json).unwrap_err();
        assert!(matches!(err, LucernaError::InvalidArgument(_)));
        assert!(err.to_string().contains("JSON requests can only be UTF-8"));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CBOR".parse::<RequestFormat>().unwrap(), RequestFormat::Cbor);
        assert!("yaml".parse::<RequestFormat>().is_err());
    }
}
