//! Solr server endpoint settings.

use serde::{Deserialize, Serialize};

use crate::error::{LucernaError, Result};

/// Location of a Solr core or collection.
///
/// Deserializes from a JSON object; missing keys fall back to a local
/// standalone Solr on port 8983.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    /// `http` or `https`.
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Path in front of the Solr context, usually `/`.
    pub path: String,
    /// Web application context, usually `solr`.
    pub context: String,
    /// Core name for standalone Solr.
    pub core: Option<String>,
    /// Collection name for SolrCloud. Takes precedence over `core`.
    pub collection: Option<String>,
    /// Basic authentication user.
    pub username: Option<String>,
    /// Basic authentication password.
    pub password: Option<String>,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint {
            scheme: "http".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8983,
            path: "/".to_string(),
            context: "solr".to_string(),
            core: None,
            collection: None,
            username: None,
            password: None,
            timeout: 5,
        }
    }
}

impl Endpoint {
    /// Endpoint for `core` on `host:port`.
    pub fn new(host: impl Into<String>, port: u16, core: impl Into<String>) -> Self {
        Endpoint {
            host: host.into(),
            port,
            core: Some(core.into()),
            ..Endpoint::default()
        }
    }

    /// URI of the Solr web application, ending in `/`.
    pub fn server_uri(&self) -> String {
        let path = self.path.trim_matches('/');
        let context = self.context.trim_matches('/');
        let mut uri = format!("{}://{}:{}/", self.scheme, self.host, self.port);
        for segment in [path, context] {
            if !segment.is_empty() {
                uri.push_str(segment);
                uri.push('/');
            }
        }
        uri
    }

    /// URI of the core or collection, ending in `/`.
    pub fn base_uri(&self) -> Result<String> {
        let name = self
            .collection
            .as_deref()
            .or(self.core.as_deref())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                LucernaError::unexpected_value("No collection or core set for this endpoint")
            })?;
        Ok(format!("{}{}/", self.server_uri(), name))
    }

    /// Credentials for basic authentication, when a user is configured.
    pub fn authentication(&self) -> Option<(&str, Option<&str>)> {
        self.username
            .as_deref()
            .map(|user| (user, self.password.as_deref()))
    }
}
