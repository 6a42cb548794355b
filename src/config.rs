//! Client configuration.
//!
//! A configuration is a set of named [`Endpoint`]s plus the name of the one
//! used when a call does not pick an endpoint explicitly. It is usually
//! loaded from a JSON file:
//!
//! ```json
//! {
//!   "endpoints": {
//!     "local": { "host": "127.0.0.1", "port": 8983, "core": "techproducts" }
//!   },
//!   "default_endpoint": "local"
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::client::endpoint::Endpoint;
use crate::error::{LucernaError, Result};

/// Name of the endpoint created when none is configured.
pub const DEFAULT_ENDPOINT: &str = "localhost";

/// Endpoints known to a [`Client`](crate::client::Client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoints: BTreeMap<String, Endpoint>,
    /// When unset, the first endpoint in name order is the default.
    pub default_endpoint: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut endpoints = BTreeMap::new();
        endpoints.insert(DEFAULT_ENDPOINT.to_string(), Endpoint::default());
        ClientConfig {
            endpoints,
            default_endpoint: None,
        }
    }
}

impl ClientConfig {
    /// A configuration with a single endpoint registered as the default.
    pub fn with_endpoint(name: impl Into<String>, endpoint: Endpoint) -> Self {
        let name = name.into();
        let mut endpoints = BTreeMap::new();
        endpoints.insert(name.clone(), endpoint);
        ClientConfig {
            endpoints,
            default_endpoint: Some(name),
        }
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading client configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: ClientConfig = serde_json::from_str(content)
            .map_err(|e| LucernaError::config(format!("Invalid client configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Name of the default endpoint.
    pub fn default_endpoint_name(&self) -> Option<&str> {
        self.default_endpoint
            .as_deref()
            .or_else(|| self.endpoints.keys().next().map(String::as_str))
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(LucernaError::config("At least one endpoint is required"));
        }
        if let Some(name) = &self.default_endpoint {
            if !self.endpoints.contains_key(name) {
                return Err(LucernaError::config(format!(
                    "Default endpoint '{name}' is not defined"
                )));
            }
        }
        for (name, endpoint) in &self.endpoints {
            if endpoint.host.is_empty() {
                return Err(LucernaError::config(format!("Endpoint '{name}' has no host")));
            }
            if endpoint.port == 0 {
                return Err(LucernaError::config(format!("Endpoint '{name}' has no port")));
            }
            if endpoint.scheme != "http" && endpoint.scheme != "https" {
                return Err(LucernaError::config(format!(
                    "Endpoint '{name}' has unsupported scheme '{}'",
                    endpoint.scheme
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_endpoint_name(), Some(DEFAULT_ENDPOINT));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                "endpoints": {{
                    "a": {{"host": "solr-a", "core": "books"}},
                    "b": {{"host": "solr-b", "port": 8984, "collection": "films"}}
                }},
                "default_endpoint": "b"
            }}"#
        )
        .unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.default_endpoint_name(), Some("b"));
        assert_eq!(config.endpoints["a"].port, 8983);
        assert_eq!(config.endpoints["a"].core.as_deref(), Some("books"));
    }

    #[test]
    fn test_invalid_config() {
        let err = ClientConfig::from_json_str(r#"{"default_endpoint": "missing"}"#).unwrap_err();
        assert!(matches!(err, LucernaError::Config(_)));

        let err =
            ClientConfig::from_json_str(r#"{"endpoints": {"a": {"scheme": "ftp"}}}"#).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));

        assert!(ClientConfig::from_json_str("not json").is_err());
    }
}
