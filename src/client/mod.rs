//! Solr client: endpoints, transport adapter and plugin hooks.
//!
//! The [`Client`] resolves an endpoint, lets every registered plugin adjust
//! the outgoing request, hands it to the [`Adapter`] and passes the response
//! back to the plugins and then to the query that built the request.
//!
//! # Examples
//!
//! ```no_run
//! use lucerna::client::Client;
//! use lucerna::config::ClientConfig;
//! use lucerna::query::SelectQuery;
//!
//! # async fn run() -> lucerna::error::Result<()> {
//! let client = Client::from_config(ClientConfig::default())?;
//! let mut query = SelectQuery::new();
//! query.set_query("title:solr");
//! let result = client.select(&query, None).await?;
//! println!("{} documents found", result.num_found);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod endpoint;
pub mod request;
#[cfg(feature = "http")]
pub mod reqwest_adapter;
pub mod response;
pub mod xml;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

pub use self::adapter::Adapter;
pub use self::endpoint::Endpoint;
pub use self::request::{Method, Request};
#[cfg(feature = "http")]
pub use self::reqwest_adapter::ReqwestAdapter;
pub use self::response::Response;

use crate::config::ClientConfig;
use crate::error::{LucernaError, Result};
use crate::plugin::Plugin;
use crate::query::managed_resource::{
    ManagedResourceQuery, ManagedResourceResult, ManagedResourcesQuery, ManagedResourcesResult,
    ResourceType,
};
use crate::query::{
    PingQuery, PingResult, Query, SelectQuery, SelectResult, SystemQuery, SystemResult,
    UpdateQuery, UpdateResult,
};

/// Entry point for talking to one or more Solr endpoints.
pub struct Client {
    adapter: Arc<dyn Adapter>,
    endpoints: BTreeMap<String, Endpoint>,
    default_endpoint: String,
    plugins: Vec<(String, Arc<dyn Plugin>)>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("adapter", &self.adapter)
            .field("endpoints", &self.endpoints)
            .field("default_endpoint", &self.default_endpoint)
            .field(
                "plugins",
                &self.plugins.iter().map(|(key, _)| key).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Client {
    /// Create a client that sends requests through `adapter`.
    pub fn new(adapter: Arc<dyn Adapter>, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let default_endpoint = config
            .default_endpoint_name()
            .map(str::to_string)
            .ok_or_else(|| LucernaError::config("At least one endpoint is required"))?;
        Ok(Client {
            adapter,
            endpoints: config.endpoints,
            default_endpoint,
            plugins: Vec::new(),
        })
    }

    /// Create a client using the bundled `reqwest` adapter.
    #[cfg(feature = "http")]
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::new(Arc::new(ReqwestAdapter::new()), config)
    }

    pub fn adapter(&self) -> &Arc<dyn Adapter> {
        &self.adapter
    }

    pub fn set_adapter(&mut self, adapter: Arc<dyn Adapter>) -> &mut Self {
        self.adapter = adapter;
        self
    }

    /// Add or replace a named endpoint.
    pub fn add_endpoint(&mut self, name: impl Into<String>, endpoint: Endpoint) -> &mut Self {
        self.endpoints.insert(name.into(), endpoint);
        self
    }

    /// Remove an endpoint. The default endpoint cannot be removed.
    pub fn remove_endpoint(&mut self, name: &str) -> Result<Endpoint> {
        if name == self.default_endpoint {
            return Err(LucernaError::runtime(format!(
                "Cannot remove the default endpoint '{name}'"
            )));
        }
        self.endpoints
            .remove(name)
            .ok_or_else(|| LucernaError::out_of_bounds(format!("Endpoint '{name}' not found")))
    }

    /// Look up an endpoint by name, or the default one for `None`.
    pub fn endpoint(&self, name: Option<&str>) -> Result<&Endpoint> {
        let name = name.unwrap_or(&self.default_endpoint);
        self.endpoints
            .get(name)
            .ok_or_else(|| LucernaError::out_of_bounds(format!("Endpoint '{name}' not found")))
    }

    pub fn endpoints(&self) -> &BTreeMap<String, Endpoint> {
        &self.endpoints
    }

    pub fn default_endpoint(&self) -> &str {
        &self.default_endpoint
    }

    pub fn set_default_endpoint(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        if !self.endpoints.contains_key(&name) {
            return Err(LucernaError::out_of_bounds(format!(
                "Endpoint '{name}' not found"
            )));
        }
        self.default_endpoint = name;
        Ok(self)
    }

    /// Register a plugin under `key`, replacing any plugin with that key.
    pub fn register_plugin(&mut self, key: impl Into<String>, plugin: Arc<dyn Plugin>) -> &mut Self {
        let key = key.into();
        debug!("Registering plugin '{key}'");
        match self.plugins.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = plugin,
            None => self.plugins.push((key, plugin)),
        }
        self
    }

    pub fn plugin(&self, key: &str) -> Option<&Arc<dyn Plugin>> {
        self.plugins.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }

    pub fn remove_plugin(&mut self, key: &str) -> Option<Arc<dyn Plugin>> {
        let index = self.plugins.iter().position(|(k, _)| k == key)?;
        Some(self.plugins.remove(index).1)
    }

    /// Build the request for `query` without sending it.
    pub fn create_request<Q: Query>(&self, query: &Q) -> Result<Request> {
        query.build_request()
    }

    /// Send a prepared request and return the raw response.
    ///
    /// Any HTTP status is returned as a response; only transport failures
    /// and plugin errors are reported as errors.
    pub async fn execute_request(
        &self,
        mut request: Request,
        endpoint: Option<&str>,
    ) -> Result<Response> {
        let endpoint = self.endpoint(endpoint)?;
        for (_, plugin) in &self.plugins {
            plugin.pre_execute_request(&mut request, endpoint)?;
        }

        debug!("Executing {} {}", request.method(), request.uri());
        let response = self.adapter.execute(&request, endpoint).await?;
        if !response.is_success() {
            warn!(
                "Solr returned {} {} for {}",
                response.status_code(),
                response.status_message(),
                request.handler()
            );
        }

        for (_, plugin) in &self.plugins {
            plugin.post_execute_request(&request, endpoint, &response)?;
        }
        Ok(response)
    }

    /// Build, send and parse `query`.
    pub async fn execute<Q: Query>(&self, query: &Q, endpoint: Option<&str>) -> Result<Q::Output> {
        let request = self.create_request(query)?;
        let response = self.execute_request(request, endpoint).await?;
        if !query.accepts_status(response.status_code()) {
            return Err(LucernaError::http(
                response.status_code(),
                response.error_message(),
            ));
        }
        query.parse_response(&response)
    }

    pub async fn select(&self, query: &SelectQuery, endpoint: Option<&str>) -> Result<SelectResult> {
        self.execute(query, endpoint).await
    }

    pub async fn update(&self, query: &UpdateQuery, endpoint: Option<&str>) -> Result<UpdateResult> {
        self.execute(query, endpoint).await
    }

    pub async fn ping(&self, query: &PingQuery, endpoint: Option<&str>) -> Result<PingResult> {
        self.execute(query, endpoint).await
    }

    pub async fn system(&self, query: &SystemQuery, endpoint: Option<&str>) -> Result<SystemResult> {
        self.execute(query, endpoint).await
    }

    pub async fn managed_resource(
        &self,
        query: &ManagedResourceQuery,
        endpoint: Option<&str>,
    ) -> Result<ManagedResourceResult> {
        self.execute(query, endpoint).await
    }

    pub async fn managed_resources(
        &self,
        query: &ManagedResourcesQuery,
        endpoint: Option<&str>,
    ) -> Result<ManagedResourcesResult> {
        self.execute(query, endpoint).await
    }

    pub fn create_select(&self) -> SelectQuery {
        SelectQuery::new()
    }

    pub fn create_update(&self) -> UpdateQuery {
        UpdateQuery::new()
    }

    pub fn create_ping(&self) -> PingQuery {
        PingQuery::new()
    }

    pub fn create_system(&self) -> SystemQuery {
        SystemQuery::new()
    }

    pub fn create_stopwords(&self, name: impl Into<String>) -> ManagedResourceQuery {
        ManagedResourceQuery::new(ResourceType::Stopwords, name)
    }

    pub fn create_synonyms(&self, name: impl Into<String>) -> ManagedResourceQuery {
        ManagedResourceQuery::new(ResourceType::Synonyms, name)
    }
}
