//! Adapter backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::client::adapter::Adapter;
use crate::client::endpoint::Endpoint;
use crate::client::request::{Method, Request};
use crate::client::response::Response;
use crate::error::{LucernaError, Result};

/// HTTP adapter using a pooled [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestAdapter {
    client: reqwest::Client,
}

impl ReqwestAdapter {
    pub fn new() -> Self {
        ReqwestAdapter::default()
    }

    /// Use a preconfigured client (proxies, TLS roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        ReqwestAdapter { client }
    }
}

#[async_trait]
impl Adapter for ReqwestAdapter {
    async fn execute(&self, request: &Request, endpoint: &Endpoint) -> Result<Response> {
        let url = format!("{}{}", endpoint.base_uri()?, request.uri());
        let method = match request.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        };
        debug!("{} {}", request.method(), url);

        let mut builder = self
            .client
            .request(method, &url)
            .timeout(Duration::from_secs(endpoint.timeout));
        if let Some(content_type) = request.content_type() {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some((user, password)) = endpoint.authentication() {
            builder = builder.basic_auth(user, password);
        }
        if let Some(body) = request.raw_data() {
            builder = builder.body(body.to_vec());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LucernaError::transport(format!("{url}: {e}")))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| LucernaError::transport(format!("{url}: {e}")))?;

        Ok(Response::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            headers,
            body.to_vec(),
        ))
    }
}
