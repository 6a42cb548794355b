//! HTTP transport abstraction.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::client::endpoint::Endpoint;
use crate::client::request::Request;
use crate::client::response::Response;
use crate::error::Result;

/// Sends a [`Request`] to an [`Endpoint`] and returns the raw [`Response`].
///
/// Adapters only move bytes. Any HTTP status is a successful transfer; the
/// client decides which statuses are errors.
#[async_trait]
pub trait Adapter: Send + Sync + Debug {
    async fn execute(&self, request: &Request, endpoint: &Endpoint) -> Result<Response>;
}
