//! Request hooks and write buffering.
//!
//! A [`Plugin`] is registered on a [`Client`](crate::client::Client) and
//! sees every request before it is sent and every response after it comes
//! back. The buffering helpers ([`BufferedAdd`], [`BufferedDelete`]) wrap a
//! client reference instead and group documents into batched updates.

pub mod buffered_add;
pub mod buffered_delete;
pub mod customize_request;
pub mod post_big_request;

use std::fmt::Debug;

pub use self::buffered_add::BufferedAdd;
pub use self::buffered_delete::{BufferedDelete, DeleteEntry};
pub use self::customize_request::{Customization, CustomizationKind, CustomizeRequest};
pub use self::post_big_request::PostBigRequest;

use crate::client::endpoint::Endpoint;
use crate::client::request::Request;
use crate::client::response::Response;
use crate::error::Result;

/// Hooks around request execution.
pub trait Plugin: Send + Sync + Debug {
    /// Adjust `request` before it is sent. An error aborts the execution.
    fn pre_execute_request(&self, _request: &mut Request, _endpoint: &Endpoint) -> Result<()> {
        Ok(())
    }

    /// Observe the response to `request`.
    fn post_execute_request(
        &self,
        _request: &Request,
        _endpoint: &Endpoint,
        _response: &Response,
    ) -> Result<()> {
        Ok(())
    }
}
