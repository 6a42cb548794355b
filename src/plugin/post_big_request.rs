//! Turn GET requests with very long query strings into form POSTs.

use log::debug;

use crate::client::endpoint::Endpoint;
use crate::client::request::{Method, Request};
use crate::error::Result;
use crate::plugin::Plugin;

/// Default query string length above which a GET becomes a POST.
pub const DEFAULT_MAX_QUERY_STRING_LENGTH: usize = 1024;

/// Moves the query string of oversized GET requests into a POST body.
///
/// Servlet containers limit the URI length; Solr accepts the same
/// parameters as an `application/x-www-form-urlencoded` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostBigRequest {
    max_query_string_length: usize,
}

impl Default for PostBigRequest {
    fn default() -> Self {
        PostBigRequest {
            max_query_string_length: DEFAULT_MAX_QUERY_STRING_LENGTH,
        }
    }
}

impl PostBigRequest {
    pub fn new() -> Self {
        PostBigRequest::default()
    }

    pub fn with_max_query_string_length(max_query_string_length: usize) -> Self {
        PostBigRequest {
            max_query_string_length,
        }
    }

    pub fn max_query_string_length(&self) -> usize {
        self.max_query_string_length
    }
}

impl Plugin for PostBigRequest {
    fn pre_execute_request(&self, request: &mut Request, _endpoint: &Endpoint) -> Result<()> {
        if request.method() != Method::Get || request.raw_data().is_some() {
            return Ok(());
        }
        let query_string = request.query_string();
        if query_string.len() <= self.max_query_string_length {
            return Ok(());
        }

        debug!(
            "Sending {} as POST, query string is {} bytes",
            request.handler(),
            query_string.len()
        );
        request
            .clear_params()
            .set_method(Method::Post)
            .set_content_type("application/x-www-form-urlencoded; charset=utf-8")
            .set_raw_data(query_string);
        Ok(())
    }
}
