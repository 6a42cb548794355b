//! Ping query (`admin/ping`).

use serde_json::Value;

use crate::client::request::{Method, Request};
use crate::client::response::Response;
use crate::error::Result;
use crate::query::query::{Query, QueryOptions, QueryType};
use crate::query::result::ResponseHeader;

/// Check that a core is up and answering queries.
#[derive(Debug, Clone, PartialEq)]
pub struct PingQuery {
    options: QueryOptions,
}

impl Default for PingQuery {
    fn default() -> Self {
        PingQuery {
            options: QueryOptions::new("admin/ping"),
        }
    }
}

impl PingQuery {
    pub fn new() -> Self {
        PingQuery::default()
    }
}

/// Result of a ping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PingResult {
    pub header: ResponseHeader,
    /// `OK` when the core is healthy.
    pub ping_status: Option<String>,
}

impl PingResult {
    pub fn is_ok(&self) -> bool {
        self.ping_status.as_deref() == Some("OK")
    }
}

impl Query for PingQuery {
    type Output = PingResult;

    fn query_type(&self) -> QueryType {
        QueryType::Ping
    }

    fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut QueryOptions {
        &mut self.options
    }

    fn build_request(&self) -> Result<Request> {
        let mut request = Request::new();
        request.set_method(Method::Get);
        self.options.apply(&mut request);
        self.options.apply_extra_params(&mut request);
        Ok(request)
    }

    fn parse_response(&self, response: &Response) -> Result<PingResult> {
        let data = response.data(self.options.response_writer)?;
        Ok(PingResult {
            header: ResponseHeader::from_data(&data),
            ping_status: data.get("status").and_then(Value::as_str).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping() {
        let query = PingQuery::new();
        let request = query.build_request().unwrap();
        assert_eq!(request.uri(), "admin/ping?wt=json");

        let response = Response::new(
            200,
            "OK",
            Vec::new(),
            r#"{"responseHeader":{"status":0,"QTime":1},"status":"OK"}"#,
        );
        let result = query.parse_response(&response).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.header.query_time, Some(1));
    }
}
