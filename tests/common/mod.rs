//! Shared test adapter that records requests and replays canned responses.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use lucerna::client::{Adapter, Client, Endpoint, Request, Response};
use lucerna::config::ClientConfig;
use lucerna::error::Result;

pub const OK_BODY: &str = r#"{"responseHeader":{"status":0,"QTime":1}}"#;

#[derive(Debug, Default)]
pub struct MockAdapter {
    requests: Mutex<Vec<(Request, Endpoint)>>,
    responses: Mutex<VecDeque<Response>>,
}

impl MockAdapter {
    pub fn new() -> Arc<Self> {
        Arc::new(MockAdapter::default())
    }

    /// Queue a response; once the queue is empty every request gets `OK_BODY`.
    pub fn push_response(&self, status: u16, body: &str) {
        let message = if status == 200 { "OK" } else { "Error" };
        self.responses
            .lock()
            .push_back(Response::new(status, message, Vec::new(), body));
    }

    pub fn requests(&self) -> Vec<(Request, Endpoint)> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Request {
        self.requests.lock().last().unwrap().0.clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Adapter for MockAdapter {
    async fn execute(&self, request: &Request, endpoint: &Endpoint) -> Result<Response> {
        self.requests
            .lock()
            .push((request.clone(), endpoint.clone()));
        Ok(self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Response::new(200, "OK", Vec::new(), OK_BODY)))
    }
}

pub fn endpoint(core: &str) -> Endpoint {
    Endpoint::new("127.0.0.1", 8983, core)
}

pub fn client(adapter: &Arc<MockAdapter>) -> Client {
    Client::new(
        adapter.clone(),
        ClientConfig::with_endpoint("local", endpoint("techproducts")),
    )
    .unwrap()
}
