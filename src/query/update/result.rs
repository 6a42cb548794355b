//! Update response.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::query::result::ResponseHeader;

/// Result of an update request. Solr only reports the response header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateResult {
    pub header: ResponseHeader,
}

impl UpdateResult {
    pub fn parse(data: &Map<String, Value>) -> Result<Self> {
        Ok(UpdateResult {
            header: ResponseHeader::from_data(data),
        })
    }

    pub fn status(&self) -> Option<i64> {
        self.header.status
    }

    pub fn query_time(&self) -> Option<i64> {
        self.header.query_time
    }
}
