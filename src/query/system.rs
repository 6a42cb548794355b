//! System information query (`admin/info/system`).
//!
//! Solr reports system information as a small tree (`lucene`, `jvm`,
//! `system`, ...). The result flattens it into one level of camel-cased keys
//! such as `LuceneSolrSpecVersion` or `SystemLoadAverage`.

use serde_json::{Map, Value};

use crate::client::request::{Method, Request};
use crate::client::response::Response;
use crate::error::Result;
use crate::query::query::{Query, QueryOptions, QueryType};
use crate::query::result::ResponseHeader;

/// Camel-case a key: split on `-` and space, capitalize each part.
fn camelize(key: &str) -> String {
    key.split(['-', ' '])
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Flatten nested objects into `PathSegments` keys.
///
/// Objects are walked recursively; anything else (arrays included) is a leaf.
/// A segment that starts with its parent's whole segment drops that prefix,
/// so `{"system": {"systemLoadAverage": 1}}` yields `SystemLoadAverage`
/// rather than `SystemSystemLoadAverage`, while `{"jvm": {"jvmx": 1}}` keeps
/// `JvmJvmx`.
pub fn flatten_data(data: &Map<String, Value>) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(data, "", "", &mut flat);
    flat
}

fn flatten_into(data: &Map<String, Value>, prefix: &str, parent: &str, flat: &mut Map<String, Value>) {
    for (key, value) in data {
        let segment = camelize(key);
        let segment = match segment.strip_prefix(parent) {
            Some(stripped)
                if !parent.is_empty() && stripped.starts_with(|c: char| c.is_uppercase()) =>
            {
                stripped.to_string()
            }
            _ => segment,
        };
        let path = format!("{prefix}{segment}");
        match value {
            Value::Object(children) => flatten_into(children, &path, &segment, flat),
            leaf => {
                flat.insert(path, leaf.clone());
            }
        }
    }
}

/// Fetch Solr, Lucene, JVM and operating system details.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemQuery {
    options: QueryOptions,
}

impl Default for SystemQuery {
    fn default() -> Self {
        SystemQuery {
            options: QueryOptions::new("admin/info/system"),
        }
    }
}

impl SystemQuery {
    pub fn new() -> Self {
        SystemQuery::default()
    }
}

/// Flattened system information.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemResult {
    pub header: ResponseHeader,
    data: Map<String, Value>,
}

impl SystemResult {
    /// Build from decoded response data; the response header is kept apart.
    pub fn from_data(data: &Map<String, Value>) -> Self {
        let mut tree = data.clone();
        tree.remove("responseHeader");
        SystemResult {
            header: ResponseHeader::from_data(data),
            data: flatten_data(&tree),
        }
    }

    /// A flattened value, e.g. `JvmMemoryFree`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// `std` or `solrcloud`.
    pub fn mode(&self) -> Option<&str> {
        self.text("Mode")
    }

    pub fn solr_spec_version(&self) -> Option<&str> {
        self.text("LuceneSolrSpecVersion")
    }

    pub fn lucene_spec_version(&self) -> Option<&str> {
        self.text("LuceneSpecVersion")
    }

    pub fn jvm_version(&self) -> Option<&str> {
        self.text("JvmVersion")
    }

    pub fn system_name(&self) -> Option<&str> {
        self.text("SystemName")
    }
}

impl Query for SystemQuery {
    type Output = SystemResult;

    fn query_type(&self) -> QueryType {
        QueryType::System
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

    fn parse_response(&self, response: &Response) -> Result<SystemResult> {
        let data = response.data(self.options.response_writer)?;
        Ok(SystemResult::from_data(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("solr-spec-version"), "SolrSpecVersion");
        assert_eq!(camelize("free memory"), "FreeMemory");
        assert_eq!(camelize("systemLoadAverage"), "SystemLoadAverage");
    }

    #[test]
    fn test_flatten_nested_path() {
        let data = json!({"core": {"directory": {"data": "/x"}}});
        let flat = flatten_data(data.as_object().unwrap());
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["CoreDirectoryData"], "/x");
    }

    #[test]
    fn test_flatten_strips_parent_prefix() {
        let data = json!({
            "system": {"systemLoadAverage": 1.5, "name": "Linux", "system": "x"},
            "jvm": {"memory": {"raw": {"free": 10}}, "jre": ["a", "b"]}
        });
        let flat = flatten_data(data.as_object().unwrap());
        assert_eq!(flat["SystemLoadAverage"], 1.5);
        assert_eq!(flat["SystemName"], "Linux");
        assert_eq!(flat["SystemSystem"], "x");
        assert_eq!(flat["JvmMemoryRawFree"], 10);
        assert_eq!(flat["JvmJre"], json!(["a", "b"]));
    }

    #[test]
    fn test_flatten_keeps_partial_prefix() {
        let data = json!({"jvm": {"jvmx": 1, "jvmVersion": "17"}});
        let flat = flatten_data(data.as_object().unwrap());
        assert_eq!(flat["JvmJvmx"], 1);
        assert_eq!(flat["JvmVersion"], "17");
        assert!(!flat.contains_key("Jvmx"));
    }

    #[test]
    fn test_system_result_accessors() {
        let data = json!({
            "responseHeader": {"status": 0, "QTime": 8},
            "mode": "std",
            "lucene": {
                "solr-spec-version": "9.6.1",
                "lucene-spec-version": "9.10.0"
            },
            "jvm": {"version": "17.0.11"},
            "system": {"name": "Linux"}
        });
        let result = SystemResult::from_data(data.as_object().unwrap());

        assert_eq!(result.header.query_time, Some(8));
        assert_eq!(result.mode(), Some("std"));
        assert_eq!(result.solr_spec_version(), Some("9.6.1"));
        assert_eq!(result.lucene_spec_version(), Some("9.10.0"));
        assert_eq!(result.jvm_version(), Some("17.0.11"));
        assert_eq!(result.system_name(), Some("Linux"));
        assert!(result.get("ResponseHeaderStatus").is_none());
    }
}
