//! Pieces shared by every result type.

use serde_json::{Map, Value};

use crate::error::{LucernaError, Result};

/// The `responseHeader` section of a Solr response.
///
/// Both values are absent when the request was sent with `omitHeader=true`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseHeader {
    pub status: Option<i64>,
    pub query_time: Option<i64>,
    pub params: Option<Map<String, Value>>,
}

impl ResponseHeader {
    pub fn from_data(data: &Map<String, Value>) -> Self {
        let Some(header) = data.get("responseHeader").and_then(Value::as_object) else {
            return ResponseHeader::default();
        };
        ResponseHeader {
            status: header.get("status").and_then(Value::as_i64),
            query_time: header.get("QTime").and_then(Value::as_i64),
            params: header.get("params").and_then(Value::as_object).cloned(),
        }
    }

    /// Solr reports success with status 0.
    pub fn is_ok(&self) -> bool {
        self.status.is_none_or(|status| status == 0)
    }
}

/// Read a count that Solr may write as a number or, in some admin
/// handlers, as a string.
pub(crate) fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Read a section that must be a JSON object when present.
pub(crate) fn object_section<'a>(
    data: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(LucernaError::unexpected_value(format!(
            "expected '{key}' to be an object, got {other}"
        ))),
    }
}

/// Read a named list written either flat (`[name, value, name, value]`,
/// `json.nl=flat`) or as an object (`json.nl=map`).
pub(crate) fn named_list(value: &Value) -> Result<Vec<(String, Value)>> {
    match value {
        Value::Object(map) => Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
        Value::Array(items) => {
            if items.len() % 2 != 0 {
                return Err(LucernaError::unexpected_value(
                    "flat named list has an odd number of entries",
                ));
            }
            items
                .chunks(2)
                .map(|pair| {
                    let name = match &pair[0] {
                        Value::String(s) => s.clone(),
                        // the "missing" bucket of a facet has no name
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    Ok((name, pair[1].clone()))
                })
                .collect()
        }
        other => Err(LucernaError::unexpected_value(format!(
            "expected a named list, got {other}"
        ))),
    }
}

/// A named list whose values are all counts.
pub(crate) fn named_counts(value: &Value) -> Result<Vec<(String, u64)>> {
    named_list(value)?
        .into_iter()
        .map(|(name, count)| {
            as_count(&count)
                .map(|count| (name.clone(), count))
                .ok_or_else(|| {
                    LucernaError::unexpected_value(format!("invalid count for '{name}': {count}"))
                })
        })
        .collect()
}
