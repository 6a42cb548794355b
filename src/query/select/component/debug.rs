//! Query debugging: parsed query, score explanations and timing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::request::Request;
use crate::error::Result;
use crate::query::result::object_section;

/// The debug component of a select query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Debug {
    /// Query whose matching documents are explained in addition to the
    /// results.
    pub explain_other: Option<String>,
}

impl Debug {
    pub fn new() -> Self {
        Debug::default()
    }

    pub fn set_explain_other(&mut self, query: impl Into<String>) -> &mut Self {
        self.explain_other = Some(query.into());
        self
    }

    pub(crate) fn build_params(&self, request: &mut Request) {
        request
            .add_param("debugQuery", true)
            .add_param("debug.explain.structured", true)
            .add_param_opt("explainOther", self.explain_other.as_deref());
    }

    pub(crate) fn parse(&self, data: &Map<String, Value>) -> Result<Option<DebugResult>> {
        let Some(debug) = object_section(data, "debug")? else {
            return Ok(None);
        };
        let text = |key: &str| debug.get(key).and_then(Value::as_str).map(str::to_string);

        Ok(Some(DebugResult {
            query_string: text("querystring"),
            raw_query_string: text("rawquerystring"),
            parsed_query: text("parsedquery"),
            query_parser: text("QParser"),
            other_query: text("otherQuery"),
            explain: parse_explanations(debug.get("explain")),
            explain_other: parse_explanations(debug.get("explainOther")),
            timing: debug.get("timing").and_then(Value::as_object).map(Timing::parse),
        }))
    }
}

fn parse_explanations(value: Option<&Value>) -> Vec<(String, Explanation)> {
    value
        .and_then(Value::as_object)
        .map(|explain| {
            explain
                .iter()
                .map(|(doc, value)| (doc.clone(), Explanation::parse(value)))
                .collect()
        })
        .unwrap_or_default()
}

/// A node of a structured score explanation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Explanation {
    pub matched: bool,
    pub value: f64,
    pub description: String,
    pub details: Vec<Explanation>,
}

impl Explanation {
    fn parse(value: &Value) -> Self {
        match value {
            // unstructured explain output is a plain string
            Value::String(text) => Explanation {
                matched: true,
                description: text.clone(),
                ..Explanation::default()
            },
            _ => Explanation {
                matched: value.get("match").and_then(Value::as_bool).unwrap_or(false),
                value: value.get("value").and_then(Value::as_f64).unwrap_or_default(),
                description: value
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                details: value
                    .get("details")
                    .and_then(Value::as_array)
                    .map(|details| details.iter().map(Explanation::parse).collect())
                    .unwrap_or_default(),
            },
        }
    }
}

/// Time spent per search component, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timing {
    pub time: f64,
    /// `prepare` and `process` phases.
    pub phases: Vec<TimingPhase>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingPhase {
    pub name: String,
    pub time: f64,
    pub components: Vec<(String, f64)>,
}

impl Timing {
    fn parse(timing: &Map<String, Value>) -> Self {
        let time_of = |value: &Value| value.get("time").and_then(Value::as_f64).unwrap_or_default();
        let mut result = Timing {
            time: timing.get("time").and_then(Value::as_f64).unwrap_or_default(),
            phases: Vec::new(),
        };
        for (name, phase) in timing {
            let Some(components) = phase.as_object() else {
                continue;
            };
            result.phases.push(TimingPhase {
                name: name.clone(),
                time: time_of(phase),
                components: components
                    .iter()
                    .filter(|(_, v)| v.is_object())
                    .map(|(k, v)| (k.clone(), time_of(v)))
                    .collect(),
            });
        }
        result
    }
}

/// Parsed `debug` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugResult {
    pub query_string: Option<String>,
    pub raw_query_string: Option<String>,
    pub parsed_query: Option<String>,
    pub query_parser: Option<String>,
    pub other_query: Option<String>,
    /// Explanation per document key, in result order.
    pub explain: Vec<(String, Explanation)>,
    pub explain_other: Vec<(String, Explanation)>,
    pub timing: Option<Timing>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params() {
        let mut debug = Debug::new();
        debug.set_explain_other("id:42");
        let mut request = Request::new();
        debug.build_params(&mut request);
        assert_eq!(
            request.query_string(),
            "debugQuery=true&debug.explain.structured=true&explainOther=id%3A42"
        );
    }

    #[test]
    fn test_parse() {
        let data = json!({"debug": {
            "rawquerystring": "ipod",
            "querystring": "ipod",
            "parsedquery": "text:ipod",
            "QParser": "LuceneQParser",
            "explain": {
                "IW-02": {
                    "match": true, "value": 0.5, "description": "weight(text:ipod)",
                    "details": [{"match": true, "value": 0.5, "description": "score"}]
                }
            },
            "timing": {
                "time": 3.0,
                "prepare": {"time": 1.0, "query": {"time": 1.0}, "facet": {"time": 0.0}},
                "process": {"time": 2.0, "query": {"time": 2.0}}
            }
        }});

        let result = Debug::new().parse(data.as_object().unwrap()).unwrap().unwrap();
        assert_eq!(result.parsed_query.as_deref(), Some("text:ipod"));
        assert_eq!(result.query_parser.as_deref(), Some("LuceneQParser"));

        let (doc, explanation) = &result.explain[0];
        assert_eq!(doc, "IW-02");
        assert!(explanation.matched);
        assert_eq!(explanation.details.len(), 1);

        let timing = result.timing.unwrap();
        assert_eq!(timing.time, 3.0);
        assert_eq!(timing.phases.len(), 2);
        assert_eq!(timing.phases[0].name, "prepare");
        assert_eq!(timing.phases[0].components.len(), 2);
    }

    #[test]
    fn test_missing_section() {
        assert_eq!(Debug::new().parse(&Map::new()).unwrap(), None);
    }
}
