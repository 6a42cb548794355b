//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cli::args::{LucernaArgs, OutputFormat};
use crate::error::Result;

/// Result structure for ping.
#[derive(Debug, Serialize, Deserialize)]
pub struct PingOutput {
    pub status: String,
    pub query_time_ms: Option<i64>,
}

/// Facet counts for one facet field.
#[derive(Debug, Serialize, Deserialize)]
pub struct FacetOutput {
    pub key: String,
    pub values: Vec<(String, u64)>,
}

/// Result structure for select queries.
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectOutput {
    pub num_found: u64,
    pub start: u64,
    pub max_score: Option<f64>,
    pub query_time_ms: Option<i64>,
    pub documents: Vec<Map<String, Value>>,
    pub facets: Vec<FacetOutput>,
}

/// Result structure for document updates.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSummary {
    pub documents: usize,
    pub batches: usize,
    pub format: String,
    pub committed: bool,
    pub duration_ms: u64,
}

/// Result structure for deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteSummary {
    pub ids: usize,
    pub queries: usize,
    pub committed: bool,
    pub query_time_ms: Option<i64>,
}

/// A request printed instead of sent.
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestPreview {
    pub method: String,
    pub uri: String,
    pub content_type: Option<String>,
    /// Body text, when the body is UTF-8.
    pub body: Option<String>,
    pub body_bytes: usize,
}

/// Result structure for stopword listings.
#[derive(Debug, Serialize, Deserialize)]
pub struct StopwordsOutput {
    pub name: String,
    pub ignore_case: Option<bool>,
    pub updated_since_init: Option<String>,
    pub words: Vec<String>,
}

/// Result structure for managed resource commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandOutput {
    pub command: String,
    pub successful: bool,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &LucernaArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &LucernaArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match value.as_object() {
        Some(obj) if obj.contains_key("documents") && obj.contains_key("num_found") => {
            output_select_human(obj)
        }
        _ => output_generic_human(&value),
    }
    Ok(())
}

/// Output select results in human format.
fn output_select_human(obj: &Map<String, Value>) {
    if let Some(docs) = obj.get("documents").and_then(|d| d.as_array()) {
        println!("Documents:");
        println!("══════════");

        for (i, doc) in docs.iter().enumerate() {
            println!();
            match doc.get("score").and_then(|s| s.as_f64()) {
                Some(score) => println!("Document {}: (Score: {score:.3})", i + 1),
                None => println!("Document {}:", i + 1),
            }
            println!("─────────────");

            if let Some(fields) = doc.as_object() {
                for (field_name, field_value) in fields {
                    if field_name != "score" {
                        println!("{field_name}: {}", format_value(field_value));
                    }
                }
            }
        }
        println!();
    }

    if let Some(total) = obj.get("num_found").and_then(|t| t.as_u64()) {
        println!("Found: {total}");
    }
    if let Some(time) = obj.get("query_time_ms").and_then(|t| t.as_i64()) {
        println!("Query time: {time}ms");
    }

    if let Some(facets) = obj.get("facets").and_then(|f| f.as_array()) {
        if facets.is_empty() {
            return;
        }
        println!();
        println!("Facets:");
        println!("───────");
        for facet in facets {
            let key = facet.get("key").and_then(|k| k.as_str()).unwrap_or("unknown");
            println!("{key}:");
            if let Some(values) = facet.get("values").and_then(|v| v.as_array()) {
                for value in values {
                    if let Some(pair) = value.as_array()
                        && pair.len() >= 2
                    {
                        let label = pair[0].as_str().unwrap_or("unknown");
                        let count = pair[1].as_u64().unwrap_or(0);
                        println!("  {label} ({count})");
                    }
                }
            }
        }
    }
}

/// Output generic data in human format.
fn output_generic_human(value: &Value) {
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                println!("{key}: {}", format_value(val));
            }
        }
        _ => println!("{}", format_value(value)),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LucernaArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        Value::Object(_) => "[object]".to_string(),
        Value::Null => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("test")), "test");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!(false)), "false");
        assert_eq!(format_value(&json!(["a", 1])), "[a, 1]");
        assert_eq!(format_value(&json!({"a": 1})), "[object]");
        assert_eq!(format_value(&Value::Null), "null");
    }

    #[test]
    fn test_select_output_serialization() {
        let output = SelectOutput {
            num_found: 1,
            start: 0,
            max_score: None,
            query_time_ms: Some(3),
            documents: vec![json!({"id": "1"}).as_object().unwrap().clone()],
            facets: vec![FacetOutput {
                key: "cat".to_string(),
                values: vec![("book".to_string(), 4)],
            }],
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["facets"][0]["values"], json!([["book", 4]]));
        assert_eq!(value["documents"][0]["id"], "1");
    }
}
