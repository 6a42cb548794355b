//! Field statistics (`stats=true`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::request::Request;
use crate::error::{LucernaError, Result};
use crate::query::result::{as_count, object_section};

/// A field to compute statistics for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsField {
    /// Result key; defaults to the field name.
    pub key: Option<String>,
    pub field: String,
    /// Fields to break the statistics down by.
    pub facets: Vec<String>,
}

impl StatsField {
    pub fn new(field: impl Into<String>) -> Self {
        StatsField {
            field: field.into(),
            ..StatsField::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_facet(mut self, facet: impl Into<String>) -> Self {
        self.facets.push(facet.into());
        self
    }

    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.field)
    }
}

/// The stats component of a select query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    fields: Vec<StatsField>,
    /// Facets applied to every stats field.
    pub facets: Vec<String>,
}

impl Stats {
    pub fn new() -> Self {
        Stats::default()
    }

    pub fn add_field(&mut self, field: StatsField) -> Result<&mut Self> {
        if self.field(field.key()).is_some() {
            return Err(LucernaError::invalid_argument(format!(
                "Duplicate stats field key: {}",
                field.key()
            )));
        }
        self.fields.push(field);
        Ok(self)
    }

    pub fn field(&self, key: &str) -> Option<&StatsField> {
        self.fields.iter().find(|f| f.key() == key)
    }

    pub fn remove_field(&mut self, key: &str) -> Option<StatsField> {
        let index = self.fields.iter().position(|f| f.key() == key)?;
        Some(self.fields.remove(index))
    }

    pub fn fields(&self) -> &[StatsField] {
        &self.fields
    }

    pub fn add_facet(&mut self, facet: impl Into<String>) -> &mut Self {
        self.facets.push(facet.into());
        self
    }

    pub(crate) fn build_params(&self, request: &mut Request) {
        if self.fields.is_empty() {
            return;
        }
        request.add_param("stats", true);
        for field in &self.fields {
            match &field.key {
                Some(key) if *key != field.field => {
                    request.add_param("stats.field", format!("{{!key={key}}}{}", field.field))
                }
                _ => request.add_param("stats.field", &field.field),
            };
            for facet in &field.facets {
                request.add_param(format!("f.{}.stats.facet", field.field), facet);
            }
        }
        for facet in &self.facets {
            request.add_param("stats.facet", facet);
        }
    }

    pub(crate) fn parse(&self, data: &Map<String, Value>) -> Result<Option<StatsResult>> {
        let Some(stats) = object_section(data, "stats")? else {
            return Ok(None);
        };
        let Some(fields) = object_section(stats, "stats_fields")? else {
            return Ok(Some(StatsResult::default()));
        };

        let mut result = StatsResult::default();
        for (name, value) in fields {
            result.fields.push(StatsFieldResult::parse(name, value)?);
        }
        Ok(Some(result))
    }
}

/// Statistics of one field. Every value is absent when no document had
/// the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsFieldResult {
    pub name: String,
    pub min: Option<Value>,
    pub max: Option<Value>,
    pub sum: Option<Value>,
    pub count: Option<u64>,
    pub missing: Option<u64>,
    pub sum_of_squares: Option<f64>,
    pub mean: Option<Value>,
    pub stddev: Option<f64>,
    pub percentiles: Option<Value>,
    /// Per facet field, the statistics of each facet value.
    pub facets: Vec<(String, Vec<StatsFieldResult>)>,
}

impl StatsFieldResult {
    fn parse(name: &str, value: &Value) -> Result<Self> {
        let mut result = StatsFieldResult {
            name: name.to_string(),
            ..StatsFieldResult::default()
        };
        let stats = match value {
            Value::Null => return Ok(result),
            Value::Object(stats) => stats,
            other => {
                return Err(LucernaError::unexpected_value(format!(
                    "invalid stats for field '{name}': {other}"
                )));
            }
        };

        let non_null = |key: &str| stats.get(key).filter(|v| !v.is_null()).cloned();
        result.min = non_null("min");
        result.max = non_null("max");
        result.sum = non_null("sum");
        result.mean = non_null("mean");
        result.percentiles = non_null("percentiles");
        result.count = stats.get("count").and_then(as_count);
        result.missing = stats.get("missing").and_then(as_count);
        result.sum_of_squares = stats.get("sumOfSquares").and_then(Value::as_f64);
        result.stddev = stats.get("stddev").and_then(Value::as_f64);

        if let Some(facets) = stats.get("facets").and_then(Value::as_object) {
            for (facet_field, values) in facets {
                let values = values.as_object().ok_or_else(|| {
                    LucernaError::unexpected_value(format!(
                        "invalid stats facet '{facet_field}' for field '{name}'"
                    ))
                })?;
                let parsed = values
                    .iter()
                    .map(|(facet_value, stats)| StatsFieldResult::parse(facet_value, stats))
                    .collect::<Result<Vec<_>>>()?;
                result.facets.push((facet_field.clone(), parsed));
            }
        }
        Ok(result)
    }
}

/// Statistics keyed by field, in response order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsResult {
    pub fields: Vec<StatsFieldResult>,
}

impl StatsResult {
    pub fn get(&self, name: &str) -> Option<&StatsFieldResult> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params() {
        let mut stats = Stats::new();
        stats
            .add_field(StatsField::new("price").with_facet("cat"))
            .unwrap()
            .add_field(StatsField::new("popularity").with_key("pop"))
            .unwrap()
            .add_facet("inStock");

        let mut request = Request::new();
        stats.build_params(&mut request);
        assert_eq!(request.param("stats"), Some("true"));
        assert_eq!(
            request.param_values("stats.field"),
            vec!["price", "{!key=pop}popularity"]
        );
        assert_eq!(request.param("f.price.stats.facet"), Some("cat"));
        assert_eq!(request.param("stats.facet"), Some("inStock"));
    }

    #[test]
    fn test_parse_with_facets() {
        let data = json!({
            "stats": {"stats_fields": {
                "price": {
                    "min": 1.0, "max": 20.0, "sum": 30.0, "count": 3, "missing": 1,
                    "sumOfSquares": 410.0, "mean": 10.0, "stddev": 9.5,
                    "facets": {"inStock": {
                        "true": {"min": 1.0, "max": 9.0, "count": 2, "missing": 0},
                        "false": {"min": 20.0, "max": 20.0, "count": 1, "missing": 0}
                    }}
                },
                "empty": null
            }}
        });

        let mut stats = Stats::new();
        stats.add_field(StatsField::new("price")).unwrap();
        let result = stats.parse(data.as_object().unwrap()).unwrap().unwrap();

        let price = result.get("price").unwrap();
        assert_eq!(price.count, Some(3));
        assert_eq!(price.max, Some(json!(20.0)));
        assert_eq!(price.stddev, Some(9.5));
        assert_eq!(price.facets[0].0, "inStock");
        assert_eq!(price.facets[0].1[1].name, "false");

        let empty = result.get("empty").unwrap();
        assert_eq!(empty.count, None);
    }

    #[test]
    fn test_duplicate_key() {
        let mut stats = Stats::new();
        stats.add_field(StatsField::new("price")).unwrap();
        assert!(stats.add_field(StatsField::new("price")).is_err());
    }
}
