//! Faceting: field, query and range facets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::request::Request;
use crate::error::{LucernaError, Result};
use crate::query::result::{as_count, named_counts, object_section};

/// Local params prefix `{!key=k ex=a,b}`.
fn local_params(key: &str, exclude: &[String]) -> String {
    if exclude.is_empty() {
        format!("{{!key={key}}}")
    } else {
        format!("{{!key={key} ex={}}}", exclude.join(","))
    }
}

/// Facet counts over the terms of a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetField {
    pub key: String,
    pub field: String,
    pub prefix: Option<String>,
    /// `count` or `index`.
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<u64>,
    pub min_count: Option<u64>,
    pub missing: Option<bool>,
    /// Filter query tags to exclude.
    pub exclude: Vec<String>,
}

impl FacetField {
    pub fn new(key: impl Into<String>, field: impl Into<String>) -> Self {
        FacetField {
            key: key.into(),
            field: field.into(),
            ..FacetField::default()
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_min_count(mut self, min_count: u64) -> Self {
        self.min_count = Some(min_count);
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_exclude(mut self, tag: impl Into<String>) -> Self {
        self.exclude.push(tag.into());
        self
    }

    fn build_params(&self, request: &mut Request) {
        let field = &self.field;
        request.add_param(
            "facet.field",
            format!("{}{field}", local_params(&self.key, &self.exclude)),
        );
        request
            .add_param_opt(&format!("f.{field}.facet.prefix"), self.prefix.as_deref())
            .add_param_opt(&format!("f.{field}.facet.sort"), self.sort.as_deref())
            .add_param_opt(&format!("f.{field}.facet.limit"), self.limit)
            .add_param_opt(&format!("f.{field}.facet.offset"), self.offset)
            .add_param_opt(&format!("f.{field}.facet.mincount"), self.min_count)
            .add_param_opt(&format!("f.{field}.facet.missing"), self.missing);
    }
}

/// Count of documents matching an arbitrary query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetQuery {
    pub key: String,
    pub query: String,
    pub exclude: Vec<String>,
}

impl FacetQuery {
    pub fn new(key: impl Into<String>, query: impl Into<String>) -> Self {
        FacetQuery {
            key: key.into(),
            query: query.into(),
            exclude: Vec::new(),
        }
    }

    fn build_params(&self, request: &mut Request) {
        request.add_param(
            "facet.query",
            format!("{}{}", local_params(&self.key, &self.exclude), self.query),
        );
    }
}

/// Counts over consecutive ranges of a numeric or date field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetRange {
    pub key: String,
    pub field: String,
    pub start: String,
    pub end: String,
    pub gap: String,
    pub hard_end: Option<bool>,
    /// `before`, `after`, `between`, `none` or `all`.
    pub other: Vec<String>,
    /// `lower`, `upper`, `edge`, `outer` or `all`.
    pub include: Vec<String>,
    pub min_count: Option<u64>,
    pub exclude: Vec<String>,
}

impl FacetRange {
    pub fn new(
        key: impl Into<String>,
        field: impl Into<String>,
        start: impl ToString,
        end: impl ToString,
        gap: impl ToString,
    ) -> Self {
        FacetRange {
            key: key.into(),
            field: field.into(),
            start: start.to_string(),
            end: end.to_string(),
            gap: gap.to_string(),
            ..FacetRange::default()
        }
    }

    pub fn with_other(mut self, other: impl Into<String>) -> Self {
        self.other.push(other.into());
        self
    }

    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include.push(include.into());
        self
    }

    fn build_params(&self, request: &mut Request) {
        let field = &self.field;
        request
            .add_param(
                "facet.range",
                format!("{}{field}", local_params(&self.key, &self.exclude)),
            )
            .add_param(format!("f.{field}.facet.range.start"), &self.start)
            .add_param(format!("f.{field}.facet.range.end"), &self.end)
            .add_param(format!("f.{field}.facet.range.gap"), &self.gap)
            .add_param_opt(&format!("f.{field}.facet.range.hardend"), self.hard_end);
        for other in &self.other {
            request.add_param(format!("f.{field}.facet.range.other"), other);
        }
        for include in &self.include {
            request.add_param(format!("f.{field}.facet.range.include"), include);
        }
        request.add_param_opt(&format!("f.{field}.facet.mincount"), self.min_count);
    }
}

/// One facet of a facet set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Facet {
    Field(FacetField),
    Query(FacetQuery),
    Range(FacetRange),
}

impl Facet {
    pub fn key(&self) -> &str {
        match self {
            Facet::Field(f) => &f.key,
            Facet::Query(f) => &f.key,
            Facet::Range(f) => &f.key,
        }
    }
}

impl From<FacetField> for Facet {
    fn from(facet: FacetField) -> Self {
        Facet::Field(facet)
    }
}

impl From<FacetQuery> for Facet {
    fn from(facet: FacetQuery) -> Self {
        Facet::Query(facet)
    }
}

impl From<FacetRange> for Facet {
    fn from(facet: FacetRange) -> Self {
        Facet::Range(facet)
    }
}

/// The facet component of a select query.
///
/// Global settings apply to every field facet unless the facet overrides
/// them. Facet keys are unique within a set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetSet {
    pub prefix: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub min_count: Option<u64>,
    pub missing: Option<bool>,
    facets: Vec<Facet>,
}

impl FacetSet {
    pub fn new() -> Self {
        FacetSet::default()
    }

    /// Add a facet; keys must be unique.
    pub fn add_facet(&mut self, facet: impl Into<Facet>) -> Result<&mut Self> {
        let facet = facet.into();
        if facet.key().is_empty() {
            return Err(LucernaError::invalid_argument("A facet must have a key"));
        }
        if self.facet(facet.key()).is_some() {
            return Err(LucernaError::invalid_argument(format!(
                "A facet must have a unique key value within a query, duplicate: {}",
                facet.key()
            )));
        }
        self.facets.push(facet);
        Ok(self)
    }

    pub fn facet(&self, key: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.key() == key)
    }

    pub fn remove_facet(&mut self, key: &str) -> Option<Facet> {
        let index = self.facets.iter().position(|f| f.key() == key)?;
        Some(self.facets.remove(index))
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn clear_facets(&mut self) -> &mut Self {
        self.facets.clear();
        self
    }

    pub(crate) fn build_params(&self, request: &mut Request) {
        if self.facets.is_empty() {
            return;
        }
        request
            .add_param("facet", true)
            .add_param_opt("facet.prefix", self.prefix.as_deref())
            .add_param_opt("facet.sort", self.sort.as_deref())
            .add_param_opt("facet.limit", self.limit)
            .add_param_opt("facet.mincount", self.min_count)
            .add_param_opt("facet.missing", self.missing);

        for facet in &self.facets {
            match facet {
                Facet::Field(f) => f.build_params(request),
                Facet::Query(f) => f.build_params(request),
                Facet::Range(f) => f.build_params(request),
            }
        }
    }

    /// Read the `facet_counts` section for the facets of this set.
    pub(crate) fn parse(&self, data: &Map<String, Value>) -> Result<Option<FacetSetResult>> {
        let Some(counts) = object_section(data, "facet_counts")? else {
            return Ok(None);
        };

        let mut result = FacetSetResult::default();
        for facet in &self.facets {
            let key = facet.key();
            let parsed = match facet {
                Facet::Field(_) => counts
                    .get("facet_fields")
                    .and_then(|fields| fields.get(key))
                    .map(|values| {
                        named_counts(values).map(|values| FacetResult::Field { values })
                    })
                    .transpose()?,
                Facet::Query(_) => counts
                    .get("facet_queries")
                    .and_then(|queries| queries.get(key))
                    .and_then(as_count)
                    .map(|count| FacetResult::Query { count }),
                Facet::Range(_) => counts
                    .get("facet_ranges")
                    .and_then(|ranges| ranges.get(key))
                    .map(parse_range)
                    .transpose()?,
            };
            if let Some(parsed) = parsed {
                result.facets.push((key.to_string(), parsed));
            }
        }
        Ok(Some(result))
    }
}

fn parse_range(value: &Value) -> Result<FacetResult> {
    let counts = match value.get("counts") {
        Some(counts) => named_counts(counts)?,
        None => Vec::new(),
    };
    let count = |name: &str| value.get(name).and_then(as_count);
    Ok(FacetResult::Range {
        values: counts,
        before: count("before"),
        after: count("after"),
        between: count("between"),
        start: value.get("start").cloned(),
        end: value.get("end").cloned(),
        gap: value.get("gap").cloned(),
    })
}

/// Parsed result of one facet.
#[derive(Debug, Clone, PartialEq)]
pub enum FacetResult {
    /// Value/count pairs in Solr's order.
    Field { values: Vec<(String, u64)> },
    Query { count: u64 },
    Range {
        values: Vec<(String, u64)>,
        before: Option<u64>,
        after: Option<u64>,
        between: Option<u64>,
        start: Option<Value>,
        end: Option<Value>,
        gap: Option<Value>,
    },
}

impl FacetResult {
    /// Value/count pairs of a field or range facet.
    pub fn values(&self) -> &[(String, u64)] {
        match self {
            FacetResult::Field { values } | FacetResult::Range { values, .. } => values,
            FacetResult::Query { .. } => &[],
        }
    }

    /// Count of a query facet.
    pub fn count(&self) -> Option<u64> {
        match self {
            FacetResult::Query { count } => Some(*count),
            _ => None,
        }
    }
}

/// Facet results keyed by facet key, in facet set order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetSetResult {
    pub facets: Vec<(String, FacetResult)>,
}

impl FacetSetResult {
    pub fn get(&self, key: &str) -> Option<&FacetResult> {
        self.facets.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }
}
