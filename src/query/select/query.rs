//! Select query.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::client::request::{Method, Request};
use crate::client::response::Response;
use crate::error::{LucernaError, Result};
use crate::query::query::{Query, QueryOptions, QueryType};
use crate::query::select::component::{
    COMPONENT_DEBUG, COMPONENT_FACETSET, COMPONENT_HIGHLIGHTING, COMPONENT_STATS, Component,
    ComponentRegistry, Debug, FacetSet, Highlighting, Stats,
};
use crate::query::select::result::SelectResult;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// Default operator between query terms (`q.op`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryOperator {
    And,
    Or,
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryOperator::And => "AND",
            QueryOperator::Or => "OR",
        })
    }
}

/// A keyed filter query, optionally tagged for facet exclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub key: String,
    pub query: String,
    pub tags: Vec<String>,
}

impl FilterQuery {
    pub fn new(key: impl Into<String>, query: impl Into<String>) -> Self {
        FilterQuery {
            key: key.into(),
            query: query.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    fn param_value(&self) -> String {
        if self.tags.is_empty() {
            self.query.clone()
        } else {
            format!("{{!tag={}}}{}", self.tags.join(","), self.query)
        }
    }
}

/// A search request against the `select` handler.
///
/// # Examples
///
/// ```
/// use lucerna::query::Query;
/// use lucerna::query::select::{FacetField, FilterQuery, SelectQuery, SortOrder};
///
/// let mut select = SelectQuery::new();
/// select
///     .set_query("title:rust")
///     .set_rows(20)
///     .add_sort("price", SortOrder::Asc)
///     .add_filter_query(FilterQuery::new("stock", "inStock:true").with_tag("stock"))
///     .unwrap();
/// select
///     .facet_set()
///     .unwrap()
///     .add_facet(FacetField::new("cat", "cat").with_exclude("stock"))
///     .unwrap();
///
/// let request = select.build_request().unwrap();
/// assert_eq!(request.param("fq"), Some("{!tag=stock}inStock:true"));
/// assert_eq!(request.param("facet"), Some("true"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    options: QueryOptions,
    query: String,
    start: u64,
    rows: u64,
    fields: Vec<String>,
    sorts: Vec<(String, SortOrder)>,
    filter_queries: Vec<FilterQuery>,
    query_default_operator: Option<QueryOperator>,
    query_default_field: Option<String>,
    cursor_mark: Option<String>,
    components: ComponentRegistry,
}

impl Default for SelectQuery {
    fn default() -> Self {
        SelectQuery {
            options: QueryOptions::new("select"),
            query: "*:*".to_string(),
            start: 0,
            rows: 10,
            fields: vec!["*".to_string(), "score".to_string()],
            sorts: Vec::new(),
            filter_queries: Vec::new(),
            query_default_operator: None,
            query_default_field: None,
            cursor_mark: None,
            components: ComponentRegistry::new(),
        }
    }
}

impl SelectQuery {
    pub fn new() -> Self {
        SelectQuery::default()
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> &mut Self {
        self.query = query.into();
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_start(&mut self, start: u64) -> &mut Self {
        self.start = start;
        self
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn set_rows(&mut self, rows: u64) -> &mut Self {
        self.rows = rows;
        self
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn set_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.fields.push(field.into());
        self
    }

    pub fn clear_fields(&mut self) -> &mut Self {
        self.fields.clear();
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Add a sort, replacing the direction if the field is already sorted on.
    pub fn add_sort(&mut self, field: impl Into<String>, order: SortOrder) -> &mut Self {
        let field = field.into();
        match self.sorts.iter_mut().find(|(f, _)| *f == field) {
            Some(sort) => sort.1 = order,
            None => self.sorts.push((field, order)),
        }
        self
    }

    pub fn remove_sort(&mut self, field: &str) -> &mut Self {
        self.sorts.retain(|(f, _)| f != field);
        self
    }

    pub fn sorts(&self) -> &[(String, SortOrder)] {
        &self.sorts
    }

    /// Add a filter query; keys must be unique.
    pub fn add_filter_query(&mut self, filter_query: FilterQuery) -> Result<&mut Self> {
        if filter_query.key.is_empty() {
            return Err(LucernaError::invalid_argument(
                "A filter query must have a key",
            ));
        }
        if self.filter_query(&filter_query.key).is_some() {
            return Err(LucernaError::invalid_argument(format!(
                "A filter query must have a unique key value within a query, duplicate: {}",
                filter_query.key
            )));
        }
        self.filter_queries.push(filter_query);
        Ok(self)
    }

    pub fn filter_query(&self, key: &str) -> Option<&FilterQuery> {
        self.filter_queries.iter().find(|fq| fq.key == key)
    }

    pub fn remove_filter_query(&mut self, key: &str) -> Option<FilterQuery> {
        let index = self.filter_queries.iter().position(|fq| fq.key == key)?;
        Some(self.filter_queries.remove(index))
    }

    pub fn filter_queries(&self) -> &[FilterQuery] {
        &self.filter_queries
    }

    pub fn set_query_default_operator(&mut self, operator: QueryOperator) -> &mut Self {
        self.query_default_operator = Some(operator);
        self
    }

    pub fn set_query_default_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.query_default_field = Some(field.into());
        self
    }

    /// Enable deep paging; start with `*` and pass on the returned mark.
    pub fn set_cursor_mark(&mut self, mark: impl Into<String>) -> &mut Self {
        self.cursor_mark = Some(mark.into());
        self
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    /// See [`ComponentRegistry::get_component`].
    pub fn get_component(
        &mut self,
        key: &str,
        autoload: bool,
        config: Option<&serde_json::Value>,
    ) -> Result<Option<&mut Component>> {
        self.components.get_component(key, autoload, config)
    }

    pub fn facet_set(&mut self) -> Result<&mut FacetSet> {
        match self.autoload(COMPONENT_FACETSET)? {
            Component::FacetSet(c) => Ok(c),
            other => Err(mismatch(COMPONENT_FACETSET, other)),
        }
    }

    pub fn stats(&mut self) -> Result<&mut Stats> {
        match self.autoload(COMPONENT_STATS)? {
            Component::Stats(c) => Ok(c),
            other => Err(mismatch(COMPONENT_STATS, other)),
        }
    }

    pub fn debug(&mut self) -> Result<&mut Debug> {
        match self.autoload(COMPONENT_DEBUG)? {
            Component::Debug(c) => Ok(c),
            other => Err(mismatch(COMPONENT_DEBUG, other)),
        }
    }

    pub fn highlighting(&mut self) -> Result<&mut Highlighting> {
        match self.autoload(COMPONENT_HIGHLIGHTING)? {
            Component::Highlighting(c) => Ok(c),
            other => Err(mismatch(COMPONENT_HIGHLIGHTING, other)),
        }
    }

    fn autoload(&mut self, key: &str) -> Result<&mut Component> {
        self.components
            .get_component(key, true, None)?
            .ok_or_else(|| LucernaError::out_of_bounds(format!("Cannot autoload component {key}")))
    }
}

fn mismatch(key: &str, found: &Component) -> LucernaError {
    LucernaError::unexpected_value(format!(
        "Component key {key} holds a {} component",
        found.component_type()
    ))
}

impl Query for SelectQuery {
    type Output = SelectResult;

    fn query_type(&self) -> QueryType {
        QueryType::Select
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
        request
            .add_param("json.nl", "flat")
            .add_param("q", &self.query)
            .add_param("start", self.start)
            .add_param("rows", self.rows);
        if !self.fields.is_empty() {
            request.add_param("fl", self.fields.join(","));
        }
        if !self.sorts.is_empty() {
            let sort = self
                .sorts
                .iter()
                .map(|(field, order)| format!("{field} {order}"))
                .collect::<Vec<_>>()
                .join(",");
            request.add_param("sort", sort);
        }
        for filter_query in &self.filter_queries {
            request.add_param("fq", filter_query.param_value());
        }
        request
            .add_param_opt("q.op", self.query_default_operator)
            .add_param_opt("df", self.query_default_field.as_deref())
            .add_param_opt("cursorMark", self.cursor_mark.as_deref());

        for (key, component) in self.components.components() {
            debug!("Adding params of component {key}");
            component.build_params(&mut request);
        }
        self.options.apply_extra_params(&mut request);
        Ok(request)
    }

    fn parse_response(&self, response: &Response) -> Result<SelectResult> {
        let data = response.data(self.options.response_writer)?;
        SelectResult::parse(data, &self.components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let request = SelectQuery::new().build_request().unwrap();
        assert_eq!(request.handler(), "select");
        assert_eq!(request.method(), Method::Get);
        assert_eq!(
            request.query_string(),
            "wt=json&json.nl=flat&q=%2A%3A%2A&start=0&rows=10&fl=%2A%2Cscore"
        );
    }

    #[test]
    fn test_full_request() {
        let mut select = SelectQuery::new();
        select
            .set_query("rust")
            .set_start(20)
            .set_fields(["id", "title"])
            .add_sort("price", SortOrder::Asc)
            .add_sort("score", SortOrder::Desc)
            .add_sort("price", SortOrder::Desc)
            .set_query_default_operator(QueryOperator::And)
            .set_query_default_field("text")
            .set_cursor_mark("*");
        select
            .add_filter_query(FilterQuery::new("a", "cat:book"))
            .unwrap()
            .add_filter_query(FilterQuery::new("b", "inStock:true").with_tag("s").with_tag("t"))
            .unwrap();
        select.debug().unwrap();

        let request = select.build_request().unwrap();
        assert_eq!(request.param("fl"), Some("id,title"));
        assert_eq!(request.param("sort"), Some("price desc,score desc"));
        assert_eq!(
            request.param_values("fq"),
            vec!["cat:book", "{!tag=s,t}inStock:true"]
        );
        assert_eq!(request.param("q.op"), Some("AND"));
        assert_eq!(request.param("df"), Some("text"));
        assert_eq!(request.param("cursorMark"), Some("*"));
        assert_eq!(request.param("debugQuery"), Some("true"));
    }

    #[test]
    fn test_duplicate_filter_query() {
        let mut select = SelectQuery::new();
        select.add_filter_query(FilterQuery::new("a", "x:1")).unwrap();
        assert!(select.add_filter_query(FilterQuery::new("a", "x:2")).is_err());
        assert!(select.remove_filter_query("a").is_some());
        assert!(select.filter_queries().is_empty());
    }

    #[test]
    fn test_typed_accessor_mismatch() {
        let mut select = SelectQuery::new();
        select
            .components_mut()
            .set_component(COMPONENT_STATS, Component::Debug(Debug::new()));
        let err = select.stats().unwrap_err();
        assert!(matches!(err, LucernaError::UnexpectedValue(_)));
    }
}
