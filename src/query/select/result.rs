//! Select response.

use serde_json::{Map, Value};

use crate::document::ReadOnlyDocument;
use crate::error::{LucernaError, Result};
use crate::query::result::{ResponseHeader, as_count, object_section};
use crate::query::select::component::{
    ComponentRegistry, ComponentResults, DebugResult, FacetSetResult, HighlightingResult,
    StatsResult,
};

/// Documents and component results of a select request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectResult {
    pub header: ResponseHeader,
    pub num_found: u64,
    pub start: u64,
    pub max_score: Option<f64>,
    pub documents: Vec<ReadOnlyDocument>,
    pub next_cursor_mark: Option<String>,
    pub components: ComponentResults,
    data: Map<String, Value>,
}

impl SelectResult {
    /// Parse decoded response data, letting each registered component read
    /// its own section.
    pub fn parse(data: Map<String, Value>, components: &ComponentRegistry) -> Result<Self> {
        let header = ResponseHeader::from_data(&data);

        let mut result = SelectResult {
            header,
            ..SelectResult::default()
        };
        if let Some(response) = object_section(&data, "response")? {
            result.num_found = response.get("numFound").and_then(as_count).unwrap_or(0);
            result.start = response.get("start").and_then(as_count).unwrap_or(0);
            result.max_score = response.get("maxScore").and_then(Value::as_f64);
            result.documents = match response.get("docs") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(docs)) => docs
                    .iter()
                    .map(|doc| match doc {
                        Value::Object(fields) => Ok(ReadOnlyDocument::new(fields.clone())),
                        other => Err(LucernaError::unexpected_value(format!(
                            "expected a document object, got {other}"
                        ))),
                    })
                    .collect::<Result<_>>()?,
                Some(other) => {
                    return Err(LucernaError::unexpected_value(format!(
                        "expected a document list, got {other}"
                    )));
                }
            };
        }
        result.next_cursor_mark = data
            .get("nextCursorMark")
            .and_then(Value::as_str)
            .map(str::to_string);

        for (_, component) in components.components() {
            component.parse(&data, &mut result.components)?;
        }
        result.data = data;
        Ok(result)
    }

    pub fn status(&self) -> Option<i64> {
        self.header.status
    }

    pub fn query_time(&self) -> Option<i64> {
        self.header.query_time
    }

    pub fn facet_set(&self) -> Option<&FacetSetResult> {
        self.components.facet_set.as_ref()
    }

    pub fn stats(&self) -> Option<&StatsResult> {
        self.components.stats.as_ref()
    }

    pub fn debug(&self) -> Option<&DebugResult> {
        self.components.debug.as_ref()
    }

    pub fn highlighting(&self) -> Option<&HighlightingResult> {
        self.components.highlighting.as_ref()
    }

    /// The complete decoded response.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReadOnlyDocument> {
        self.documents.iter()
    }
}

impl<'a> IntoIterator for &'a SelectResult {
    type Item = &'a ReadOnlyDocument;
    type IntoIter = std::slice::Iter<'a, ReadOnlyDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
