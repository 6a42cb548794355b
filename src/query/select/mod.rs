//! Select queries and their components.

pub mod component;
#[allow(clippy::module_inception)]
pub mod query;
pub mod result;

pub use component::{
    Component, ComponentFactory, ComponentRegistry, ComponentResults, Facet, FacetField,
    FacetQuery, FacetRange, FacetResult, FacetSet, FacetSetResult, Highlighting,
    HighlightingResult, Stats, StatsField, StatsResult,
};
pub use query::{FilterQuery, QueryOperator, SelectQuery, SortOrder};
pub use result::SelectResult;
