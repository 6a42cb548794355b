//! Select query components and their registry.
//!
//! Components add parameters to a select request and parse their own part of
//! the response. A query keeps them in a [`ComponentRegistry`] keyed by
//! component type; each is created on first access from a factory function
//! and then reused.

use ahash::AHashMap;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::client::request::Request;
use crate::error::{LucernaError, Result};

pub mod debug;
pub mod facet_set;
pub mod highlighting;
pub mod stats;

pub use self::debug::{Debug, DebugResult, Explanation, Timing, TimingPhase};
pub use self::facet_set::{
    Facet, FacetField, FacetQuery, FacetRange, FacetResult, FacetSet, FacetSetResult,
};
pub use self::highlighting::{HighlightedDocument, Highlighting, HighlightingResult};
pub use self::stats::{Stats, StatsField, StatsFieldResult, StatsResult};

pub const COMPONENT_FACETSET: &str = "facetset";
pub const COMPONENT_STATS: &str = "stats";
pub const COMPONENT_DEBUG: &str = "debug";
pub const COMPONENT_HIGHLIGHTING: &str = "highlighting";

/// A select query component.
#[derive(Clone, PartialEq, std::fmt::Debug)]
pub enum Component {
    FacetSet(FacetSet),
    Stats(Stats),
    Debug(Debug),
    Highlighting(Highlighting),
}

impl Component {
    /// Registry key of this component's type.
    pub fn component_type(&self) -> &'static str {
        match self {
            Component::FacetSet(_) => COMPONENT_FACETSET,
            Component::Stats(_) => COMPONENT_STATS,
            Component::Debug(_) => COMPONENT_DEBUG,
            Component::Highlighting(_) => COMPONENT_HIGHLIGHTING,
        }
    }

    pub fn build_params(&self, request: &mut Request) {
        match self {
            Component::FacetSet(c) => c.build_params(request),
            Component::Stats(c) => c.build_params(request),
            Component::Debug(c) => c.build_params(request),
            Component::Highlighting(c) => c.build_params(request),
        }
    }

    /// Parse this component's section of `data` into `results`.
    pub fn parse(&self, data: &Map<String, Value>, results: &mut ComponentResults) -> Result<()> {
        match self {
            Component::FacetSet(c) => results.facet_set = c.parse(data)?,
            Component::Stats(c) => results.stats = c.parse(data)?,
            Component::Debug(c) => results.debug = c.parse(data)?,
            Component::Highlighting(c) => results.highlighting = c.parse(data)?,
        }
        Ok(())
    }
}

/// Builds a component from optional JSON configuration.
pub type ComponentFactory = fn(Option<&Value>) -> Result<Component>;

fn from_config<T: DeserializeOwned + Default>(config: Option<&Value>) -> Result<T> {
    match config {
        Some(config) => Ok(serde_json::from_value(config.clone())?),
        None => Ok(T::default()),
    }
}

fn facet_set_factory(config: Option<&Value>) -> Result<Component> {
    from_config(config).map(Component::FacetSet)
}

fn stats_factory(config: Option<&Value>) -> Result<Component> {
    from_config(config).map(Component::Stats)
}

fn debug_factory(config: Option<&Value>) -> Result<Component> {
    from_config(config).map(Component::Debug)
}

fn highlighting_factory(config: Option<&Value>) -> Result<Component> {
    from_config(config).map(Component::Highlighting)
}

/// Components of one query plus the factories that can create them.
#[derive(Clone, std::fmt::Debug)]
pub struct ComponentRegistry {
    types: AHashMap<String, ComponentFactory>,
    components: Vec<(String, Component)>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        let mut types: AHashMap<String, ComponentFactory> = AHashMap::new();
        types.insert(COMPONENT_FACETSET.to_string(), facet_set_factory);
        types.insert(COMPONENT_STATS.to_string(), stats_factory);
        types.insert(COMPONENT_DEBUG.to_string(), debug_factory);
        types.insert(COMPONENT_HIGHLIGHTING.to_string(), highlighting_factory);
        ComponentRegistry {
            types,
            components: Vec::new(),
        }
    }
}

impl PartialEq for ComponentRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl ComponentRegistry {
    pub fn new() -> Self {
        ComponentRegistry::default()
    }

    /// Get the component stored under `key`.
    ///
    /// A missing component is created from its registered factory when
    /// `autoload` is set, otherwise `None` is returned. Autoloading a key
    /// without a registered type is an out-of-bounds error.
    pub fn get_component(
        &mut self,
        key: &str,
        autoload: bool,
        config: Option<&Value>,
    ) -> Result<Option<&mut Component>> {
        if let Some(index) = self.position(key) {
            return Ok(Some(&mut self.components[index].1));
        }
        if !autoload {
            return Ok(None);
        }

        let factory = self.types.get(key).ok_or_else(|| {
            LucernaError::out_of_bounds(format!("Cannot autoload unknown component: {key}"))
        })?;
        let component = factory(config)?;
        debug!("Autoloaded component {key}");
        self.components.push((key.to_string(), component));
        Ok(self.components.last_mut().map(|(_, c)| c))
    }

    /// The component stored under `key`, if any.
    pub fn component(&self, key: &str) -> Option<&Component> {
        self.position(key).map(|index| &self.components[index].1)
    }

    /// Store `component` under `key`, replacing any previous one in place.
    pub fn set_component(&mut self, key: impl Into<String>, component: Component) -> &mut Self {
        let key = key.into();
        match self.position(&key) {
            Some(index) => self.components[index].1 = component,
            None => self.components.push((key, component)),
        }
        self
    }

    pub fn remove_component(&mut self, key: &str) -> Option<Component> {
        let index = self.position(key)?;
        Some(self.components.remove(index).1)
    }

    /// Remove the entry holding a component equal to `component`.
    pub fn remove_component_instance(&mut self, component: &Component) -> Option<Component> {
        let index = self.components.iter().position(|(_, c)| c == component)?;
        Some(self.components.remove(index).1)
    }

    /// Make `factory` available for autoloading under `key`.
    pub fn register_component_type(
        &mut self,
        key: impl Into<String>,
        factory: ComponentFactory,
    ) -> &mut Self {
        self.types.insert(key.into(), factory);
        self
    }

    /// Registered component type keys, sorted.
    pub fn component_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.types.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Stored components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = (&str, &Component)> {
        self.components.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.components.iter().position(|(k, _)| k == key)
    }
}

/// Per-component results of a select response.
#[derive(Clone, Default, PartialEq, std::fmt::Debug)]
pub struct ComponentResults {
    pub facet_set: Option<FacetSetResult>,
    pub stats: Option<StatsResult>,
    pub debug: Option<DebugResult>,
    pub highlighting: Option<HighlightingResult>,
}
