//! # Lucerna
//!
//! A typed client for the Apache Solr REST API.
//!
//! ## Features
//!
//! - Update documents with atomic-update modifiers and field boosts
//! - XML, JSON and CBOR update request bodies
//! - Select queries with facet, stats, debug and highlighting components
//! - Ping, system information and managed stopword/synonym resources
//! - Pluggable HTTP adapter with request hooks and write buffering

pub mod cli;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod plugin;
pub mod query;

pub mod prelude {
    pub use crate::client::{Adapter, Client, Endpoint, Request, Response};
    pub use crate::config::ClientConfig;
    pub use crate::document::{Document, Field, FieldValue, Modifier, ReadOnlyDocument};
    pub use crate::error::{LucernaError, Result};
    pub use crate::query::{
        PingQuery, Query, RequestFormat, SelectQuery, SystemQuery, UpdateQuery,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
