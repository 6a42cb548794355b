//! Query types: each one builds a [`Request`](crate::client::request::Request)
//! and parses the matching [`Response`](crate::client::response::Response).

pub mod managed_resource;
pub mod ping;
#[allow(clippy::module_inception)]
pub mod query;
pub mod result;
pub mod select;
pub mod system;
pub mod update;

pub use self::managed_resource::{
    InitArgs, ManagedCommand, ManagedResource, ManagedResourceQuery, ManagedResourceResult,
    ManagedResourcesQuery, ManagedResourcesResult, ResourceType, Synonyms,
};
pub use self::ping::{PingQuery, PingResult};
pub use self::query::{Query, QueryOptions, QueryType, ResponseWriter};
pub use self::result::ResponseHeader;
pub use self::select::{SelectQuery, SelectResult};
pub use self::system::{SystemQuery, SystemResult, flatten_data};
pub use self::update::{RequestFormat, UpdateQuery, UpdateResult};
