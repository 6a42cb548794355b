//! Update queries: add, delete, commit, optimize, rollback and raw XML
//! commands, serialized as XML, JSON or CBOR.

pub mod builder;
pub mod command;
#[allow(clippy::module_inception)]
pub mod query;
pub mod result;

pub use builder::{
    CborRequestBuilder, JsonRequestBuilder, RequestFormat, UpdateRequestBuilder,
    XmlRequestBuilder,
};
pub use command::{
    AddCommand, Command, CommandType, CommitCommand, DeleteCommand, OptimizeCommand,
    RawXmlCommand, RollbackCommand,
};
pub use query::UpdateQuery;
pub use result::UpdateResult;
