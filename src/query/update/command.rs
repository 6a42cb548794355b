//! Commands carried by an update query.

use std::fmt;

use crate::document::{Document, FieldValue};

/// The kind of an update command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Add,
    Delete,
    Commit,
    Optimize,
    Rollback,
    RawXml,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Add => "add",
            CommandType::Delete => "delete",
            CommandType::Commit => "commit",
            CommandType::Optimize => "optimize",
            CommandType::Rollback => "rollback",
            CommandType::RawXml => "rawxml",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One command of an update query.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(AddCommand),
    Delete(DeleteCommand),
    Commit(CommitCommand),
    Optimize(OptimizeCommand),
    Rollback(RollbackCommand),
    RawXml(RawXmlCommand),
}

impl Command {
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Add(_) => CommandType::Add,
            Command::Delete(_) => CommandType::Delete,
            Command::Commit(_) => CommandType::Commit,
            Command::Optimize(_) => CommandType::Optimize,
            Command::Rollback(_) => CommandType::Rollback,
            Command::RawXml(_) => CommandType::RawXml,
        }
    }
}

macro_rules! impl_into_command {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Command {
                fn from(command: $ty) -> Self {
                    Command::$variant(command)
                }
            }
        )*
    };
}

impl_into_command! {
    AddCommand => Add,
    DeleteCommand => Delete,
    CommitCommand => Commit,
    OptimizeCommand => Optimize,
    RollbackCommand => Rollback,
    RawXmlCommand => RawXml,
}

/// Add documents to the index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddCommand {
    documents: Vec<Document>,
    overwrite: Option<bool>,
    commit_within: Option<u64>,
}

impl AddCommand {
    pub fn new() -> Self {
        AddCommand::default()
    }

    pub fn add_document(&mut self, document: Document) -> &mut Self {
        self.documents.push(document);
        self
    }

    pub fn add_documents<I: IntoIterator<Item = Document>>(&mut self, documents: I) -> &mut Self {
        self.documents.extend(documents);
        self
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn clear(&mut self) -> &mut Self {
        self.documents.clear();
        self
    }

    /// Whether documents with an existing unique key replace the stored one.
    pub fn set_overwrite(&mut self, overwrite: bool) -> &mut Self {
        self.overwrite = Some(overwrite);
        self
    }

    pub fn overwrite(&self) -> Option<bool> {
        self.overwrite
    }

    /// Ask Solr to commit within `millis` milliseconds.
    pub fn set_commit_within(&mut self, millis: u64) -> &mut Self {
        self.commit_within = Some(millis);
        self
    }

    pub fn commit_within(&self) -> Option<u64> {
        self.commit_within
    }
}

/// Delete documents by unique key and/or by query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteCommand {
    ids: Vec<FieldValue>,
    queries: Vec<String>,
}

impl DeleteCommand {
    pub fn new() -> Self {
        DeleteCommand::default()
    }

    pub fn add_id(&mut self, id: impl Into<FieldValue>) -> &mut Self {
        self.ids.push(id.into());
        self
    }

    pub fn add_ids<I, V>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn ids(&self) -> &[FieldValue] {
        &self.ids
    }

    pub fn add_query(&mut self, query: impl Into<String>) -> &mut Self {
        self.queries.push(query.into());
        self
    }

    pub fn add_queries<I, S>(&mut self, queries: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queries.extend(queries.into_iter().map(Into::into));
        self
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.queries.is_empty()
    }
}

/// Make pending changes visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitCommand {
    pub soft_commit: Option<bool>,
    pub wait_searcher: Option<bool>,
    pub expunge_deletes: Option<bool>,
}

impl CommitCommand {
    pub fn new() -> Self {
        CommitCommand::default()
    }

    pub fn with_soft_commit(mut self, soft_commit: bool) -> Self {
        self.soft_commit = Some(soft_commit);
        self
    }

    pub fn with_wait_searcher(mut self, wait_searcher: bool) -> Self {
        self.wait_searcher = Some(wait_searcher);
        self
    }

    pub fn with_expunge_deletes(mut self, expunge_deletes: bool) -> Self {
        self.expunge_deletes = Some(expunge_deletes);
        self
    }
}

/// Merge index segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizeCommand {
    pub soft_commit: Option<bool>,
    pub wait_searcher: Option<bool>,
    pub max_segments: Option<u32>,
}

impl OptimizeCommand {
    pub fn new() -> Self {
        OptimizeCommand::default()
    }

    pub fn with_soft_commit(mut self, soft_commit: bool) -> Self {
        self.soft_commit = Some(soft_commit);
        self
    }

    pub fn with_wait_searcher(mut self, wait_searcher: bool) -> Self {
        self.wait_searcher = Some(wait_searcher);
        self
    }

    pub fn with_max_segments(mut self, max_segments: u32) -> Self {
        self.max_segments = Some(max_segments);
        self
    }
}

/// Discard uncommitted changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollbackCommand;

/// Pre-built XML command fragments, sent verbatim.
///
/// Only the XML request format can carry them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawXmlCommand {
    commands: Vec<String>,
}

impl RawXmlCommand {
    pub fn new() -> Self {
        RawXmlCommand::default()
    }

    pub fn add_command(&mut self, xml: impl Into<String>) -> &mut Self {
        self.commands.push(xml.into());
        self
    }

    pub fn add_commands<I, S>(&mut self, commands: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.extend(commands.into_iter().map(Into::into));
        self
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_types() {
        assert_eq!(
            Command::from(AddCommand::new()).command_type(),
            CommandType::Add
        );
        assert_eq!(Command::from(RollbackCommand).command_type().as_str(), "rollback");
        assert_eq!(CommandType::RawXml.to_string(), "rawxml");
    }

    #[test]
    fn test_delete_command() {
        let mut delete = DeleteCommand::new();
        assert!(delete.is_empty());
        delete.add_ids(["a", "b"]).add_id(3).add_query("cat:old");
        assert_eq!(delete.ids().len(), 3);
        assert_eq!(delete.ids()[2], FieldValue::Integer(3));
        assert_eq!(delete.queries(), &["cat:old".to_string()]);
    }

    #[test]
    fn test_commit_builders() {
        let commit = CommitCommand::new()
            .with_soft_commit(true)
            .with_expunge_deletes(false);
        assert_eq!(commit.soft_commit, Some(true));
        assert_eq!(commit.wait_searcher, None);
        assert_eq!(commit.expunge_deletes, Some(false));
    }
}
