//! Update query: an ordered list of commands sent in one request.

use crate::client::request::Request;
use crate::client::response::Response;
use crate::document::{Document, FieldValue};
use crate::error::Result;
use crate::query::query::{Query, QueryOptions, QueryType};
use crate::query::update::builder::{RequestFormat, UpdateRequestBuilder};
use crate::query::update::command::{
    AddCommand, Command, CommitCommand, DeleteCommand, OptimizeCommand, RawXmlCommand,
    RollbackCommand,
};
use crate::query::update::result::UpdateResult;

/// A batch of update commands.
///
/// Commands are executed by Solr in insertion order. A command may be stored
/// under a key so it can be looked up, replaced or removed later; replacing a
/// keyed command keeps its position.
///
/// # Examples
///
/// ```
/// use lucerna::document::Document;
/// use lucerna::query::update::{RequestFormat, UpdateQuery};
///
/// let mut doc = Document::new();
/// doc.set_field("id", "book-1", None, None);
///
/// let mut update = UpdateQuery::new();
/// update
///     .set_request_format(RequestFormat::Json)
///     .add_document(doc, Some(true), None)
///     .add_delete_query("cat:obsolete")
///     .add_commit(None, None, None);
/// assert_eq!(update.commands().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    options: QueryOptions,
    commands: Vec<(Option<String>, Command)>,
    request_format: RequestFormat,
    input_encoding: String,
}

impl Default for UpdateQuery {
    fn default() -> Self {
        let mut options = QueryOptions::new("update");
        options.omit_header = Some(false);
        UpdateQuery {
            options,
            commands: Vec::new(),
            request_format: RequestFormat::Xml,
            input_encoding: "utf-8".to_string(),
        }
    }
}

impl UpdateQuery {
    pub fn new() -> Self {
        UpdateQuery::default()
    }

    /// Append a command without a key.
    pub fn add_command(&mut self, command: impl Into<Command>) -> &mut Self {
        self.commands.push((None, command.into()));
        self
    }

    /// Store a command under `key`, replacing a command with the same key
    /// in place.
    pub fn add_command_with_key(
        &mut self,
        key: impl Into<String>,
        command: impl Into<Command>,
    ) -> &mut Self {
        let key = key.into();
        let command = command.into();
        match self
            .commands
            .iter_mut()
            .find(|(k, _)| k.as_deref() == Some(key.as_str()))
        {
            Some(entry) => entry.1 = command,
            None => self.commands.push((Some(key), command)),
        }
        self
    }

    pub fn commands(&self) -> &[(Option<String>, Command)] {
        &self.commands
    }

    pub fn command(&self, key: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|(k, _)| k.as_deref() == Some(key))
            .map(|(_, c)| c)
    }

    pub fn remove_command(&mut self, key: &str) -> Option<Command> {
        let index = self
            .commands
            .iter()
            .position(|(k, _)| k.as_deref() == Some(key))?;
        Some(self.commands.remove(index).1)
    }

    pub fn clear_commands(&mut self) -> &mut Self {
        self.commands.clear();
        self
    }

    /// Add a single document as its own add command.
    pub fn add_document(
        &mut self,
        document: Document,
        overwrite: Option<bool>,
        commit_within: Option<u64>,
    ) -> &mut Self {
        self.add_documents([document], overwrite, commit_within)
    }

    /// Add documents as one add command.
    pub fn add_documents<I: IntoIterator<Item = Document>>(
        &mut self,
        documents: I,
        overwrite: Option<bool>,
        commit_within: Option<u64>,
    ) -> &mut Self {
        let mut add = AddCommand::new();
        add.add_documents(documents);
        if let Some(overwrite) = overwrite {
            add.set_overwrite(overwrite);
        }
        if let Some(millis) = commit_within {
            add.set_commit_within(millis);
        }
        self.add_command(add)
    }

    pub fn add_delete_by_id(&mut self, id: impl Into<FieldValue>) -> &mut Self {
        let mut delete = DeleteCommand::new();
        delete.add_id(id);
        self.add_command(delete)
    }

    pub fn add_delete_by_ids<I, V>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let mut delete = DeleteCommand::new();
        delete.add_ids(ids);
        self.add_command(delete)
    }

    pub fn add_delete_query(&mut self, query: impl Into<String>) -> &mut Self {
        let mut delete = DeleteCommand::new();
        delete.add_query(query);
        self.add_command(delete)
    }

    pub fn add_delete_queries<I, S>(&mut self, queries: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut delete = DeleteCommand::new();
        delete.add_queries(queries);
        self.add_command(delete)
    }

    pub fn add_commit(
        &mut self,
        soft_commit: Option<bool>,
        wait_searcher: Option<bool>,
        expunge_deletes: Option<bool>,
    ) -> &mut Self {
        self.add_command(CommitCommand {
            soft_commit,
            wait_searcher,
            expunge_deletes,
        })
    }

    pub fn add_optimize(
        &mut self,
        soft_commit: Option<bool>,
        wait_searcher: Option<bool>,
        max_segments: Option<u32>,
    ) -> &mut Self {
        self.add_command(OptimizeCommand {
            soft_commit,
            wait_searcher,
            max_segments,
        })
    }

    pub fn add_rollback(&mut self) -> &mut Self {
        self.add_command(RollbackCommand)
    }

    /// Add a pre-built XML command, sent verbatim by the XML format.
    pub fn add_raw_xml_command(&mut self, xml: impl Into<String>) -> &mut Self {
        let mut raw = RawXmlCommand::new();
        raw.add_command(xml);
        self.add_command(raw)
    }

    pub fn set_request_format(&mut self, format: RequestFormat) -> &mut Self {
        self.request_format = format;
        self
    }

    pub fn request_format(&self) -> RequestFormat {
        self.request_format
    }

    /// Encoding of the document text. Every request format requires UTF-8.
    pub fn set_input_encoding(&mut self, encoding: impl Into<String>) -> &mut Self {
        self.input_encoding = encoding.into();
        self
    }

    pub fn input_encoding(&self) -> &str {
        &self.input_encoding
    }
}

impl Query for UpdateQuery {
    type Output = UpdateResult;

    fn query_type(&self) -> QueryType {
        QueryType::Update
    }

    fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut QueryOptions {
        &mut self.options
    }

    fn build_request(&self) -> Result<Request> {
        self.request_format.builder().build(self)
    }

    fn parse_response(&self, response: &Response) -> Result<UpdateResult> {
        UpdateResult::parse(&response.data(self.options.response_writer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::update::command::CommandType;

    #[test]
    fn test_keyed_commands_replace_in_place() {
        let mut update = UpdateQuery::new();
        update
            .add_command_with_key("first", RollbackCommand)
            .add_delete_query("*:*")
            .add_command_with_key("first", CommitCommand::new());

        let types: Vec<_> = update
            .commands()
            .iter()
            .map(|(_, c)| c.command_type())
            .collect();
        assert_eq!(types, vec![CommandType::Commit, CommandType::Delete]);

        assert!(update.remove_command("first").is_some());
        assert!(update.command("first").is_none());
        assert_eq!(update.commands().len(), 1);
    }

    #[test]
    fn test_defaults() {
        let update = UpdateQuery::new();
        assert_eq!(update.options().handler, "update");
        assert_eq!(update.options().omit_header, Some(false));
        assert_eq!(update.request_format(), RequestFormat::Xml);
        assert_eq!(update.input_encoding(), "utf-8");
        assert_eq!(update.query_type(), QueryType::Update);
    }

    #[test]
    fn test_add_documents_carries_options() {
        let mut update = UpdateQuery::new();
        update.add_documents([Document::new(), Document::new()], Some(false), Some(500));

        let Some((None, Command::Add(add))) = update.commands().first() else {
            panic!("expected an add command");
        };
        assert_eq!(add.documents().len(), 2);
        assert_eq!(add.overwrite(), Some(false));
        assert_eq!(add.commit_within(), Some(500));
    }
}
