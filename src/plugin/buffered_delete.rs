//! Batch deletes into delete commands.

use log::{debug, info};

use crate::client::Client;
use crate::document::FieldValue;
use crate::error::{LucernaError, Result};
use crate::plugin::buffered_add::DEFAULT_BUFFER_SIZE;
use crate::query::update::{CommitCommand, DeleteCommand, UpdateQuery, UpdateResult};

/// A buffered delete.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteEntry {
    Id(FieldValue),
    Query(String),
}

/// Collects deletes by id and by query and sends them in batches.
#[derive(Debug)]
pub struct BufferedDelete<'a> {
    client: &'a Client,
    buffer: Vec<DeleteEntry>,
    buffer_size: usize,
    endpoint: Option<String>,
}

impl<'a> BufferedDelete<'a> {
    pub fn new(client: &'a Client) -> Self {
        BufferedDelete {
            client,
            buffer: Vec::new(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            endpoint: None,
        }
    }

    pub fn set_buffer_size(&mut self, size: usize) -> Result<&mut Self> {
        if size == 0 {
            return Err(LucernaError::invalid_argument(
                "Buffer size must be at least 1",
            ));
        }
        self.buffer_size = size;
        Ok(self)
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn set_endpoint(&mut self, endpoint: Option<String>) -> &mut Self {
        self.endpoint = endpoint;
        self
    }

    pub async fn add_delete_by_id(
        &mut self,
        id: impl Into<FieldValue>,
    ) -> Result<Option<UpdateResult>> {
        self.push(DeleteEntry::Id(id.into())).await
    }

    pub async fn add_delete_query(
        &mut self,
        query: impl Into<String>,
    ) -> Result<Option<UpdateResult>> {
        self.push(DeleteEntry::Query(query.into())).await
    }

    async fn push(&mut self, entry: DeleteEntry) -> Result<Option<UpdateResult>> {
        self.buffer.push(entry);
        if self.buffer.len() >= self.buffer_size {
            self.flush().await
        } else {
            Ok(None)
        }
    }

    /// Send the buffered deletes. Returns `None` when the buffer is empty.
    pub async fn flush(&mut self) -> Result<Option<UpdateResult>> {
        if self.buffer.is_empty() {
            debug!("Buffered delete flush skipped, buffer is empty");
            return Ok(None);
        }
        let result = self.send(None).await?;
        Ok(Some(result))
    }

    /// Send the buffered deletes followed by a commit, in one request.
    pub async fn commit(
        &mut self,
        soft_commit: Option<bool>,
        wait_searcher: Option<bool>,
        expunge_deletes: Option<bool>,
    ) -> Result<UpdateResult> {
        self.send(Some(CommitCommand {
            soft_commit,
            wait_searcher,
            expunge_deletes,
        }))
        .await
    }

    pub fn clear(&mut self) -> &mut Self {
        self.buffer.clear();
        self
    }

    pub fn buffer(&self) -> &[DeleteEntry] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    async fn send(&mut self, commit: Option<CommitCommand>) -> Result<UpdateResult> {
        let mut query = UpdateQuery::new();
        if !self.buffer.is_empty() {
            let mut delete = DeleteCommand::new();
            for entry in &self.buffer {
                match entry {
                    DeleteEntry::Id(id) => delete.add_id(id.clone()),
                    DeleteEntry::Query(q) => delete.add_query(q.as_str()),
                };
            }
            query.add_command(delete);
        }
        if let Some(commit) = commit {
            query.add_command(commit);
        }

        let result = self.client.update(&query, self.endpoint.as_deref()).await?;
        info!("Flushed {} buffered deletes", self.buffer.len());
        self.buffer.clear();
        Ok(result)
    }
}
