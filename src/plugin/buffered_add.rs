//! Batch documents into add commands.

use log::{debug, info};

use crate::client::Client;
use crate::document::Document;
use crate::error::{LucernaError, Result};
use crate::query::update::{CommitCommand, RequestFormat, UpdateQuery, UpdateResult};

/// Default number of buffered documents that triggers a flush.
pub const DEFAULT_BUFFER_SIZE: usize = 100;

/// Collects documents and sends them in batches of `buffer_size`.
///
/// The buffer is only cleared after Solr accepted the batch, so a failed
/// flush can be retried.
///
/// # Examples
///
/// ```no_run
/// use lucerna::client::Client;
/// use lucerna::config::ClientConfig;
/// use lucerna::document::Document;
/// use lucerna::plugin::BufferedAdd;
///
/// # async fn run() -> lucerna::error::Result<()> {
/// let client = Client::from_config(ClientConfig::default())?;
/// let mut buffer = BufferedAdd::new(&client);
/// buffer.set_buffer_size(500)?;
/// for i in 0..1200 {
///     let mut doc = Document::new();
///     doc.set_field("id", i, None, None);
///     buffer.add_document(doc).await?;
/// }
/// buffer.commit(None, None, Some(true), None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BufferedAdd<'a> {
    client: &'a Client,
    buffer: Vec<Document>,
    buffer_size: usize,
    endpoint: Option<String>,
    overwrite: Option<bool>,
    commit_within: Option<u64>,
    request_format: RequestFormat,
}

impl<'a> BufferedAdd<'a> {
    pub fn new(client: &'a Client) -> Self {
        BufferedAdd {
            client,
            buffer: Vec::new(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            endpoint: None,
            overwrite: None,
            commit_within: None,
            request_format: RequestFormat::default(),
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

    /// Send batches to a named endpoint instead of the default one.
    pub fn set_endpoint(&mut self, endpoint: Option<String>) -> &mut Self {
        self.endpoint = endpoint;
        self
    }

    /// Overwrite setting used by automatic flushes.
    pub fn set_overwrite(&mut self, overwrite: Option<bool>) -> &mut Self {
        self.overwrite = overwrite;
        self
    }

    /// commitWithin used by automatic flushes.
    pub fn set_commit_within(&mut self, millis: Option<u64>) -> &mut Self {
        self.commit_within = millis;
        self
    }

    pub fn set_request_format(&mut self, format: RequestFormat) -> &mut Self {
        self.request_format = format;
        self
    }

    pub fn request_format(&self) -> RequestFormat {
        self.request_format
    }

    /// Buffer a document, flushing when the buffer is full.
    pub async fn add_document(&mut self, document: Document) -> Result<Option<UpdateResult>> {
        self.buffer.push(document);
        if self.buffer.len() >= self.buffer_size {
            self.flush().await
        } else {
            Ok(None)
        }
    }

    /// Buffer documents, returning the result of every flush they caused.
    pub async fn add_documents<I>(&mut self, documents: I) -> Result<Vec<UpdateResult>>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut results = Vec::new();
        for document in documents {
            if let Some(result) = self.add_document(document).await? {
                results.push(result);
            }
        }
        Ok(results)
    }

    /// Send the buffered documents with the configured add options.
    pub async fn flush(&mut self) -> Result<Option<UpdateResult>> {
        self.flush_with(self.overwrite, self.commit_within).await
    }

    /// Send the buffered documents. Returns `None` when the buffer is empty.
    pub async fn flush_with(
        &mut self,
        overwrite: Option<bool>,
        commit_within: Option<u64>,
    ) -> Result<Option<UpdateResult>> {
        if self.buffer.is_empty() {
            debug!("Buffered add flush skipped, buffer is empty");
            return Ok(None);
        }
        let result = self.send(overwrite, commit_within, None).await?;
        Ok(Some(result))
    }

    /// Send the buffered documents followed by a commit, in one request.
    pub async fn commit(
        &mut self,
        overwrite: Option<bool>,
        soft_commit: Option<bool>,
        wait_searcher: Option<bool>,
        expunge_deletes: Option<bool>,
    ) -> Result<UpdateResult> {
        let commit = CommitCommand {
            soft_commit,
            wait_searcher,
            expunge_deletes,
        };
        self.send(overwrite.or(self.overwrite), None, Some(commit))
            .await
    }

    /// Drop the buffered documents without sending them.
    pub fn clear(&mut self) -> &mut Self {
        self.buffer.clear();
        self
    }

    pub fn buffer(&self) -> &[Document] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    async fn send(
        &mut self,
        overwrite: Option<bool>,
        commit_within: Option<u64>,
        commit: Option<CommitCommand>,
    ) -> Result<UpdateResult> {
        let mut query = UpdateQuery::new();
        query.set_request_format(self.request_format);
        if !self.buffer.is_empty() {
            query.add_documents(self.buffer.iter().cloned(), overwrite, commit_within);
        }
        if let Some(commit) = commit {
            query.add_command(commit);
        }

        let result = self.client.update(&query, self.endpoint.as_deref()).await?;
        info!(
            "Flushed {} buffered documents as {}",
            self.buffer.len(),
            self.request_format
        );
        self.buffer.clear();
        Ok(result)
    }
}
