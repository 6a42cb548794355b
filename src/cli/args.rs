//! Command line argument parsing for the Lucerna CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::query::update::RequestFormat;

/// Lucerna - talk to Apache Solr from the command line
#[derive(Parser, Debug, Clone)]
#[command(name = "lucerna")]
#[command(about = "Query and update Apache Solr cores from the command line")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LucernaArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'o', long = "output", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Client configuration file (JSON)
    #[arg(short, long, env = "LUCERNA_CONFIG", value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Named endpoint from the configuration file
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Solr host, overrides the endpoint's host
    #[arg(long, env = "SOLR_HOST")]
    pub host: Option<String>,

    /// Solr port, overrides the endpoint's port
    #[arg(long, env = "SOLR_PORT")]
    pub port: Option<u16>,

    /// Solr core, overrides the endpoint's core
    #[arg(long, env = "SOLR_CORE")]
    pub core: Option<String>,

    /// SolrCloud collection, overrides the endpoint's collection
    #[arg(long, env = "SOLR_COLLECTION")]
    pub collection: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LucernaArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// Whether any endpoint setting was given on the command line.
    pub fn has_endpoint_overrides(&self) -> bool {
        self.host.is_some()
            || self.port.is_some()
            || self.core.is_some()
            || self.collection.is_some()
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check that the core is reachable
    Ping,

    /// Run a select query
    Select(SelectArgs),

    /// Send documents from a JSONL file
    Update(UpdateArgs),

    /// Delete documents by id or query
    Delete(DeleteArgs),

    /// Show Solr, Lucene and JVM information
    System,

    /// Manage a stopword list
    Stopwords(StopwordsArgs),
}

/// Arguments for select queries
#[derive(Parser, Debug, Clone)]
pub struct SelectArgs {
    /// Query string
    #[arg(value_name = "QUERY", default_value = "*:*")]
    pub query: String,

    /// Maximum number of documents to return
    #[arg(short, long, default_value = "10")]
    pub rows: u64,

    /// Offset for pagination
    #[arg(short, long, default_value = "0")]
    pub start: u64,

    /// Fields to return (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Filter queries, may be repeated
    #[arg(long = "fq")]
    pub filter_queries: Vec<String>,

    /// Sort clauses as FIELD or FIELD:desc, may be repeated
    #[arg(long)]
    pub sort: Vec<String>,

    /// Facet fields to collect (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub facet_fields: Vec<String>,

    /// Default search field
    #[arg(long)]
    pub df: Option<String>,
}

/// Arguments for sending documents
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Document file path (JSONL)
    #[arg(value_name = "DOCUMENT_FILE")]
    pub document_file: PathBuf,

    /// Request body format
    #[arg(short, long, default_value = "xml")]
    pub format: UpdateFormat,

    /// Documents per request
    #[arg(short, long, default_value = "100")]
    pub batch_size: usize,

    /// Unique key field, required for atomic updates
    #[arg(short, long)]
    pub key: Option<String>,

    /// Overwrite documents with the same unique key
    #[arg(long)]
    pub overwrite: Option<bool>,

    /// Ask Solr to commit within this many milliseconds
    #[arg(long)]
    pub commit_within: Option<u64>,

    /// Commit after the last batch
    #[arg(long)]
    pub commit: bool,

    /// Print the first request instead of sending anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for deletes
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Document ids, may be repeated
    #[arg(long = "id")]
    pub ids: Vec<String>,

    /// Delete queries, may be repeated
    #[arg(long = "query")]
    pub queries: Vec<String>,

    /// Commit after deleting
    #[arg(long)]
    pub commit: bool,

    /// Print the request instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for stopword management
#[derive(Parser, Debug, Clone)]
pub struct StopwordsArgs {
    /// Name of the managed stopword resource
    #[arg(value_name = "NAME")]
    pub name: String,

    #[command(subcommand)]
    pub action: StopwordsAction,
}

/// Stopword actions
#[derive(Subcommand, Debug, Clone)]
pub enum StopwordsAction {
    /// List the stopwords
    List,
    /// Add stopwords
    Add {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Delete a stopword
    Delete { word: String },
    /// Check whether a stopword exists
    Exists { word: String },
}

/// Update request body formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateFormat {
    Xml,
    Json,
    Cbor,
}

impl From<UpdateFormat> for RequestFormat {
    fn from(format: UpdateFormat) -> Self {
        match format {
            UpdateFormat::Xml => RequestFormat::Xml,
            UpdateFormat::Json => RequestFormat::Json,
            UpdateFormat::Cbor => RequestFormat::Cbor,
        }
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
