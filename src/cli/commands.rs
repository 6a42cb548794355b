//! Command implementations for the Lucerna CLI.

use std::time::Instant;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::client::{Client, Request};
use crate::config::ClientConfig;
use crate::document::converter::jsonl::JsonlDocumentConverter;
use crate::document::converter::DocumentConverter;
use crate::error::{LucernaError, Result};
use crate::plugin::BufferedAdd;
use crate::query::managed_resource::{ManagedCommand, ManagedResourceResult};
use crate::query::select::{FacetField, FilterQuery, SortOrder};
use crate::query::update::RequestFormat;
use crate::query::{Query, UpdateQuery};

/// Execute a CLI command.
pub async fn execute_command(args: LucernaArgs) -> Result<()> {
    let client = build_client(&args)?;
    match &args.command {
        Command::Ping => ping(&client, &args).await,
        Command::Select(select_args) => select(&client, select_args, &args).await,
        Command::Update(update_args) => update(&client, update_args, &args).await,
        Command::Delete(delete_args) => delete(&client, delete_args, &args).await,
        Command::System => system(&client, &args).await,
        Command::Stopwords(stopwords_args) => stopwords(&client, stopwords_args, &args).await,
    }
}

/// Load the configuration and apply endpoint overrides from the command line.
pub fn load_config(args: &LucernaArgs) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(name) = &args.endpoint {
        if !config.endpoints.contains_key(name) {
            return Err(LucernaError::config(format!("Endpoint '{name}' is not defined")));
        }
        config.default_endpoint = Some(name.clone());
    }

    if args.has_endpoint_overrides() {
        let name = config
            .default_endpoint_name()
            .map(str::to_string)
            .ok_or_else(|| LucernaError::config("At least one endpoint is required"))?;
        if let Some(endpoint) = config.endpoints.get_mut(&name) {
            if let Some(host) = &args.host {
                endpoint.host = host.clone();
            }
            if let Some(port) = args.port {
                endpoint.port = port;
            }
            if let Some(core) = &args.core {
                endpoint.core = Some(core.clone());
            }
            if let Some(collection) = &args.collection {
                endpoint.collection = Some(collection.clone());
            }
        }
    }
    config.validate()?;
    Ok(config)
}

fn build_client(args: &LucernaArgs) -> Result<Client> {
    let config = load_config(args)?;
    debug!("Using endpoints {:?}", config.endpoints.keys().collect::<Vec<_>>());
    Client::from_config(config)
}

fn preview(request: &Request) -> RequestPreview {
    let body = request.raw_data();
    RequestPreview {
        method: request.method().to_string(),
        uri: request.uri(),
        content_type: request.content_type().map(str::to_string),
        body: body
            .and_then(|b| std::str::from_utf8(b).ok())
            .map(str::to_string),
        body_bytes: body.map_or(0, <[u8]>::len),
    }
}

/// Ping the core.
async fn ping(client: &Client, cli_args: &LucernaArgs) -> Result<()> {
    let result = client.ping(&client.create_ping(), None).await?;
    output_result(
        "Ping",
        &PingOutput {
            status: result.ping_status.clone().unwrap_or_default(),
            query_time_ms: result.header.query_time,
        },
        cli_args,
    )
}

/// Run a select query.
async fn select(client: &Client, args: &SelectArgs, cli_args: &LucernaArgs) -> Result<()> {
    let mut query = client.create_select();
    query
        .set_query(args.query.as_str())
        .set_rows(args.rows)
        .set_start(args.start);
    if !args.fields.is_empty() {
        query.set_fields(args.fields.iter().map(String::as_str));
    }
    if let Some(df) = &args.df {
        query.set_query_default_field(df.as_str());
    }
    for (i, fq) in args.filter_queries.iter().enumerate() {
        query.add_filter_query(FilterQuery::new(format!("fq{i}"), fq.as_str()))?;
    }
    for sort in &args.sort {
        let (field, order) = match sort.rsplit_once(':') {
            Some((field, "desc")) => (field, SortOrder::Desc),
            Some((field, "asc")) => (field, SortOrder::Asc),
            _ => (sort.as_str(), SortOrder::Asc),
        };
        query.add_sort(field, order);
    }
    if !args.facet_fields.is_empty() {
        let facet_set = query.facet_set()?;
        for field in &args.facet_fields {
            facet_set.add_facet(FacetField::new(field.as_str(), field.as_str()))?;
        }
    }

    let result = client.select(&query, None).await?;
    let facets = result
        .facet_set()
        .map(|facets| {
            facets
                .facets
                .iter()
                .map(|(key, facet)| FacetOutput {
                    key: key.clone(),
                    values: facet.values().to_vec(),
                })
                .collect()
        })
        .unwrap_or_default();

    output_result(
        &format!("Results for: {}", args.query),
        &SelectOutput {
            num_found: result.num_found,
            start: result.start,
            max_score: result.max_score,
            query_time_ms: result.query_time(),
            documents: result.iter().map(|doc| doc.fields().clone()).collect(),
            facets,
        },
        cli_args,
    )
}

/// Send documents from a JSONL file in batches.
async fn update(client: &Client, args: &UpdateArgs, cli_args: &LucernaArgs) -> Result<()> {
    let converter = match &args.key {
        Some(key) => JsonlDocumentConverter::with_key(key.as_str()),
        None => JsonlDocumentConverter::new(),
    };
    let format = RequestFormat::from(args.format);
    let documents = converter.convert(&args.document_file)?;

    if args.dry_run {
        let mut query = UpdateQuery::new();
        query.set_request_format(format);
        let batch = documents
            .take(args.batch_size)
            .collect::<Result<Vec<_>>>()?;
        query.add_documents(batch, args.overwrite, args.commit_within);
        if args.commit {
            query.add_commit(None, None, None);
        }
        return output_result("Update request", &preview(&query.build_request()?), cli_args);
    }

    let start_time = Instant::now();
    let mut buffer = BufferedAdd::new(client);
    buffer
        .set_buffer_size(args.batch_size)?
        .set_request_format(format)
        .set_overwrite(args.overwrite)
        .set_commit_within(args.commit_within);

    let mut count = 0;
    let mut batches = 0;
    for document in documents {
        count += 1;
        if buffer.add_document(document?).await?.is_some() {
            batches += 1;
            if cli_args.verbosity() > 1 {
                println!("Sent {count} documents...");
            }
        }
    }
    if args.commit {
        buffer.commit(None, None, Some(true), None).await?;
        batches += 1;
    } else if buffer.flush().await?.is_some() {
        batches += 1;
    }
    info!("Sent {count} documents from {}", args.document_file.display());

    output_result(
        "Documents sent successfully",
        &UpdateSummary {
            documents: count,
            batches,
            format: format.to_string(),
            committed: args.commit,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Delete documents by id or query.
async fn delete(client: &Client, args: &DeleteArgs, cli_args: &LucernaArgs) -> Result<()> {
    if args.ids.is_empty() && args.queries.is_empty() {
        return Err(LucernaError::invalid_argument(
            "Nothing to delete, use --id or --query",
        ));
    }

    let mut query = client.create_update();
    if !args.ids.is_empty() {
        query.add_delete_by_ids(args.ids.iter().map(String::as_str));
    }
    if !args.queries.is_empty() {
        query.add_delete_queries(args.queries.iter().map(String::as_str));
    }
    if args.commit {
        query.add_commit(None, Some(true), None);
    }

    if args.dry_run {
        return output_result("Delete request", &preview(&query.build_request()?), cli_args);
    }

    let result = client.update(&query, None).await?;
    output_result(
        "Documents deleted",
        &DeleteSummary {
            ids: args.ids.len(),
            queries: args.queries.len(),
            committed: args.commit,
            query_time_ms: result.query_time(),
        },
        cli_args,
    )
}

/// Show system information.
async fn system(client: &Client, cli_args: &LucernaArgs) -> Result<()> {
    let result = client.system(&client.create_system(), None).await?;
    output_result("System information", result.data(), cli_args)
}

/// List, add, delete or probe stopwords.
async fn stopwords(client: &Client, args: &StopwordsArgs, cli_args: &LucernaArgs) -> Result<()> {
    let mut query = client.create_stopwords(args.name.as_str());
    let (label, command) = match &args.action {
        StopwordsAction::List => ("list", None),
        StopwordsAction::Add { words } => ("add", Some(ManagedCommand::AddStopwords(words.clone()))),
        StopwordsAction::Delete { word } => ("delete", Some(ManagedCommand::Delete(word.clone()))),
        StopwordsAction::Exists { word } => ("exists", Some(ManagedCommand::Exists(word.clone()))),
    };
    if let Some(command) = command {
        query.set_command(command);
    }

    match client.managed_resource(&query, None).await? {
        ManagedResourceResult::Stopwords(result) => output_result(
            &format!("Stopwords in {}", args.name),
            &StopwordsOutput {
                name: args.name.clone(),
                ignore_case: result.ignore_case,
                updated_since_init: result.updated_since_init,
                words: result.items,
            },
            cli_args,
        ),
        other => output_result(
            &format!("Stopwords {label}"),
            &CommandOutput {
                command: label.to_string(),
                successful: other.was_successful(),
            },
            cli_args,
        ),
    }
}
