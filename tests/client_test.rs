mod common;

use std::sync::Arc;

use lucerna::client::{Client, Endpoint, Method};
use lucerna::config::ClientConfig;
use lucerna::error::LucernaError;
use lucerna::plugin::{Customization, CustomizeRequest, PostBigRequest};
use lucerna::query::managed_resource::{ManagedCommand, ManagedResourceResult};
use lucerna::query::select::FacetField;
use lucerna::query::{Query, ResponseWriter};
use tokio_test::block_on;

use common::{MockAdapter, client};

#[test]
fn test_select_with_facets() {
    let adapter = MockAdapter::new();
    adapter.push_response(
        200,
        r#"{
            "responseHeader": {"status": 0, "QTime": 4},
            "response": {"numFound": 2, "start": 0, "maxScore": 1.5, "docs": [
                {"id": "1", "title": "Solr in Action", "cat": ["book"]},
                {"id": "2", "title": "Rust", "cat": ["book", "tech"]}
            ]},
            "facet_counts": {
                "facet_queries": {},
                "facet_fields": {"cat": ["book", 2, "tech", 1]}
            }
        }"#,
    );
    let client = client(&adapter);

    let mut query = client.create_select();
    query.set_query("title:*").set_rows(5);
    query
        .facet_set()
        .unwrap()
        .add_facet(FacetField::new("cat", "cat"))
        .unwrap();

    let result = block_on(client.select(&query, None)).unwrap();
    assert_eq!(result.num_found, 2);
    assert_eq!(result.max_score, Some(1.5));
    assert_eq!(result.query_time(), Some(4));
    assert_eq!(result.len(), 2);
    assert_eq!(result.documents[1].get_str("title"), Some("Rust"));

    let facet = result.facet_set().unwrap().get("cat").unwrap();
    assert_eq!(
        facet.values(),
        &[("book".to_string(), 2), ("tech".to_string(), 1)]
    );

    let requests = adapter.requests();
    assert_eq!(requests.len(), 1);
    let (request, endpoint) = &requests[0];
    assert_eq!(request.handler(), "select");
    assert_eq!(request.param("rows"), Some("5"));
    assert_eq!(request.param("facet"), Some("true"));
    assert_eq!(endpoint.core.as_deref(), Some("techproducts"));
}

#[test]
fn test_select_with_xml_writer() {
    let adapter = MockAdapter::new();
    adapter.push_response(
        200,
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<response><lst name="responseHeader"><int name="status">0</int>"#,
            r#"<int name="QTime">2</int></lst>"#,
            r#"<result name="response" numFound="3" start="1">"#,
            r#"<doc><str name="id">b</str><arr name="cat"><str>x</str><str>y</str></arr></doc>"#,
            r#"</result></response>"#
        ),
    );
    let client = client(&adapter);

    let mut query = client.create_select();
    query.set_response_writer(ResponseWriter::Xml);
    let result = block_on(client.select(&query, None)).unwrap();

    assert_eq!(adapter.last_request().param("wt"), Some("xml"));
    assert_eq!(result.num_found, 3);
    assert_eq!(result.start, 1);
    assert_eq!(result.query_time(), Some(2));
    assert_eq!(result.documents[0].get_str("id"), Some("b"));
    assert_eq!(
        result.documents[0].get("cat"),
        Some(&serde_json::json!(["x", "y"]))
    );
}

#[test]
fn test_error_status_carries_solr_message() {
    let adapter = MockAdapter::new();
    adapter.push_response(
        400,
        r#"{"responseHeader":{"status":400},"error":{"msg":"undefined field foo","code":400}}"#,
    );
    let client = client(&adapter);

    let err = block_on(client.select(&client.create_select(), None)).unwrap_err();
    match err {
        LucernaError::Http { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "undefined field foo");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_endpoints() {
    let adapter = MockAdapter::new();
    let mut client = client(&adapter);
    client.add_endpoint("cloud", {
        let mut endpoint = Endpoint::default();
        endpoint.collection = Some("films".to_string());
        endpoint
    });

    block_on(client.ping(&client.create_ping(), Some("cloud"))).unwrap();
    assert_eq!(
        adapter.requests()[0].1.collection.as_deref(),
        Some("films")
    );

    let err = block_on(client.ping(&client.create_ping(), Some("missing"))).unwrap_err();
    assert!(matches!(err, LucernaError::OutOfBounds(_)));
    assert_eq!(adapter.request_count(), 1);

    assert!(client.set_default_endpoint("missing").is_err());
    client.set_default_endpoint("cloud").unwrap();
    assert!(client.remove_endpoint("cloud").is_err());
    assert!(client.remove_endpoint("local").is_ok());
}

#[test]
fn test_client_requires_valid_config() {
    let adapter = MockAdapter::new();
    let config = ClientConfig {
        endpoints: Default::default(),
        default_endpoint: None,
    };
    assert!(Client::new(adapter, config).is_err());
}

#[test]
fn test_plugins_adjust_requests() {
    let adapter = MockAdapter::new();
    let mut client = client(&adapter);

    let customize = Arc::new(CustomizeRequest::new());
    customize
        .add_customization(Customization::header("auth", "X-Api-Key", "secret").persistent(true))
        .unwrap();
    client
        .register_plugin("customize", customize.clone())
        .register_plugin("postbig", Arc::new(PostBigRequest::with_max_query_string_length(64)));

    let mut query = client.create_select();
    query.set_query("title:(".to_string() + &"solr OR ".repeat(20) + "lucene)");
    block_on(client.select(&query, None)).unwrap();

    let request = adapter.last_request();
    assert_eq!(request.header("x-api-key"), Some("secret"));
    assert_eq!(request.method(), Method::Post);
    assert!(request.params().is_empty());
    let body = std::str::from_utf8(request.raw_data().unwrap()).unwrap();
    assert!(body.starts_with("wt=json&json.nl=flat&q=title%3A%28solr"));

    block_on(client.ping(&client.create_ping(), None)).unwrap();
    assert_eq!(adapter.last_request().method(), Method::Get);

    assert!(client.remove_plugin("postbig").is_some());
    assert!(client.plugin("postbig").is_none());
    assert!(client.plugin("customize").is_some());
}

#[test]
fn test_system_information() {
    let adapter = MockAdapter::new();
    adapter.push_response(
        200,
        r#"{"responseHeader":{"status":0,"QTime":12},"mode":"solrcloud",
            "lucene":{"solr-spec-version":"9.6.1","lucene-spec-version":"9.10.0"},
            "jvm":{"version":"17.0.11","memory":{"raw":{"used":1024}}},
            "system":{"name":"Linux","systemLoadAverage":0.5}}"#,
    );
    let client = client(&adapter);

    let result = block_on(client.system(&client.create_system(), None)).unwrap();
    assert_eq!(adapter.last_request().handler(), "admin/info/system");
    assert_eq!(result.mode(), Some("solrcloud"));
    assert_eq!(result.solr_spec_version(), Some("9.6.1"));
    assert_eq!(result.get("JvmMemoryRawUsed"), Some(&serde_json::json!(1024)));
    assert_eq!(
        result.get("SystemLoadAverage"),
        Some(&serde_json::json!(0.5))
    );
}

#[test]
fn test_managed_stopwords() {
    let adapter = MockAdapter::new();
    adapter.push_response(404, r#"{"error":{"msg":"the not found","code":404}}"#);
    adapter.push_response(404, r#"{"error":{"msg":"the not found","code":404}}"#);
    adapter.push_response(200, r#"{"responseHeader":{"status":0,"QTime":3}}"#);
    let client = client(&adapter);

    let mut query = client.create_stopwords("english");
    query.set_command(ManagedCommand::Exists("the".to_string()));
    let result = block_on(client.managed_resource(&query, None)).unwrap();
    assert!(!result.was_successful());

    query.set_command(ManagedCommand::Delete("the".to_string()));
    let err = block_on(client.managed_resource(&query, None)).unwrap_err();
    assert!(matches!(err, LucernaError::Http { status: 404, .. }));

    query.set_command(ManagedCommand::AddStopwords(vec!["the".to_string()]));
    let result = block_on(client.managed_resource(&query, None)).unwrap();
    let ManagedResourceResult::Command(command) = result else {
        panic!("expected a command result");
    };
    assert!(command.was_successful);
    assert_eq!(command.header.query_time, Some(3));

    let request = adapter.last_request();
    assert_eq!(request.method(), Method::Put);
    assert_eq!(request.handler(), "schema/analysis/stopwords/english");
    assert_eq!(request.raw_data(), Some(r#"["the"]"#.as_bytes()));
}

#[test]
fn test_create_request_does_not_send() {
    let adapter = MockAdapter::new();
    let client = client(&adapter);
    let query = client.create_ping();
    let request = client.create_request(&query).unwrap();
    assert_eq!(request.uri(), query.build_request().unwrap().uri());
    assert_eq!(adapter.request_count(), 0);
}
