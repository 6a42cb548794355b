//! Criterion benchmarks for Lucerna request building and response parsing.
//!
//! - Update request bodies in XML, JSON and CBOR
//! - Select response decoding from JSON and XML

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use lucerna::client::Response;
use lucerna::document::{Document, Modifier};
use lucerna::query::update::{
    CborRequestBuilder, JsonRequestBuilder, UpdateQuery, XmlRequestBuilder,
};
use lucerna::query::{Query, ResponseWriter, SelectQuery};
use std::hint::black_box;

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<Document> {
    let words = [
        "search", "engine", "index", "query", "document", "field", "facet", "score",
    ];

    (0..count)
        .map(|i| {
            let mut doc = Document::new();
            doc.set_field("id", format!("doc-{i}"), None, None)
                .set_field("title", words[i % words.len()], Some(1.5), None)
                .set_field("price", (i % 100) as f64 + 0.99, None, None)
                .set_field("in_stock", i % 2 == 0, None, None);
            for word in words.iter().take(1 + i % words.len()) {
                doc.add_field("tags", *word, None, None);
            }
            doc
        })
        .collect()
}

fn update_query(count: usize) -> UpdateQuery {
    let mut update = UpdateQuery::new();
    update.add_documents(generate_test_documents(count), Some(true), Some(1000));
    update
}

/// Benchmark the update request builders.
fn bench_update_builders(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_builders");
    let update = update_query(100);

    group.throughput(Throughput::Elements(100));
    group.bench_function("xml_100_documents", |b| {
        b.iter(|| black_box(XmlRequestBuilder.raw_data(black_box(&update)).unwrap()))
    });
    group.bench_function("json_100_documents", |b| {
        b.iter(|| black_box(JsonRequestBuilder.raw_data(black_box(&update)).unwrap()))
    });
    group.bench_function("cbor_100_documents", |b| {
        b.iter(|| black_box(CborRequestBuilder.raw_data(black_box(&update)).unwrap()))
    });

    let mut atomic = UpdateQuery::new();
    let documents = generate_test_documents(100).into_iter().map(|mut doc| {
        doc.set_key("id")
            .set_field_modifier("price", Modifier::Inc)
            .unwrap();
        doc
    });
    atomic.add_documents(documents, None, None);
    group.bench_function("json_100_atomic_updates", |b| {
        b.iter(|| black_box(JsonRequestBuilder.raw_data(black_box(&atomic)).unwrap()))
    });

    group.finish();
}

/// Benchmark select response parsing.
fn bench_select_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_parsing");

    let docs = (0..100)
        .map(|i| format!(r#"{{"id":"doc-{i}","title":"search","price":{i}.5,"tags":["a","b"]}}"#))
        .collect::<Vec<_>>()
        .join(",");
    let json = format!(
        r#"{{"responseHeader":{{"status":0,"QTime":3}},"response":{{"numFound":100,"start":0,"docs":[{docs}]}}}}"#
    );
    let json_response = Response::new(200, "OK", Vec::new(), json);

    let docs = (0..100)
        .map(|i| {
            format!(
                r#"<doc><str name="id">doc-{i}</str><float name="price">{i}.5</float><arr name="tags"><str>a</str><str>b</str></arr></doc>"#
            )
        })
        .collect::<String>();
    let xml = format!(
        r#"<response><lst name="responseHeader"><int name="status">0</int></lst><result name="response" numFound="100" start="0">{docs}</result></response>"#
    );
    let xml_response = Response::new(200, "OK", Vec::new(), xml);

    let json_query = SelectQuery::new();
    let mut xml_query = SelectQuery::new();
    xml_query.set_response_writer(ResponseWriter::Xml);

    group.throughput(Throughput::Elements(100));
    group.bench_function("json_100_documents", |b| {
        b.iter(|| black_box(json_query.parse_response(black_box(&json_response)).unwrap()))
    });
    group.bench_function("xml_100_documents", |b| {
        b.iter(|| black_box(xml_query.parse_response(black_box(&xml_response)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_update_builders, bench_select_parsing);
criterion_main!(benches);
