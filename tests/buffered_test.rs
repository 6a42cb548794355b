mod common;

use ciborium::value::Value as CborValue;

use lucerna::document::Document;
use lucerna::error::LucernaError;
use lucerna::plugin::{BufferedAdd, BufferedDelete, DeleteEntry};
use lucerna::query::update::RequestFormat;
use tokio_test::block_on;

use common::{MockAdapter, client};

fn doc(id: i64) -> Document {
    let mut doc = Document::new();
    doc.set_field("id", id, None, None);
    doc
}

fn body(request: &lucerna::client::Request) -> String {
    String::from_utf8(request.raw_data().unwrap().to_vec()).unwrap()
}

#[test]
fn test_buffered_add_flushes_at_buffer_size() {
    let adapter = MockAdapter::new();
    let client = client(&adapter);

    block_on(async {
        let mut buffer = BufferedAdd::new(&client);
        buffer
            .set_buffer_size(2)
            .unwrap()
            .set_request_format(RequestFormat::Json);

        assert!(buffer.add_document(doc(1)).await.unwrap().is_none());
        assert!(buffer.add_document(doc(2)).await.unwrap().is_some());
        assert_eq!(adapter.request_count(), 1);
        assert!(buffer.is_empty());

        let results = buffer.add_documents((3..=5).map(doc)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(buffer.len(), 1);
        assert_eq!(
            body(&adapter.last_request()),
            r#"{"add":{"doc":{"id":3}},"add":{"doc":{"id":4}}}"#
        );

        buffer.commit(None, None, Some(true), None).await.unwrap();
        assert!(buffer.is_empty());
        assert_eq!(
            body(&adapter.last_request()),
            r#"{"add":{"doc":{"id":5}},"commit":{"waitSearcher":true}}"#
        );

        assert!(buffer.flush().await.unwrap().is_none());
        assert_eq!(adapter.request_count(), 3);
    });
}

#[test]
fn test_buffered_add_keeps_documents_on_failure() {
    let adapter = MockAdapter::new();
    adapter.push_response(503, r#"{"error":{"msg":"overloaded","code":503}}"#);
    let client = client(&adapter);

    block_on(async {
        let mut buffer = BufferedAdd::new(&client);
        buffer.set_overwrite(Some(false));
        buffer.add_documents([doc(1), doc(2)]).await.unwrap();

        let err = buffer.flush().await.unwrap_err();
        assert!(matches!(err, LucernaError::Http { status: 503, .. }));
        assert_eq!(buffer.len(), 2);

        let result = buffer.flush().await.unwrap().unwrap();
        assert_eq!(result.status(), Some(0));
        assert!(buffer.is_empty());
        assert!(body(&adapter.last_request()).starts_with(r#"<update><add overwrite="false">"#));
    });
}

#[test]
fn test_buffered_add_commit_as_cbor() {
    let adapter = MockAdapter::new();
    let client = client(&adapter);

    block_on(async {
        let mut buffer = BufferedAdd::new(&client);
        buffer.set_request_format(RequestFormat::Cbor);
        buffer.add_document(doc(1)).await.unwrap();

        buffer.commit(None, None, Some(true), None).await.unwrap();
        assert!(buffer.is_empty());
        assert_eq!(adapter.request_count(), 1);

        let request = adapter.last_request();
        assert_eq!(request.content_type(), Some("application/cbor"));
        assert_eq!(request.param("commit"), Some("true"));
        assert_eq!(request.param("waitSearcher"), Some("true"));
        assert_eq!(request.param("softCommit"), None);

        let decoded: CborValue = ciborium::de::from_reader(request.raw_data().unwrap()).unwrap();
        assert_eq!(
            decoded,
            CborValue::Array(vec![CborValue::Map(vec![(
                CborValue::Text("id".into()),
                CborValue::Integer(1.into())
            )])])
        );
    });
}

#[test]
fn test_buffer_size_must_be_positive() {
    let adapter = MockAdapter::new();
    let client = client(&adapter);
    let mut buffer = BufferedAdd::new(&client);
    assert!(buffer.set_buffer_size(0).is_err());
    assert_eq!(buffer.buffer_size(), 100);

    buffer.clear();
    assert!(buffer.buffer().is_empty());
}

#[test]
fn test_buffered_delete() {
    let adapter = MockAdapter::new();
    let client = client(&adapter);

    block_on(async {
        let mut buffer = BufferedDelete::new(&client);
        buffer.set_buffer_size(3).unwrap();

        buffer.add_delete_by_id("a").await.unwrap();
        buffer.add_delete_query("cat:old").await.unwrap();
        assert_eq!(
            buffer.buffer(),
            &[
                DeleteEntry::Id("a".into()),
                DeleteEntry::Query("cat:old".to_string())
            ]
        );
        assert!(buffer.add_delete_by_id(5).await.unwrap().is_some());
        assert_eq!(
            body(&adapter.last_request()),
            "<update><delete><id>a</id><id>5</id><query>cat:old</query></delete></update>"
        );

        buffer.add_delete_by_id("b").await.unwrap();
        buffer.commit(Some(true), None, None).await.unwrap();
        assert_eq!(
            body(&adapter.last_request()),
            r#"<update><delete><id>b</id></delete><commit softCommit="true"/></update>"#
        );
        assert!(buffer.flush().await.unwrap().is_none());
    });
}
