#![allow(clippy::unwrap_used, clippy::expect_used)]

use docchat_client::{DocumentApi, HttpDocumentApi, UploadFile};
use docchat_core::{ClientConfig, DocchatError, DocumentId};
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> HttpDocumentApi {
    let config = ClientConfig::default().with_api_base_url(server.uri());
    HttpDocumentApi::new(config).unwrap()
}

// --- upload ---

#[tokio::test]
async fn test_upload_sends_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header_exists("content-type"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"contract.pdf\""))
        .and(body_string_contains("%PDF-1.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Document uploaded and processed successfully",
            "document_id": "abc123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let id = api
        .upload(UploadFile::new("contract.pdf", b"%PDF-1.7".to_vec()))
        .await
        .unwrap();
    assert_eq!(id.as_str(), "abc123");
}

#[tokio::test]
async fn test_upload_non_success_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "detail": "Error processing document" })),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .upload(UploadFile::new("a.txt", b"hello".to_vec()))
        .await
        .unwrap_err();
    match err {
        DocchatError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Error processing document");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_missing_document_id_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .upload(UploadFile::new("a.txt", b"hello".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, DocchatError::Json(_)));
}

// --- ask ---

#[tokio::test]
async fn test_ask_posts_document_id_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(serde_json::json!({
            "document_id": "abc123",
            "query": "Who are the parties?"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "query": "Who are the parties?",
            "response": "Acme and Globex.",
            "document": "contract.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = DocumentId::new("abc123").unwrap();
    let answer = api_for(&server)
        .ask(&id, "Who are the parties?")
        .await
        .unwrap();
    assert_eq!(answer, "Acme and Globex.");
}

#[tokio::test]
async fn test_ask_unknown_document_returns_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "detail": "Document not found" })),
        )
        .mount(&server)
        .await;

    let id = DocumentId::new("missing").unwrap();
    let err = api_for(&server).ask(&id, "anything?").await.unwrap_err();
    assert_eq!(err.to_string(), "API error 404: Document not found");
}

#[tokio::test]
async fn test_ask_transport_failure_is_http_error() {
    // Nothing listens on port 1.
    let config = ClientConfig::default().with_api_base_url("http://127.0.0.1:1");
    let api = HttpDocumentApi::new(config).unwrap();
    let id = DocumentId::new("abc").unwrap();

    let err = api.ask(&id, "hello?").await.unwrap_err();
    assert!(matches!(err, DocchatError::Http(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_request_timeout_applies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "response": "late" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = ClientConfig::default().with_api_base_url(server.uri());
    config.request_timeout_secs = Some(1);
    let api = HttpDocumentApi::new(config).unwrap();
    let id = DocumentId::new("abc").unwrap();

    let err = api.ask(&id, "slow?").await.unwrap_err();
    assert!(matches!(err, DocchatError::Http(_)));
}

// --- documents ---

#[tokio::test]
async fn test_list_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "document_id": "d1", "file_name": "a.pdf" },
            { "document_id": "d2", "file_name": "b.docx" }
        ])))
        .mount(&server)
        .await;

    let docs = api_for(&server).list_documents().await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].document_id.as_str(), "d1");
    assert_eq!(docs[1].file_name, "b.docx");
}

#[test]
fn test_new_rejects_invalid_config() {
    let config = ClientConfig::default().with_api_base_url("ftp://example.com");
    assert!(matches!(
        HttpDocumentApi::new(config),
        Err(DocchatError::Config(_))
    ));
}
