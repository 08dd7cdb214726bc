//! HTTP contract tests for the ask endpoint, driven through the router

use std::fs;
use std::sync::Arc;

use ask_rag::{
    config::RagConfig,
    ingestion::{IndexBuilder, TextChunker},
    providers::{EmbeddingProvider, LlmProvider},
    server::RagServer,
    Error, RagChain, Result,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

/// Scores text on two topics so retrieval is predictable
struct TopicEmbedder;

#[async_trait]
impl EmbeddingProvider for TopicEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let text = text.to_lowercase();
        let sleep = (text.matches("sleep").count() + text.matches("bed").count()) as f32;
        let grief = (text.matches("grief").count() + text.matches("loss").count()) as f32;
        Ok(vec![sleep, grief, 0.1])
    }

    fn name(&self) -> &str {
        "topic"
    }

    fn model(&self) -> &str {
        "topic-v1"
    }
}

struct CannedLlm;

#[async_trait]
impl LlmProvider for CannedLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if prompt.contains("regular bedtime") {
            Ok("A steady routine can help.".to_string())
        } else {
            Ok("Be gentle with yourself.".to_string())
        }
    }

    fn name(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "canned-v1"
    }
}

struct DownLlm;

#[async_trait]
impl LlmProvider for DownLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::llm("Gemini request failed (503 Service Unavailable): overloaded"))
    }

    fn name(&self) -> &str {
        "down"
    }

    fn model(&self) -> &str {
        "down"
    }
}

fn write_corpus() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("sleep.txt"),
        "Keep a regular bedtime. Avoid screens in bed before you sleep.",
    )
    .unwrap();
    fs::write(
        dir.path().join("grief.txt"),
        "Grief after a loss comes in waves. Let yourself feel the grief.",
    )
    .unwrap();
    fs::write(dir.path().join("notes.md"), "Not indexed: sleep sleep sleep.").unwrap();
    dir
}

async fn router_with(llm: Arc<dyn LlmProvider>) -> (Router, TempDir) {
    let dir = write_corpus();
    let index = IndexBuilder::new(dir.path(), TextChunker::default())
        .build(&TopicEmbedder)
        .await
        .unwrap();

    let mut config = RagConfig::default();
    config.data.dir = dir.path().to_path_buf();

    let chain = RagChain::new(Arc::new(TopicEmbedder), llm, index, Default::default(), 1);
    (RagServer::new(config, chain).router(), dir)
}

fn ask_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_ask_returns_answer_and_sources() {
    let (router, _dir) = router_with(Arc::new(CannedLlm)).await;

    let (status, body) = send(router, ask_request(r#"{"question": "How do I sleep better?"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"answer": "A steady routine can help.", "sources": ["sleep.txt"]})
    );
}

#[tokio::test]
async fn test_sources_come_from_indexed_files() {
    let (router, _dir) = router_with(Arc::new(CannedLlm)).await;

    let (status, body) = send(router, ask_request(r#"{"question": "Coping with loss"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Be gentle with yourself.");
    for source in body["sources"].as_array().unwrap() {
        let source = source.as_str().unwrap();
        assert!(["sleep.txt", "grief.txt"].contains(&source), "unexpected source {}", source);
    }
}

#[tokio::test]
async fn test_missing_question_is_bad_request() {
    for body in [r#"{}"#, r#"{"question": ""}"#, r#"{"question": null}"#] {
        let (router, _dir) = router_with(Arc::new(CannedLlm)).await;

        let (status, response) = send(router, ask_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(response, json!({"error": "Missing question"}));
    }
}

#[tokio::test]
async fn test_whitespace_question_is_answered() {
    let (router, _dir) = router_with(Arc::new(CannedLlm)).await;

    let (status, body) = send(router, ask_request(r#"{"question": "   "}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Be gentle with yourself.");
    assert_eq!(body["sources"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (router, _dir) = router_with(Arc::new(CannedLlm)).await;

    let (status, body) = send(router, ask_request("not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
}

#[tokio::test]
async fn test_non_string_question_is_bad_request() {
    let (router, _dir) = router_with(Arc::new(CannedLlm)).await;

    let (status, body) = send(router, ask_request(r#"{"question": 42}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_llm_failure_is_server_error() {
    let (router, _dir) = router_with(Arc::new(DownLlm)).await;

    let (status, body) = send(router, ask_request(r#"{"question": "How do I sleep?"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("overloaded"), "message: {}", message);
}

#[tokio::test]
async fn test_health() {
    let (router, _dir) = router_with(Arc::new(CannedLlm)).await;

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_info_describes_index() {
    let (router, _dir) = router_with(Arc::new(CannedLlm)).await;

    let (status, body) = send(router, Request::get("/info").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "ask-rag");
    assert_eq!(body["backend"], "gemini");
    assert_eq!(body["embedding_model"], "topic-v1");
    assert_eq!(body["generation_model"], "canned-v1");
    assert_eq!(body["documents"], 2);
    assert_eq!(body["chunks"], 2);
    assert_eq!(body["sources"], json!(["grief.txt", "sleep.txt"]));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (router, _dir) = router_with(Arc::new(CannedLlm)).await;

    let request = Request::builder()
        .method("POST")
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::from(r#"{"question": "sleep"}"#))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
