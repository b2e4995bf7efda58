//! End-to-end tests for the HTTP API, with the upstream replaced by a mock client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::Notify;
use tower::util::ServiceExt;

use groq_relay::{
    build_router, completion_body, ChatClient, CompletionRequest, Container, ContainerConfig,
    MockChatClient, RelayError, UpstreamResponse,
};

fn app_with(client: Arc<dyn ChatClient>, api_key: Option<&str>) -> Router {
    let config = ContainerConfig {
        api_key: api_key.map(String::from),
        ..Default::default()
    };
    let container = Container::with_client(config, client).expect("container");
    build_router(Arc::new(container))
}

async fn post_chat(app: &Router, body: Body, content_type: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", content_type)
        .body(body)
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

async fn get_status(app: &Router) -> (StatusCode, Value) {
    let request = Request::builder().uri("/").body(Body::empty()).expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

/// Upstream that answers only once the test releases it.
struct GatedChatClient {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl ChatClient for GatedChatClient {
    async fn create_completion(
        &self,
        _api_key: &str,
        _request: &CompletionRequest,
    ) -> Result<UpstreamResponse, RelayError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(completion_body("late reply"))
    }

    async fn list_models(&self, _api_key: &str) -> Result<UpstreamResponse, RelayError> {
        Ok(UpstreamResponse::new(200, r#"{"data":[]}"#))
    }
}

async fn post_json(app: &Router, payload: Value) -> (StatusCode, Value) {
    post_chat(app, Body::from(payload.to_string()), "application/json").await
}

#[tokio::test]
async fn chat_round_trip_then_empty_message() {
    let client = Arc::new(MockChatClient::with_reply("hi there"));
    let app = app_with(client.clone(), Some("gsk_test"));

    let (status, body) = post_json(&app, json!({"message": "hello"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "hi there"}));

    let (status, body) = post_json(&app, json!({"message": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No message provided"}));

    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn missing_message_field_is_a_validation_error() {
    let client = Arc::new(MockChatClient::with_reply("unused"));
    let app = app_with(client.clone(), Some("gsk_test"));

    let (status, body) = post_json(&app, json!({"text": "hello"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No message provided");
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn malformed_bodies_are_rejected_with_400() {
    let client = Arc::new(MockChatClient::with_reply("unused"));
    let app = app_with(client.clone(), Some("gsk_test"));

    let (status, _) = post_chat(&app, Body::from("{not json"), "application/json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_chat(&app, Body::from(r#"{"message":"hi"}"#), "text/plain").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(&app, json!({"message": 42})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn missing_api_key_is_500_with_hint() {
    let client = Arc::new(MockChatClient::with_reply("unused"));
    let app = app_with(client.clone(), None);

    let (status, body) = post_json(&app, json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Groq API key is not configured");
    assert_eq!(body["details"], "Please set GROQ_API_KEY in your .env file");
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn upstream_status_is_passed_through_and_history_kept() {
    let client = Arc::new(MockChatClient::new());
    let app = app_with(client.clone(), Some("gsk_test"));

    let (status, _) = post_json(&app, json!({"message": "first"})).await;
    assert_eq!(status, StatusCode::OK);

    client.push_response(UpstreamResponse::new(429, r#"{"error":"rate limited"}"#));
    let (status, body) = post_json(&app, json!({"message": "second"})).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("rate limited"));

    // The failed exchange left no trace: the next request sees only the first pair.
    let (status, _) = post_json(&app, json!({"message": "third"})).await;
    assert_eq!(status, StatusCode::OK);
    let request = client.requests().pop().unwrap();
    let contents: Vec<&str> = request.messages.iter().skip(1).map(|t| t.content()).collect();
    assert_eq!(contents, vec!["first", "Echo: first", "third"]);
}

#[tokio::test]
async fn protocol_mismatch_is_500() {
    let client = Arc::new(MockChatClient::with_response(UpstreamResponse::new(
        200,
        r#"{"choices":[]}"#,
    )));
    let app = app_with(client, Some("gsk_test"));

    let (status, body) = post_json(&app, json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("choices"));
}

#[tokio::test]
async fn status_endpoint_reports_history() {
    let client = Arc::new(MockChatClient::new());
    let app = app_with(client, Some("gsk_test"));
    post_json(&app, json!({"message": "hello"})).await;

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["api_key_configured"], true);
    assert_eq!(body["history"], json!({"enabled": true, "turns": 2, "max_turns": 10}));
}

#[tokio::test]
async fn preflight_allows_any_origin() {
    let app = app_with(Arc::new(MockChatClient::new()), Some("gsk_test"));

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/chat")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-headers"], "content-type");
    assert!(headers["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .contains("POST"));
}

#[tokio::test]
async fn error_responses_carry_cors_header() {
    let app = app_with(Arc::new(MockChatClient::new()), Some("gsk_test"));

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"message":""}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn status_answers_while_a_chat_is_pending() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let client = Arc::new(GatedChatClient {
        entered: entered.clone(),
        release: release.clone(),
    });
    let app = app_with(client, Some("gsk_test"));

    let chat = tokio::spawn({
        let app = app.clone();
        async move { post_json(&app, json!({"message": "hello"})).await }
    });
    entered.notified().await;

    let (status, body) = tokio::time::timeout(Duration::from_secs(1), get_status(&app))
        .await
        .expect("GET / must not wait for the pending chat");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"]["turns"], 0);

    release.notify_one();
    let (status, body) = chat.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "late reply"}));

    let (_, body) = get_status(&app).await;
    assert_eq!(body["history"]["turns"], 2);
}
