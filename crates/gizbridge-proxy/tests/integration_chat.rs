//! Integration tests for the adapter's HTTP surface.
//!
//! These run the real router against in-process port doubles, so every
//! status code and body shape a caller can observe is pinned down without
//! touching the network.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mockall::mock;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use gizbridge_core::ports::{ClockPort, CompletionIdPort, InferencePort, UpstreamError};
use gizbridge_core::provider::ProviderRequest;
use gizbridge_core::settings::ResponseMode;
use gizbridge_proxy::server::{AppState, router};

// ============================================================================
// Port doubles
// ============================================================================

#[derive(Debug, Clone)]
enum StubReply {
    Output(&'static str),
    NoOutput,
    Status(u16),
    Malformed(&'static str),
}

/// Canned upstream: always answers with the configured reply.
#[derive(Debug)]
struct StubUpstream(StubReply);

#[async_trait]
impl InferencePort for StubUpstream {
    async fn infer(
        &self,
        _request: ProviderRequest,
        _cancel: CancellationToken,
    ) -> Result<Option<String>, UpstreamError> {
        match &self.0 {
            StubReply::Output(text) => Ok(Some((*text).to_string())),
            StubReply::NoOutput => Ok(None),
            StubReply::Status(code) => Err(UpstreamError::BadStatus { status: *code }),
            StubReply::Malformed(msg) => Err(UpstreamError::MalformedBody((*msg).to_string())),
        }
    }
}

/// Upstream that records every request it is asked to send.
#[derive(Debug, Default)]
struct CapturingUpstream {
    seen: Mutex<Vec<ProviderRequest>>,
}

#[async_trait]
impl InferencePort for CapturingUpstream {
    async fn infer(
        &self,
        request: ProviderRequest,
        _cancel: CancellationToken,
    ) -> Result<Option<String>, UpstreamError> {
        self.seen.lock().unwrap().push(request);
        Ok(Some("captured".to_string()))
    }
}

mock! {
    Upstream {}

    impl std::fmt::Debug for Upstream {
        fn fmt<'a>(&self, f: &mut std::fmt::Formatter<'a>) -> std::fmt::Result;
    }

    #[async_trait]
    impl InferencePort for Upstream {
        async fn infer(
            &self,
            request: ProviderRequest,
            cancel: CancellationToken,
        ) -> Result<Option<String>, UpstreamError>;
    }
}

#[derive(Debug)]
struct FixedClock(i64);

impl ClockPort for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

#[derive(Debug)]
struct FixedIds;

impl CompletionIdPort for FixedIds {
    fn next_id(&self) -> String {
        "chatcmpl-test".to_string()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn test_state(upstream: Arc<dyn InferencePort>, mode: ResponseMode, strict_roles: bool) -> AppState {
    AppState {
        upstream,
        clock: Arc::new(FixedClock(1_735_359_843)),
        ids: Arc::new(FixedIds),
        mode,
        strict_roles,
        cancel: CancellationToken::new(),
    }
}

fn openai_app(reply: StubReply) -> Router {
    router(test_state(
        Arc::new(StubUpstream(reply)),
        ResponseMode::OpenAi,
        false,
    ))
}

async fn post_chat(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/chat/completions")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

const SIMPLE_REQUEST: &str = r#"{
    "model": "qwen-coder-32b",
    "messages": [
        {"role": "system", "content": "be brief"},
        {"role": "user", "content": "Are you qwen?"}
    ]
}"#;

// ============================================================================
// Success paths
// ============================================================================

#[tokio::test]
async fn chat_completion_returns_full_envelope() {
    let app = openai_app(StubReply::Output("I am Qwen."));

    let (status, body) = post_chat(app, SIMPLE_REQUEST).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "chatcmpl-test");
    assert_eq!(body["object"], "chat.completion");
    assert_eq!(body["created"], 1_735_359_843);
    assert_eq!(body["model"], "qwen-coder-32b");

    let choices = body["choices"].as_array().unwrap();
    assert_eq!(choices.len(), 1);
    assert_eq!(choices[0]["index"], 0);
    assert_eq!(choices[0]["finish_reason"], "stop");
    assert_eq!(choices[0]["message"]["role"], "assistant");
    assert_eq!(choices[0]["message"]["content"], "I am Qwen.");

    assert_eq!(body["usage"]["prompt_tokens"], 0);
    assert_eq!(body["usage"]["completion_tokens"], 0);
    assert_eq!(body["usage"]["total_tokens"], 0);
}

#[tokio::test]
async fn minimal_mode_returns_bare_output() {
    let app = router(test_state(
        Arc::new(StubUpstream(StubReply::Output("done"))),
        ResponseMode::Minimal,
        false,
    ));

    let (status, body) = post_chat(app, SIMPLE_REQUEST).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"output": "done"}));
}

#[tokio::test]
async fn empty_output_still_succeeds() {
    // A provider reply that trims to nothing is a valid, empty completion.
    let app = openai_app(StubReply::Output(""));

    let (status, body) = post_chat(app, SIMPLE_REQUEST).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["choices"][0]["message"]["content"], "");
}

#[tokio::test]
async fn handler_reshapes_request_for_the_provider() {
    let capture = Arc::new(CapturingUpstream::default());
    let app = router(test_state(capture.clone(), ResponseMode::OpenAi, false));

    let request_body = r#"{
        "model": "claude-haiku",
        "messages": [
            {"role": "system", "content": "s"},
            {"role": "user", "content": "u"},
            {"role": "assistant", "content": "a"}
        ],
        "temperature": 0.7,
        "stream": true
    }"#;

    let (status, _) = post_chat(app, request_body).await;
    assert_eq!(status, StatusCode::OK);

    let seen = capture.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);

    let sent = &seen[0];
    assert_eq!(sent.model, "chat");
    assert_eq!(sent.base_model, "claude-haiku");
    assert!(sent.no_stream);
    assert_eq!(sent.input.mode, "chat");

    let labels: Vec<&str> = sent.input.messages.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(labels, vec!["system", "human", "assistant"]);
}

#[tokio::test]
async fn mocked_upstream_is_called_exactly_once() {
    let mut upstream = MockUpstream::new();
    upstream
        .expect_infer()
        .withf(|request, _| request.base_model == "claude-sonnet" && request.no_stream)
        .times(1)
        .returning(|_, _| Ok(Some("from mock".to_string())));

    let app = router(test_state(Arc::new(upstream), ResponseMode::OpenAi, false));

    let body = r#"{"model": "claude-sonnet", "messages": [{"role": "user", "content": "hi"}]}"#;
    let (status, value) = post_chat(app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["choices"][0]["message"]["content"], "from mock");
}

// ============================================================================
// Role handling
// ============================================================================

#[tokio::test]
async fn unknown_roles_forward_by_default() {
    let capture = Arc::new(CapturingUpstream::default());
    let app = router(test_state(capture.clone(), ResponseMode::OpenAi, false));

    let body = r#"{"model": "m", "messages": [{"role": "tool", "content": "result"}]}"#;
    let (status, _) = post_chat(app, body).await;

    assert_eq!(status, StatusCode::OK);
    let seen = capture.seen.lock().unwrap();
    assert_eq!(seen[0].input.messages[0].role, "tool");
}

#[tokio::test]
async fn strict_mode_rejects_unknown_roles() {
    let app = router(test_state(
        Arc::new(StubUpstream(StubReply::Output("never"))),
        ResponseMode::OpenAi,
        true,
    ));

    let body = r#"{"model": "m", "messages": [{"role": "tool", "content": "result"}]}"#;
    let (status, value) = post_chat(app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = value["detail"].as_str().unwrap();
    assert!(detail.contains("tool"), "detail should name the role: {detail}");
}

#[tokio::test]
async fn provider_spelling_of_roles_is_accepted() {
    // The curl example callers already use: role under "type", label "human".
    let capture = Arc::new(CapturingUpstream::default());
    let app = router(test_state(capture.clone(), ResponseMode::Minimal, false));

    let body = r#"{"model": "qwen-coder-32b", "messages": [{"type": "human", "content": "Are you qwen?"}]}"#;
    let (status, _) = post_chat(app, body).await;

    assert_eq!(status, StatusCode::OK);
    let seen = capture.seen.lock().unwrap();
    assert_eq!(seen[0].input.messages[0].role, "human");
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn upstream_rejection_maps_to_500_detail() {
    let app = openai_app(StubReply::Status(403));

    let (status, body) = post_chat(app, SIMPLE_REQUEST).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "unexpected response status: 403");
}

#[tokio::test]
async fn malformed_upstream_body_maps_to_500_detail() {
    let app = openai_app(StubReply::Malformed("missing field `output`"));

    let (status, body) = post_chat(app, SIMPLE_REQUEST).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("missing field `output`"), "got: {detail}");
}

#[tokio::test]
async fn missing_output_maps_to_no_response_generated() {
    let app = openai_app(StubReply::NoOutput);

    let (status, body) = post_chat(app, SIMPLE_REQUEST).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({"detail": "No response generated"}));
}

#[tokio::test]
async fn invalid_json_body_is_a_400() {
    let app = openai_app(StubReply::Output("never"));

    let (status, body) = post_chat(app, "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Invalid request body"), "got: {detail}");
}

#[tokio::test]
async fn missing_required_fields_is_a_400() {
    let app = openai_app(StubReply::Output("never"));

    let (status, _) = post_chat(app, r#"{"messages": []}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Side endpoints
// ============================================================================

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let app = openai_app(StubReply::Output("unused"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn models_endpoint_lists_known_base_models() {
    let app = openai_app(StubReply::Output("unused"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/models")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["object"], "list");

    let ids: Vec<&str> = value["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "qwen-coder-32b",
            "chat-gemini-flash",
            "claude-haiku",
            "claude-sonnet",
            "chat-o1-mini"
        ]
    );
}

#[tokio::test]
async fn nonexistent_route_returns_not_found() {
    let app = openai_app(StubReply::Output("unused"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/embeddings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
