//! Axum HTTP server for the adapter.
//!
//! `serve()` runs against a pre-bound `TcpListener` so the caller can bind
//! first and report the address before traffic starts, and shuts down when
//! the cancellation token fires.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use gizbridge_core::chat::ChatRequest;
use gizbridge_core::ports::{
    ClockPort, CompletionIdPort, InferencePort, SystemClock, UuidCompletionIds,
};
use gizbridge_core::provider::ProviderRequest;
use gizbridge_core::settings::ResponseMode;

use crate::compose;
use crate::models::{ErrorBody, ModelsResponse};

/// Shared application state for the adapter.
#[derive(Clone)]
pub struct AppState {
    /// Outbound inference port.
    pub upstream: Arc<dyn InferencePort>,
    /// Timestamp source for composed envelopes.
    pub clock: Arc<dyn ClockPort>,
    /// Completion id source for composed envelopes.
    pub ids: Arc<dyn CompletionIdPort>,
    /// Which response shape this instance composes.
    pub mode: ResponseMode,
    /// Reject unknown roles with 400 instead of forwarding them.
    pub strict_roles: bool,
    /// Cancelled at shutdown to abort in-flight provider calls.
    pub cancel: CancellationToken,
}

impl AppState {
    /// State with production stamping (system clock, random ids).
    #[must_use]
    pub fn new(
        upstream: Arc<dyn InferencePort>,
        mode: ResponseMode,
        strict_roles: bool,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            upstream,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidCompletionIds),
            mode,
            strict_roles,
            cancel,
        }
    }
}

/// Build the adapter's router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/models", get(list_models))
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(state)
}

/// Run the adapter on a pre-bound listener until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Adapter starting on {addr} in {} mode", state.mode);

    let app = router(state);

    info!("Listening on {addr}");
    info!("Point OpenAI clients at: http://{addr}/v1");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Adapter shut down");
    Ok(())
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// Static model listing in OpenAI format.
async fn list_models() -> impl IntoResponse {
    debug!("GET /v1/models");
    Json(ModelsResponse::known())
}

/// Handle chat completions: reshape, forward once, reshape back.
async fn chat_completions(State(state): State<AppState>, body: Bytes) -> Response {
    debug!("POST /v1/chat/completions");

    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            error!("Failed to parse request: {e}");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(format!("Invalid request body: {e}"))),
            )
                .into_response();
        }
    };

    if state.strict_roles {
        let unknown = request.unknown_roles();
        if !unknown.is_empty() {
            warn!(roles = ?unknown, "rejecting request with unknown roles");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(format!(
                    "Unknown message roles: {}",
                    unknown.join(", ")
                ))),
            )
                .into_response();
        }
    }

    if request.requests_streaming() {
        warn!("streaming requested but not supported, replying non-streamed");
    }

    info!(
        model = %request.model,
        messages = request.messages.len(),
        "Processing chat completion request"
    );

    let provider_request = ProviderRequest::from(&request);

    match state
        .upstream
        .infer(provider_request, state.cancel.child_token())
        .await
    {
        Ok(Some(output)) => {
            debug!(chars = output.len(), "provider returned output");
            match state.mode {
                ResponseMode::OpenAi => Json(compose::openai_envelope(
                    &request.model,
                    output,
                    state.clock.as_ref(),
                    state.ids.as_ref(),
                ))
                .into_response(),
                ResponseMode::Minimal => Json(compose::minimal_envelope(output)).into_response(),
            }
        }
        Ok(None) => {
            error!("provider completed without output");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::no_response()),
            )
                .into_response()
        }
        Err(e) => {
            error!("Upstream call failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(e.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_models() {
        let response = list_models().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
