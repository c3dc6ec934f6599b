//! Caller-facing response DTOs.
//!
//! Inbound request types live in `gizbridge-core`; this module owns the
//! bodies the adapter writes back: the OpenAI-style completion envelope, the
//! minimal `{"output"}` record, the `{"detail"}` error body and the static
//! model listing.

use serde::{Deserialize, Serialize};

/// Base models the provider is known to serve. The listing endpoint reports
/// these; requests for anything else are still forwarded untouched.
pub const KNOWN_BASE_MODELS: [&str; 5] = [
    "qwen-coder-32b",
    "chat-gemini-flash",
    "claude-haiku",
    "claude-sonnet",
    "chat-o1-mini",
];

// =============================================================================
// Chat Completion Envelope
// =============================================================================

/// Non-streamed response from /v1/chat/completions in `openai` mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// `chatcmpl-<uuid4>`, fresh per response.
    pub id: String,
    /// Always `chat.completion`.
    pub object: String,
    /// Unix seconds at composition time.
    pub created: i64,
    /// The caller's model name, echoed back.
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}

/// The single choice carried by every completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: String,
}

/// Assistant reply inside a choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub role: String,
    pub content: String,
}

/// Token usage block. The provider reports no counts, so every field is
/// zero; the block is kept so strict OpenAI clients can parse the envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from /v1/chat/completions in `minimal` mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimalResponse {
    pub output: String,
}

// =============================================================================
// Models Endpoint Types
// =============================================================================

/// Response from /v1/models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

impl ModelsResponse {
    /// The static listing of known base models.
    #[must_use]
    pub fn known() -> Self {
        Self {
            object: "list".to_string(),
            data: KNOWN_BASE_MODELS.into_iter().map(ModelInfo::new).collect(),
        }
    }
}

/// One model entry (OpenAI format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    /// No creation date is published for these models; reported as 0.
    pub created: i64,
    pub owned_by: String,
}

impl ModelInfo {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            object: "model".to_string(),
            created: 0,
            owned_by: "giz.ai".to_string(),
        }
    }
}

// =============================================================================
// Error Body
// =============================================================================

/// Error body for every non-2xx response: `{"detail": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// The defensive body for a completed exchange with no output.
    #[must_use]
    pub fn no_response() -> Self {
        Self::new("No response generated")
    }
}
