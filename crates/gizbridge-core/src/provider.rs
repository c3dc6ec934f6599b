//! GizAI inference wire contract.
//!
//! The provider speaks one endpoint (`inferenceServer.infer`) with a fixed
//! body shape. The caller's model name travels in `baseModel`; the top-level
//! `model` field is the constant task name `chat` and must not be confused
//! with it.

use serde::{Deserialize, Serialize};

use crate::chat::ChatRequest;

/// Fixed top-level task selector. Never the caller's model.
pub const PROVIDER_MODEL: &str = "chat";
/// Fixed conversation mode inside `input`.
pub const PROVIDER_MODE: &str = "chat";

/// Body POSTed to the provider, exactly one per inbound chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRequest {
    pub model: String,
    #[serde(rename = "baseModel")]
    pub base_model: String,
    pub input: ProviderInput,
    /// Always `true`; the adapter only speaks the non-streamed protocol.
    #[serde(rename = "noStream")]
    pub no_stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInput {
    pub messages: Vec<ProviderMessage>,
    pub mode: String,
}

/// One conversation turn as the provider spells it: role under `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    #[serde(rename = "type")]
    pub role: String,
    pub content: String,
}

/// The one field consumed from a successful provider reply. Anything else in
/// the body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderResponse {
    pub output: String,
}

impl From<&ChatRequest> for ProviderRequest {
    /// Reshape a caller request into the provider contract.
    ///
    /// Message order is preserved, roles become their wire labels, and every
    /// tuning knob the caller sent (temperature, stream flags, mode) is
    /// dropped on the floor.
    fn from(request: &ChatRequest) -> Self {
        let messages = request
            .messages
            .iter()
            .map(|message| ProviderMessage {
                role: message.role.wire_label().to_string(),
                content: message.content.clone(),
            })
            .collect();

        Self {
            model: PROVIDER_MODEL.to_string(),
            base_model: request.model.clone(),
            input: ProviderInput {
                messages,
                mode: PROVIDER_MODE.to_string(),
            },
            no_stream: true,
        }
    }
}
