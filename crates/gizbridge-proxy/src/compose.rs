//! Envelope composition.
//!
//! Pure functions from provider output to caller-facing bodies. Timestamps
//! and completion ids come in through ports, so composition is fully
//! deterministic under test.

use gizbridge_core::ports::{ClockPort, CompletionIdPort};

use crate::models::{
    ChatChoice, ChatCompletionResponse, MinimalResponse, ResponseMessage, Usage,
};

/// Build the full OpenAI-style envelope around one provider reply.
///
/// The envelope always carries exactly one choice, `finish_reason: "stop"`
/// and a zeroed usage block.
#[must_use]
pub fn openai_envelope(
    model: &str,
    output: String,
    clock: &dyn ClockPort,
    ids: &dyn CompletionIdPort,
) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: ids.next_id(),
        object: "chat.completion".to_string(),
        created: clock.now_unix(),
        model: model.to_string(),
        choices: vec![ChatChoice {
            index: 0,
            message: ResponseMessage {
                role: "assistant".to_string(),
                content: output,
            },
            finish_reason: "stop".to_string(),
        }],
        usage: Usage::default(),
    }
}

/// Build the bare `{"output": ...}` record.
#[must_use]
pub fn minimal_envelope(output: String) -> MinimalResponse {
    MinimalResponse { output }
}
