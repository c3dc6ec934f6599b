//! Caller-facing chat types.
//!
//! These model the OpenAI-style request shape callers send. Role labels are
//! normalized at the deserialization boundary so the rest of the crate only
//! ever sees canonical values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Message author role, normalized to the labels the provider accepts.
///
/// Callers may spell roles either way (`user` or `human`, `assistant` or
/// `ai`); both collapse to one canonical variant. Labels outside the alias
/// table are preserved verbatim in [`Role::Unknown`] and forwarded as-is,
/// leaving it to the provider to accept or reject them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// The end user. Forwarded as `human`.
    Human,
    /// The model. Forwarded as `assistant`.
    Assistant,
    /// System instructions. Forwarded as `system`.
    System,
    /// Any label outside the alias table, kept verbatim.
    Unknown(String),
}

impl Role {
    /// Normalize a caller-supplied role label.
    #[must_use]
    pub fn from_alias(label: &str) -> Self {
        match label {
            "user" | "human" => Self::Human,
            "assistant" | "ai" => Self::Assistant,
            "system" => Self::System,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The label sent to the provider for this role.
    #[must_use]
    pub fn wire_label(&self) -> &str {
        match self {
            Self::Human => "human",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Unknown(other) => other,
        }
    }

    /// Whether this role came from the alias table.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_label())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_label())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_alias(&label))
    }
}

/// One chat turn.
///
/// Accepts both the OpenAI key (`role`) and the provider key (`type`) for the
/// author field. Tool fields are tolerated so tool-augmented callers do not
/// get rejected, but only the text content travels upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(alias = "type")]
    pub role: Role,
    /// Message text. Missing or `null` content becomes the empty string.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<serde_json::Value>,
}

impl ChatMessage {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: None,
            function_call: None,
        }
    }
}

/// An inbound chat completion request.
///
/// Tuning and streaming knobs are accepted so off-the-shelf OpenAI clients
/// work unchanged, but the provider call is always non-streamed and carries
/// none of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Provider base model to run, e.g. `qwen-coder-32b`.
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(default, rename = "noStream", skip_serializing_if = "Option::is_none")]
    pub no_stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl ChatRequest {
    /// Labels of every message whose role fell outside the alias table.
    #[must_use]
    pub fn unknown_roles(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|message| match &message.role {
                Role::Unknown(label) => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether the caller asked for a streamed reply, which is never honored.
    #[must_use]
    pub fn requests_streaming(&self) -> bool {
        self.stream == Some(true) || self.no_stream == Some(false)
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
