#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod chat;
pub mod ports;
pub mod provider;
pub mod settings;

pub use chat::{ChatMessage, ChatRequest, Role};
pub use ports::{
    ClockPort, CompletionIdPort, InferencePort, SystemClock, UpstreamError, UuidCompletionIds,
};
pub use provider::{
    PROVIDER_MODE, PROVIDER_MODEL, ProviderInput, ProviderMessage, ProviderRequest,
    ProviderResponse,
};
pub use settings::{
    DEFAULT_HOST, DEFAULT_MINIMAL_PORT, DEFAULT_OPENAI_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_UPSTREAM_URL, ResponseMode, Settings, SettingsError, validate_settings,
};
