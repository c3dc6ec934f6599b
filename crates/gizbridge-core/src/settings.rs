//! Adapter configuration.
//!
//! A [`Settings`] value describes one running adapter instance: where it
//! listens, which response shape it composes, and how the single outbound
//! provider call is made. Construction is lenient; [`validate_settings`]
//! gates startup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Conventional listen port when composing full OpenAI envelopes.
pub const DEFAULT_OPENAI_PORT: u16 = 8000;
/// Conventional listen port when composing minimal `{output}` bodies.
pub const DEFAULT_MINIMAL_PORT: u16 = 8001;
/// The GizAI inference endpoint.
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://app.giz.ai/api/data/users/inferenceServer.infer";
/// Upper bound on one outbound call, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Which caller-facing response shape the adapter composes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Full OpenAI-style `chat.completion` envelope.
    #[default]
    OpenAi,
    /// Bare `{"output": ...}` record.
    Minimal,
}

impl ResponseMode {
    /// Parse a mode name as written in config.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "openai" => Some(Self::OpenAi),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Minimal => "minimal",
        }
    }

    /// Listen port used when none is configured explicitly.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::OpenAi => DEFAULT_OPENAI_PORT,
            Self::Minimal => DEFAULT_MINIMAL_PORT,
        }
    }
}

impl std::fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime configuration for one adapter instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bind host for the HTTP listener.
    pub host: String,
    /// Bind port; `None` falls back to the mode's conventional port.
    pub port: Option<u16>,
    /// Response shape composed for callers.
    pub mode: ResponseMode,
    /// Provider endpoint the outbound call targets.
    pub upstream_url: String,
    /// Optional forward proxy for the outbound call.
    pub outbound_proxy: Option<String>,
    /// Deadline for one outbound call, in seconds.
    pub request_timeout_secs: u64,
    /// Reject requests carrying unknown roles instead of forwarding them.
    pub strict_roles: bool,
}

impl Settings {
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: None,
            mode: ResponseMode::default(),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            outbound_proxy: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            strict_roles: false,
        }
    }

    /// Port the listener binds, after applying the per-mode fallback.
    #[must_use]
    pub const fn effective_port(&self) -> u16 {
        match self.port {
            Some(port) => port,
            None => self.mode.default_port(),
        }
    }

    /// `host:port` string for the listener.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.effective_port())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Rejected configuration, reported before anything binds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("bind host cannot be empty")]
    EmptyHost,
    #[error("port must be 1024 or higher, got {0}")]
    PrivilegedPort(u16),
    #[error("upstream URL must start with http:// or https://, got '{0}'")]
    InvalidUpstreamUrl(String),
    #[error("outbound proxy must start with http:// or https://, got '{0}'")]
    InvalidOutboundProxy(String),
    #[error("request timeout must be at least 1 second")]
    ZeroTimeout,
}

/// Check a settings value before the adapter starts.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.host.trim().is_empty() {
        return Err(SettingsError::EmptyHost);
    }
    let port = settings.effective_port();
    if port < 1024 {
        return Err(SettingsError::PrivilegedPort(port));
    }
    if !settings.upstream_url.starts_with("http://")
        && !settings.upstream_url.starts_with("https://")
    {
        return Err(SettingsError::InvalidUpstreamUrl(
            settings.upstream_url.clone(),
        ));
    }
    if let Some(proxy) = &settings.outbound_proxy {
        if !proxy.starts_with("http://") && !proxy.starts_with("https://") {
            return Err(SettingsError::InvalidOutboundProxy(proxy.clone()));
        }
    }
    if settings.request_timeout_secs == 0 {
        return Err(SettingsError::ZeroTimeout);
    }
    Ok(())
}
