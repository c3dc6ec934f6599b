//! Outbound inference port.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::provider::ProviderRequest;

/// Everything that can go wrong between the adapter and the provider.
///
/// Every variant surfaces to the caller as HTTP 500 with the `Display` text
/// in the `detail` field, so the messages here are caller-visible.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Provider answered with any status other than 201 Created.
    #[error("unexpected response status: {status}")]
    BadStatus { status: u16 },

    /// Provider body was unparsable or missing the `output` field.
    #[error("malformed provider response: {0}")]
    MalformedBody(String),

    /// The request never completed (connect, send or read failure).
    #[error("provider request failed: {0}")]
    Transport(String),

    /// The configured deadline elapsed before the provider answered.
    #[error("provider request timed out")]
    DeadlineExceeded,

    /// Shutdown or caller disconnect interrupted the call.
    #[error("provider request cancelled")]
    Cancelled,

    /// The outbound client could not be built from the settings.
    #[error("provider client configuration: {0}")]
    Configuration(String),
}

/// One non-streamed inference round trip.
#[async_trait]
pub trait InferencePort: Send + Sync + fmt::Debug {
    /// Send `request` to the provider and return the trimmed `output` text.
    ///
    /// `Ok(None)` means the provider completed the exchange but produced no
    /// usable output. Cancelling `cancel` abandons the call and yields
    /// [`UpstreamError::Cancelled`].
    async fn infer(
        &self,
        request: ProviderRequest,
        cancel: CancellationToken,
    ) -> Result<Option<String>, UpstreamError>;
}
