//! Reqwest-backed provider client.
//!
//! [`GizClient`] implements [`InferencePort`] with exactly one POST per
//! call. The provider signals success with 201 Created rather than 200, and
//! expects the header profile of a browser session; anything else gets the
//! request silently dropped or rejected upstream.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, CONTENT_TYPE, HeaderMap, HeaderName,
    HeaderValue, ORIGIN, PRAGMA, USER_AGENT,
};
use reqwest::{Client, Proxy, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use gizbridge_core::ports::{InferencePort, UpstreamError};
use gizbridge_core::provider::{ProviderRequest, ProviderResponse};
use gizbridge_core::settings::Settings;

/// Handshake budget, separate from the overall request deadline.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The full header set the provider expects on every inference call.
///
/// Values mirror a Chromium session on Linux. `Connection` is only honored
/// on HTTP/1.1; hyper drops connection-level headers when ALPN negotiates
/// HTTP/2.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://app.giz.ai"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
        ),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static("\"Not?A_Brand\";v=\"99\", \"Chromium\";v=\"130\""),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-mobile"),
        HeaderValue::from_static("?0"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        HeaderValue::from_static("\"Linux\""),
    );
    headers
}

/// HTTP client for the GizAI inference endpoint.
#[derive(Debug, Clone)]
pub struct GizClient {
    client: Client,
    url: String,
}

impl GizClient {
    /// Build a client from settings.
    ///
    /// The overall request deadline comes from
    /// `settings.request_timeout_secs`; an optional forward proxy is applied
    /// to the one outbound route.
    pub fn new(settings: &Settings) -> Result<Self, UpstreamError> {
        let mut builder = Client::builder()
            .default_headers(browser_headers())
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(settings.request_timeout_secs));

        // Only the explicitly configured proxy is honored; environment
        // proxy variables are ignored so the outbound route stays fixed.
        builder = if let Some(proxy_url) = &settings.outbound_proxy {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| UpstreamError::Configuration(e.to_string()))?;
            builder.proxy(proxy)
        } else {
            builder.no_proxy()
        };

        let client = builder
            .build()
            .map_err(|e| UpstreamError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            url: settings.upstream_url.clone(),
        })
    }
}

#[async_trait]
impl InferencePort for GizClient {
    async fn infer(
        &self,
        request: ProviderRequest,
        cancel: CancellationToken,
    ) -> Result<Option<String>, UpstreamError> {
        let exchange = async {
            debug!(
                url = %self.url,
                base_model = %request.base_model,
                messages = request.input.messages.len(),
                body = %serde_json::to_string(&request).unwrap_or_default(),
                "posting inference request"
            );

            let response = self
                .client
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(send_error)?;

            let status = response.status();
            if status != StatusCode::CREATED {
                warn!(status = %status, "provider rejected inference request");
                return Err(UpstreamError::BadStatus {
                    status: status.as_u16(),
                });
            }

            let bytes = response.bytes().await.map_err(send_error)?;
            let reply: ProviderResponse = serde_json::from_slice(&bytes)
                .map_err(|e| UpstreamError::MalformedBody(e.to_string()))?;
            Ok(reply.output.trim().to_string())
        };

        tokio::select! {
            () = cancel.cancelled() => Err(UpstreamError::Cancelled),
            result = exchange => result.map(Some),
        }
    }
}

// Both send and body-read failures land here; parse failures are mapped to
// `MalformedBody` at the call site.
fn send_error(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::DeadlineExceeded
    } else {
        UpstreamError::Transport(err.to_string())
    }
}
