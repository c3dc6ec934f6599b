//! CLI entry point - the composition root.
//!
//! This is the only place where real infrastructure is wired together: the
//! listener is bound here, the reqwest-backed client is constructed here,
//! and both are handed to the server loop. Everything below this file works
//! against ports.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use gizbridge_core::settings::{
    DEFAULT_HOST, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_UPSTREAM_URL, ResponseMode, Settings,
    validate_settings,
};
use gizbridge_proxy::server::{AppState, serve};
use gizbridge_proxy::upstream::GizClient;

/// How long shutdown waits for in-flight requests before giving up.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// OpenAI-compatible adapter for the GizAI inference API.
#[derive(Debug, Parser)]
#[command(name = "gizbridge", version, about)]
struct Cli {
    /// Bind host for the HTTP listener.
    #[arg(long, env = "GIZBRIDGE_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Bind port; defaults to 8000 in openai mode, 8001 in minimal mode.
    #[arg(long, env = "GIZBRIDGE_PORT")]
    port: Option<u16>,

    /// Response shape: "openai" (full envelope) or "minimal" ({"output"}).
    #[arg(long, env = "GIZBRIDGE_MODE", default_value = "openai", value_parser = parse_mode)]
    mode: ResponseMode,

    /// Provider endpoint inference calls are forwarded to.
    #[arg(long, env = "GIZBRIDGE_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    upstream_url: String,

    /// Forward proxy for the outbound call (http:// or https://).
    #[arg(long, env = "GIZBRIDGE_OUTBOUND_PROXY")]
    outbound_proxy: Option<String>,

    /// Deadline for one outbound call, in seconds.
    #[arg(long, env = "GIZBRIDGE_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Reject unknown message roles with 400 instead of forwarding them.
    #[arg(long, env = "GIZBRIDGE_STRICT_ROLES")]
    strict_roles: bool,
}

fn parse_mode(value: &str) -> Result<ResponseMode, String> {
    ResponseMode::parse(value)
        .ok_or_else(|| format!("unknown mode '{value}' (expected 'openai' or 'minimal')"))
}

impl Cli {
    fn into_settings(self) -> Settings {
        Settings {
            host: self.host,
            port: self.port,
            mode: self.mode,
            upstream_url: self.upstream_url,
            outbound_proxy: self.outbound_proxy,
            request_timeout_secs: self.timeout_secs,
            strict_roles: self.strict_roles,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = Cli::parse().into_settings();
    validate_settings(&settings)?;

    // Bind first so a taken port fails before anything else starts.
    let listener = TcpListener::bind(settings.listen_addr()).await?;
    info!("Bound {}", listener.local_addr()?);

    let upstream = Arc::new(GizClient::new(&settings)?);
    let cancel = CancellationToken::new();
    let state = AppState::new(
        upstream,
        settings.mode,
        settings.strict_roles,
        cancel.clone(),
    );

    let server = tokio::spawn(serve(listener, state, cancel.clone()));

    supervise(server, tokio::signal::ctrl_c(), cancel).await
}

/// Watch the server task until it exits or `shutdown` resolves.
///
/// An exit before any shutdown signal is a crash and surfaces immediately.
/// After the signal the task gets [`SHUTDOWN_GRACE`] to drain before it is
/// aborted.
async fn supervise(
    mut server: JoinHandle<anyhow::Result<()>>,
    shutdown: impl Future<Output = io::Result<()>>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tokio::select! {
        joined = &mut server => {
            warn!("Server stopped before any shutdown signal");
            return joined?;
        }
        signal = shutdown => {
            signal?;
            info!("Shutdown signal received");
        }
    }

    cancel.cancel();
    match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
        Ok(joined) => joined?,
        Err(_) => {
            warn!("Server did not stop within {SHUTDOWN_GRACE:?}, aborting it");
            server.abort();
            Ok(())
        }
    }
}
