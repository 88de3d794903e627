//! HTTP surface of the relay.
//!
//! Routes:
//! - `POST /api/submit` forwards a lead to the configured webhook
//! - `GET /` and any other path fall through to the static form assets
//!
//! Requests are traced and bounded by a timeout. The server stops on CTRL+C or SIGTERM after
//! in-flight requests finish.

pub mod handlers;

use std::{net::SocketAddr, path::Path, sync::Arc, time::Duration};

use axum::{routing::post, Router};
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::core::relay::LeadRelay;

/// Slack added on top of the webhook timeout at each outer bound.
const TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Shared state of the `/api/submit` route.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<LeadRelay>,
    /// The handler answers with a JSON failure once this much time has passed.
    pub submit_deadline: Duration,
}

/// Builds the router. `static_dir` must contain `index.html` for `GET /`.
///
/// `webhook_timeout` is the outbound call's timeout. The submit handler's deadline and the
/// transport-level request timeout are derived from it, in that order, so a slow webhook is
/// always reported through the JSON body rather than a bare 408.
pub fn create_router(
    relay: Arc<LeadRelay>,
    static_dir: impl AsRef<Path>,
    webhook_timeout: Duration,
) -> Router {
    let assets = ServeDir::new(static_dir.as_ref()).append_index_html_on_directories(true);
    let submit_deadline = webhook_timeout + TIMEOUT_MARGIN;

    Router::new()
        .route("/api/submit", post(handlers::submit_lead))
        .fallback_service(assets)
        .layer(TimeoutLayer::new(submit_deadline + TIMEOUT_MARGIN))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            relay,
            submit_deadline,
        })
}

/// Binds `addr` and serves until a shutdown signal arrives.
///
/// # Errors
///
/// Returns `std::io::Error` if the address cannot be bound.
pub async fn start_server(
    relay: Arc<LeadRelay>,
    static_dir: impl AsRef<Path>,
    webhook_timeout: Duration,
    addr: SocketAddr,
) -> Result<(), std::io::Error> {
    let app = create_router(relay, static_dir, webhook_timeout);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server running at http://{}", actual_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Resolves when `signal` fires. If the handler could not be installed, never resolves,
/// so a missing handler cannot stop the server.
async fn signal_or_pending<F>(name: &str, signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("Failed to install {} handler: {}", name, e);
        std::future::pending::<()>().await;
    }
}

async fn shutdown_signal() {
    let ctrl_c = signal_or_pending("Ctrl+C", tokio::signal::ctrl_c());

    #[cfg(unix)]
    let terminate = signal_or_pending("SIGTERM", async {
        let mut signal =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        signal.recv().await;
        Ok::<(), std::io::Error>(())
    });

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    warn!("Waiting for in-flight requests to complete");
}
