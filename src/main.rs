// =============================================================================
// Pulse Feed — Main Entry Point
// =============================================================================
//
// Serves a continuous, HMAC-signed feed of synthetic market bars over SSE,
// plus trivial status endpoints. One independent generator task runs per
// client connection; the process keeps no cross-request market state.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod diagnostics;
mod feed;
mod settings;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Pulse Feed — Starting Up                          ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let settings = Settings::from_env();
    let port = settings.port;
    info!(port, "configuration loaded");

    // ── 2. Shared state & router ─────────────────────────────────────────
    let state = Arc::new(AppState::new(settings));
    let app = api::rest::router(state);

    // ── 3. Serve until shutdown ──────────────────────────────────────────
    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("Pulse Feed shut down complete.");
    Ok(())
}

/// Resolve when Ctrl+C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
