// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Status endpoints are stateless constant responses; the streaming endpoint
// lives in the stream module and is mounted here. CORS is configured
// permissively for development; tighten `allow_origin` in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::app_state::AppState;
use crate::diagnostics;
use crate::feed::envelope::{CONTROL_CHECKS, VENUE_COUNT};

/// Constant p95 latency figure reported by the health endpoint.
const LATENCY_P95_MS: u32 = 150;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/api/hello", get(hello))
        .route("/health", get(health))
        .route("/test", get(diagnostics_report))
        .route("/sse/market", get(crate::api::stream::market_stream))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Greetings
// =============================================================================

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn root() -> impl IntoResponse {
    Json(MessageResponse {
        message: "Hello from the Pulse Feed backend!",
    })
}

async fn hello() -> impl IntoResponse {
    Json(MessageResponse {
        message: "Hello from the backend API!",
    })
}

// =============================================================================
// Health
// =============================================================================

/// Fixed health payload. Not derived from live state.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    latency_p95_ms: u32,
    integrations: u32,
    control_checks: u32,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        latency_p95_ms: LATENCY_P95_MS,
        integrations: VENUE_COUNT,
        control_checks: CONTROL_CHECKS,
    })
}

// =============================================================================
// Diagnostics
// =============================================================================

async fn diagnostics_report(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(diagnostics::run_diagnostics(&state).await)
}
