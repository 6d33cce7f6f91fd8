// =============================================================================
// Shared Application State
// =============================================================================
//
// Read-only settings plus a diagnostic registry of live stream sessions.
// Generator state lives inside each session, never here, so no lock sits on
// the tick loop's hot path.
// =============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::settings::Settings;

/// Registry entry for one live stream connection.
#[derive(Debug, Clone, Serialize)]
pub struct StreamInfo {
    pub symbol: String,
    pub started_at: DateTime<Utc>,
}

/// Central state shared across handlers via `Arc<AppState>`.
pub struct AppState {
    pub settings: Settings,
    /// Live stream sessions keyed by session id. Diagnostic only.
    active_streams: RwLock<HashMap<Uuid, StreamInfo>>,
    /// Process start, for uptime reporting.
    start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            active_streams: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    // ── Stream registry ─────────────────────────────────────────────────

    /// Record a session at start. Paired with [`AppState::deregister_stream`]
    /// on termination.
    pub fn register_stream(&self, id: Uuid, symbol: &str) {
        self.active_streams.write().insert(
            id,
            StreamInfo {
                symbol: symbol.to_string(),
                started_at: Utc::now(),
            },
        );
    }

    pub fn deregister_stream(&self, id: &Uuid) {
        self.active_streams.write().remove(id);
    }

    pub fn active_stream_count(&self) -> usize {
        self.active_streams.read().len()
    }

    /// Snapshot of the live sessions for the diagnostic endpoint.
    pub fn active_stream_snapshot(&self) -> Vec<StreamInfo> {
        self.active_streams.read().values().cloned().collect()
    }

    // ── Timing ──────────────────────────────────────────────────────────

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}
