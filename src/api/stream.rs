// =============================================================================
// SSE Stream Endpoint — transport adapter for stream sessions
// =============================================================================
//
// GET /sse/market?symbol=… opens a text/event-stream response. The handler
// spawns one StreamSession task per connection and bridges its output channel
// into the SSE body. When the client goes away axum drops the body stream,
// the channel closes, and the session loop observes it on its next send.
// =============================================================================

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::sse::{Event, Sse},
};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use crate::app_state::AppState;
use crate::feed::session::{StreamConfig, StreamSession, DEFAULT_SYMBOL};

/// Transport buffer between the session task and the SSE body. A slow client
/// stalls the tick loop rather than queueing unboundedly.
const CHANNEL_CAPACITY: usize = 16;

#[derive(Deserialize)]
pub struct StreamQuery {
    symbol: Option<String>,
}

/// Axum handler for the market stream.
pub async fn market_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let symbol = query
        .symbol
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());

    let config = StreamConfig::new(symbol.clone(), state.settings.signing_secret.clone());
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let session = StreamSession::new(config, tx);
    let session_id = session.id();

    info!(session = %session_id, symbol = %symbol, "stream connection opened");
    state.register_stream(session_id, &symbol);

    let task_state = state.clone();
    tokio::spawn(async move {
        session.run().await;
        task_state.deregister_stream(&session_id);
    });

    let stream =
        ReceiverStream::new(rx).map(|frame| Ok::<_, Infallible>(Event::default().data(frame)));
    Sse::new(stream)
}
