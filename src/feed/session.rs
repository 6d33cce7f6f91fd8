// =============================================================================
// Stream Session — per-connection tick loop
// =============================================================================
//
// One StreamSession per open stream connection. The session owns its
// PriceProcess (generator state is never shared across sessions) and the
// sender half of the transport channel. Each tick: advance the walk, build
// and sign the event, push the serialized frame, sleep one tick interval.
//
// Disconnection detection: the send itself is the liveness check, performed
// once per iteration. A closed channel means the transport dropped the
// receiver (client gone) and terminates the loop; nothing is delivered to an
// already-closed connection.
//
// The cadence is a plain sleep. It is not adjusted for time spent producing
// the event, so cumulative drift across many ticks is accepted.
// =============================================================================

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::feed::envelope::{Envelope, SignedEvent};
use crate::feed::price::PriceProcess;

/// Symbol used when the client does not ask for one.
pub const DEFAULT_SYMBOL: &str = "BTC-USD";
/// First open of every fresh session.
pub const DEFAULT_BASE_PRICE: f64 = 68_000.0;
/// One bar per second.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

// =============================================================================
// StreamConfig
// =============================================================================

/// Immutable per-session configuration, fixed at session start from request
/// parameters and process-wide settings.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub symbol: String,
    pub tick_interval: Duration,
    pub base_price: f64,
    pub secret: String,
}

impl StreamConfig {
    pub fn new(symbol: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            tick_interval: TICK_INTERVAL,
            base_price: DEFAULT_BASE_PRICE,
            secret: secret.into(),
        }
    }
}

// =============================================================================
// StreamSession
// =============================================================================

/// Owns one connection's generator lifecycle, from the first tick until the
/// client disconnects.
pub struct StreamSession {
    id: Uuid,
    config: StreamConfig,
    prices: PriceProcess,
    sink: mpsc::Sender<String>,
}

impl StreamSession {
    pub fn new(config: StreamConfig, sink: mpsc::Sender<String>) -> Self {
        let prices = PriceProcess::new(config.base_price);
        Self {
            id: Uuid::new_v4(),
            config,
            prices,
            sink,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run the tick loop until the transport reports disconnection.
    ///
    /// Returns the number of events emitted, logged on termination.
    pub async fn run(mut self) -> u64 {
        info!(session = %self.id, symbol = %self.config.symbol, "stream session started");

        let mut emitted: u64 = 0;
        loop {
            let sample = self.prices.next_tick();
            let envelope = Envelope::build(&self.config, sample);

            let frame = match SignedEvent::seal(envelope, self.config.secret.as_bytes())
                .and_then(|event| serde_json::to_string(&event))
            {
                Ok(frame) => frame,
                Err(e) => {
                    // Not fatal for the session; skip this tick.
                    warn!(session = %self.id, error = %e, "failed to serialize signed event");
                    tokio::time::sleep(self.config.tick_interval).await;
                    continue;
                }
            };

            if self.sink.send(frame).await.is_err() {
                debug!(session = %self.id, "transport channel closed — client disconnected");
                break;
            }
            emitted += 1;

            tokio::time::sleep(self.config.tick_interval).await;
        }

        info!(
            session = %self.id,
            symbol = %self.config.symbol,
            emitted,
            "stream session terminated"
        );
        emitted
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::envelope::SignedEvent;
    use crate::feed::signer;

    fn spawn_session(
        symbol: &str,
        capacity: usize,
    ) -> (mpsc::Receiver<String>, tokio::task::JoinHandle<u64>) {
        let (tx, rx) = mpsc::channel(capacity);
        let session = StreamSession::new(StreamConfig::new(symbol, "test-secret"), tx);
        (rx, tokio::spawn(session.run()))
    }

    async fn recv_event(rx: &mut mpsc::Receiver<String>) -> SignedEvent {
        let frame = rx.recv().await.expect("session should emit an event");
        serde_json::from_str(&frame).expect("frame should be a signed event")
    }

    #[tokio::test(start_paused = true)]
    async fn every_event_carries_the_requested_symbol() {
        let (mut rx, handle) = spawn_session("ETH-USD", 8);
        for _ in 0..3 {
            let event = recv_event(&mut rx).await;
            assert_eq!(event.payload.symbol, "ETH-USD");
        }
        drop(rx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn bars_continue_across_ticks() {
        let (mut rx, handle) = spawn_session("BTC-USD", 8);
        let first = recv_event(&mut rx).await;
        assert_eq!(first.payload.bar.o, DEFAULT_BASE_PRICE);

        let mut previous_close = first.payload.bar.c;
        for _ in 0..4 {
            let event = recv_event(&mut rx).await;
            assert_eq!(event.payload.bar.o, previous_close);
            previous_close = event.payload.bar.c;
        }
        drop(rx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn emitted_signatures_verify_against_payload_bytes() {
        let (mut rx, handle) = spawn_session("BTC-USD", 8);
        for _ in 0..2 {
            let event = recv_event(&mut rx).await;
            let payload = serde_json::to_string(&event.payload).unwrap();
            assert_eq!(event.sig, signer::sign(b"test-secret", &payload));
        }
        drop(rx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn session_terminates_once_client_disconnects() {
        let (mut rx, handle) = spawn_session("BTC-USD", 1);
        let _ = recv_event(&mut rx).await;
        drop(rx);

        // The loop must observe the closed channel on its next send and
        // stop without emitting anywhere else.
        let emitted = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("session should terminate after disconnect")
            .unwrap();
        assert!(emitted >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cadence_is_one_event_per_second() {
        let (mut rx, handle) = spawn_session("BTC-USD", 1);
        let started = tokio::time::Instant::now();
        for _ in 0..5 {
            let _ = recv_event(&mut rx).await;
        }
        // First event is immediate; the next four each cost one tick.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(4), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(5), "elapsed {elapsed:?}");
        drop(rx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_sessions_do_not_share_state() {
        let (mut rx_a, handle_a) = spawn_session("BTC-USD", 8);
        let (mut rx_b, handle_b) = spawn_session("BTC-USD", 8);

        let mut closes_a = Vec::new();
        let mut closes_b = Vec::new();
        for _ in 0..5 {
            closes_a.push(recv_event(&mut rx_a).await.payload.bar.c);
            closes_b.push(recv_event(&mut rx_b).await.payload.bar.c);
        }
        assert_ne!(closes_a, closes_b, "independent sessions should diverge");

        drop(rx_a);
        drop(rx_b);
        handle_a.await.unwrap();
        handle_b.await.unwrap();
    }
}
