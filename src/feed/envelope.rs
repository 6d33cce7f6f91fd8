// =============================================================================
// Feed Envelope — signed event assembly
// =============================================================================
//
// Each tick produces one Envelope (feed metadata + bar) and one SignedEvent
// (envelope + HMAC tag). Struct field order here is the wire key order; the
// signature is computed over the exact serialized envelope bytes, so that
// order must stay stable.
// =============================================================================

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::feed::price::TickSample;
use crate::feed::session::StreamConfig;
use crate::feed::signer;

/// Venues aggregated by the simulated feed. Constant metadata.
pub const VENUE_COUNT: u32 = 18;
/// Integrity control checks performed upstream. Constant metadata.
pub const CONTROL_CHECKS: u32 = 42;

// =============================================================================
// Wire types
// =============================================================================

/// One OHLC price sample for a one-second interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bar {
    /// Bar timestamp, unix seconds.
    pub t: i64,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
}

/// Outbound event payload: feed metadata plus one bar. Built fresh each tick
/// and discarded once signed and transmitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Event timestamp, RFC 3339 with a numeric UTC offset.
    #[serde(serialize_with = "rfc3339_numeric_offset")]
    pub ts: DateTime<Utc>,
    pub symbol: String,
    pub latency_ms: i64,
    pub venue_count: u32,
    pub control_checks: u32,
    pub bar: Bar,
}

/// Envelope plus its integrity tag. Exists only to be serialized onto the
/// wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedEvent {
    pub payload: Envelope,
    pub sig: String,
}

impl Envelope {
    /// Assemble the envelope for one tick.
    ///
    /// Wall-clock time is read once; both the RFC 3339 event timestamp and
    /// the bar's unix-seconds `t` derive from the same instant.
    pub fn build(config: &StreamConfig, sample: TickSample) -> Self {
        let now = Utc::now();
        Self {
            ts: now,
            symbol: config.symbol.clone(),
            latency_ms: sample.latency_ms,
            venue_count: VENUE_COUNT,
            control_checks: CONTROL_CHECKS,
            bar: Bar {
                t: now.timestamp(),
                o: sample.open,
                h: sample.high,
                l: sample.low,
                c: sample.close,
            },
        }
    }
}

impl SignedEvent {
    /// Sign `payload` over its serialized bytes and wrap both.
    ///
    /// Serialization of the envelope is deterministic, so re-serializing it
    /// inside the event reproduces exactly the bytes that were signed.
    pub fn seal(payload: Envelope, secret: &[u8]) -> serde_json::Result<Self> {
        let serialized = serde_json::to_string(&payload)?;
        let sig = signer::sign(secret, &serialized);
        Ok(Self { payload, sig })
    }
}

/// Serialize a timestamp as RFC 3339 with a numeric `+00:00` offset rather
/// than `Z`.
fn rfc3339_numeric_offset<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, false))
}
