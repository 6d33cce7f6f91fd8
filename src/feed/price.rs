// =============================================================================
// Price Process — synthetic OHLC random walk
// =============================================================================
//
// One PriceProcess per stream session. Each tick advances a random walk: the
// previous close becomes the next open, high/low are derived from the open
// with strictly positive multipliers on each side, and the close is sampled
// inside [low, high]. Simulated network latency follows its own clamped
// jitter walk.
//
// `last_close` carries the full-precision close between ticks; rounding to
// two decimals happens only on the emitted sample, so long-run drift does not
// depend on display rounding.
// =============================================================================

use rand::Rng;

/// Lower clamp for simulated latency (milliseconds).
pub const MIN_LATENCY_MS: i64 = 20;
/// Upper clamp for simulated latency (milliseconds).
pub const MAX_LATENCY_MS: i64 = 250;
/// Latency of a fresh session before any jitter is applied (milliseconds).
const INITIAL_LATENCY_MS: i64 = 50;

/// Maximum per-tick latency jitter in either direction (milliseconds).
const LATENCY_JITTER_MS: i64 = 20;

/// Bounds for the per-tick high/low excursion multipliers.
const MIN_EXCURSION: f64 = 0.0001;
const MAX_EXCURSION: f64 = 0.0015;

// =============================================================================
// SimState
// =============================================================================

/// Per-session generator state. Owned exclusively by one [`PriceProcess`];
/// never shared across sessions, so concurrent streams diverge immediately.
#[derive(Debug, Clone)]
pub struct SimState {
    /// Full-precision close carried into the next tick's open.
    pub last_close: f64,
    /// Simulated network latency, always within the clamp bounds.
    pub latency_ms: i64,
}

/// One tick's output: OHLC rounded to two decimals, plus the latency in
/// effect for the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSample {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub latency_ms: i64,
}

// =============================================================================
// PriceProcess
// =============================================================================

/// Stateful random-walk bar generator.
pub struct PriceProcess {
    state: SimState,
}

impl PriceProcess {
    /// Create a fresh process whose first open equals `base_price`.
    pub fn new(base_price: f64) -> Self {
        Self {
            state: SimState {
                last_close: base_price,
                latency_ms: INITIAL_LATENCY_MS,
            },
        }
    }

    /// Advance the walk by one tick and return the sample.
    ///
    /// Derivation order matters for the bar invariant: high and low come from
    /// the open with strictly positive multipliers (so low < open < high),
    /// the close is sampled inside [low, high], and rounding is applied last.
    /// Rounding is monotonic, so `l <= o <= h` and `l <= c <= h` survive it.
    pub fn next_tick(&mut self) -> TickSample {
        let mut rng = rand::rng();

        let jitter = rng.random_range(-LATENCY_JITTER_MS..=LATENCY_JITTER_MS);
        self.state.latency_ms =
            (self.state.latency_ms + jitter).clamp(MIN_LATENCY_MS, MAX_LATENCY_MS);

        let open = self.state.last_close;
        let high = open * (1.0 + rng.random_range(MIN_EXCURSION..=MAX_EXCURSION));
        let low = open * (1.0 - rng.random_range(MIN_EXCURSION..=MAX_EXCURSION));
        let close = rng.random_range(low..=high);
        self.state.last_close = close;

        TickSample {
            open: round2(open),
            high: round2(high),
            low: round2(low),
            close: round2(close),
            latency_ms: self.state.latency_ms,
        }
    }

    /// Full-precision close that seeds the next tick's open.
    pub fn last_close(&self) -> f64 {
        self.state.last_close
    }
}

/// Round to two decimal places for wire output.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
