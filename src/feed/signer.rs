// =============================================================================
// Event Signer — HMAC-SHA256 integrity tags
// =============================================================================
//
// Every outbound feed event carries a keyed integrity tag so that consumers
// can verify it originated from a holder of the shared signing secret. The
// tag is computed over the exact serialized payload bytes that go on the
// wire: whitespace or key-ordering differences change the signature.
// =============================================================================

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Produce a lowercase HMAC-SHA256 hex signature of `payload` under `secret`.
///
/// Deterministic: identical secret and byte-exact payload always yield the
/// identical signature. An empty secret is valid input, not an error.
pub fn sign(secret: &[u8], payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
