// =============================================================================
// Settings — environment-sourced process configuration
// =============================================================================
//
// Read once at startup. Missing or malformed values substitute defaults with
// a warning; configuration is never a startup failure.
// =============================================================================

use tracing::warn;

/// Fallback signing secret for local/demo runs.
pub const DEFAULT_SECRET: &str = "demo-secret";
/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

const SECRET_VAR: &str = "SIGNING_SECRET";
const PORT_VAR: &str = "PORT";

/// Process-wide configuration, shared read-only across sessions.
#[derive(Clone)]
pub struct Settings {
    /// Shared secret used to sign every outbound feed event.
    pub signing_secret: String,
    /// TCP port the API server listens on.
    pub port: u16,
}

impl Settings {
    /// Load settings from the environment.
    pub fn from_env() -> Self {
        Self {
            signing_secret: secret_from(std::env::var(SECRET_VAR).ok()),
            port: port_from(std::env::var(PORT_VAR).ok()),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("signing_secret", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}

fn secret_from(raw: Option<String>) -> String {
    match raw {
        Some(secret) if !secret.is_empty() => secret,
        _ => {
            warn!("{SECRET_VAR} is not set — using the demo signing secret");
            DEFAULT_SECRET.to_string()
        }
    }
}

fn port_from(raw: Option<String>) -> u16 {
    match raw {
        None => DEFAULT_PORT,
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!(value = %value, "{PORT_VAR} is not a valid port — using {DEFAULT_PORT}");
            DEFAULT_PORT
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_defaults_when_unset_or_empty() {
        assert_eq!(secret_from(None), DEFAULT_SECRET);
        assert_eq!(secret_from(Some(String::new())), DEFAULT_SECRET);
    }

    #[test]
    fn secret_passes_through_when_set() {
        assert_eq!(secret_from(Some("s3cret".into())), "s3cret");
    }

    #[test]
    fn port_defaults_when_unset_or_malformed() {
        assert_eq!(port_from(None), DEFAULT_PORT);
        assert_eq!(port_from(Some("not-a-port".into())), DEFAULT_PORT);
        assert_eq!(port_from(Some("70000".into())), DEFAULT_PORT);
    }

    #[test]
    fn port_parses_when_valid() {
        assert_eq!(port_from(Some("9001".into())), 9001);
    }

    #[test]
    fn debug_redacts_the_secret() {
        let settings = Settings {
            signing_secret: "s3cret".into(),
            port: 8000,
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
