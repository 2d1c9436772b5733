// ── Runtime connection configuration ──
//
// These types describe *how* to reach the platform. They carry the token and
// connection tuning, but never touch disk. The CLI constructs a
// `PlatformConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default number of serial-number lookups in flight at once.
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 4;

/// Hard cap on concurrent lookups, whatever the caller asks for.
pub const MAX_LOOKUP_CONCURRENCY: usize = 8;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs on site installations).
    DangerAcceptInvalid,
}

/// Configuration for one platform session.
///
/// Built by the CLI, passed to `Platform` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Platform root URL (e.g., `http://10.0.0.5:2288`).
    pub url: Url,
    /// Bearer token sent on every request.
    pub token: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Lookups in flight during batch resolution. Clamped to
    /// `1..=MAX_LOOKUP_CONCURRENCY` when used.
    pub lookup_concurrency: usize,
}

impl PlatformConfig {
    pub fn new(url: Url, token: SecretString) -> Self {
        Self {
            url,
            token,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
        }
    }

    /// Effective concurrency after clamping.
    pub fn effective_concurrency(&self) -> usize {
        self.lookup_concurrency.clamp(1, MAX_LOOKUP_CONCURRENCY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(concurrency: usize) -> PlatformConfig {
        PlatformConfig {
            lookup_concurrency: concurrency,
            ..PlatformConfig::new(
                "http://10.0.0.5:2288".parse().unwrap(),
                SecretString::from("t".to_string()),
            )
        }
    }

    #[test]
    fn concurrency_is_clamped() {
        assert_eq!(config(0).effective_concurrency(), 1);
        assert_eq!(config(4).effective_concurrency(), 4);
        assert_eq!(config(64).effective_concurrency(), MAX_LOOKUP_CONCURRENCY);
    }
}
