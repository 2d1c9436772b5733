// ── Core error types ──
//
// Errors for the pass-through primitives and session setup. The workflow
// functions never return these: they fold every failure into a
// `WorkflowOutcome`. The `From<heatly_api::Error>` impl translates
// transport-layer errors into domain-appropriate variants.

use thiserror::Error;

use crate::convert::FieldMapError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to platform at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Platform request timed out")]
    Timeout,

    // ── Platform responses ───────────────────────────────────────────
    /// The platform answered with a non-zero `resultCode`.
    #[error("Rejected by platform: {message}")]
    Rejected { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error(transparent)]
    FieldMap(#[from] FieldMapError),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<heatly_api::Error> for CoreError {
    fn from(err: heatly_api::Error) -> Self {
        let status = err.status();
        match err {
            heatly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            heatly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status,
                    }
                }
            }
            heatly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            heatly_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            heatly_api::Error::Http { status: code, body } => CoreError::Api {
                message: format!("HTTP {code}: {body}"),
                status,
            },
            heatly_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Unexpected response shape: {message}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_survives_conversion() {
        let err: CoreError = heatly_api::Error::Http {
            status: 404,
            body: "missing".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Api { status: Some(404), .. }));
    }

    #[test]
    fn auth_failure_stays_auth_failure() {
        let err: CoreError = heatly_api::Error::Authentication {
            message: "token rejected (HTTP 401)".into(),
        }
        .into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }
}
