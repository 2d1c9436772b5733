//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with actionable
//! help text, and workflow outcomes that did not succeed into exit codes.

use miette::Diagnostic;
use thiserror::Error;

use heatly_config::ConfigError;
use heatly_core::{CoreError, OutcomeKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    /// A workflow ran to completion and reported failure.
    pub const WORKFLOW: i32 = 10;
    /// The write went through but the verification read did not confirm it.
    pub const UNVERIFIED: i32 = 11;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to platform at {url}: {reason}")]
    #[diagnostic(
        code(heatly::connection_failed),
        help(
            "Check that the platform is reachable from this host.\n\
             URL: {url}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(heatly::timeout),
        help("Increase the timeout with --timeout or check platform responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(heatly::auth_failed),
        help("The token may have expired. Store a fresh one with: heatly config set-token")
    )]
    AuthFailed { message: String },

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(heatly::no_credentials),
        help(
            "Configure one with: heatly config init\n\
             Or set the HEATLY_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Platform ─────────────────────────────────────────────────────
    #[error("No {resource_type} matches '{identifier}'")]
    #[diagnostic(code(heatly::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("Platform rejected the request: {message}")]
    #[diagnostic(code(heatly::rejected))]
    Rejected { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(heatly::api_error))]
    ApiError { message: String },

    // ── Workflows ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(heatly::workflow_failed), help("Outcome: {kind}"))]
    WorkflowFailed { kind: OutcomeKind, message: String },

    #[error("{message}")]
    #[diagnostic(
        code(heatly::unverified),
        help(
            "The update was accepted but could not be confirmed.\n\
             Check with: heatly valves find --serial <NEW_SERIAL> --all-nodes"
        )
    )]
    VerificationAmbiguous { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(heatly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(heatly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: heatly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(heatly::no_config),
        help(
            "Create one with: heatly config init\n\
             Or pass --url and --token.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(heatly::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(heatly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(heatly::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::WorkflowFailed { .. } => exit_code::WORKFLOW,
            Self::VerificationAmbiguous { .. } => exit_code::UNVERIFIED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Error for a workflow outcome that did not succeed.
    pub fn from_outcome(kind: OutcomeKind, message: String) -> Self {
        match kind {
            OutcomeKind::VerificationFailed => Self::VerificationAmbiguous { message },
            kind => Self::WorkflowFailed { kind, message },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Timeout => Self::Timeout,
            CoreError::Rejected { message } => Self::Rejected { message },
            CoreError::Api { message, status } => Self::ApiError {
                message: match status {
                    Some(code) => format!("{message} [HTTP {code}]"),
                    None => message,
                },
            },
            CoreError::FieldMap(e) => Self::ApiError {
                message: e.to_string(),
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_failure_has_its_own_exit_code() {
        let err = CliError::from_outcome(OutcomeKind::VerificationFailed, "re-query failed".into());
        assert_eq!(err.exit_code(), exit_code::UNVERIFIED);

        let err = CliError::from_outcome(OutcomeKind::AddressNotFound, "no device".into());
        assert_eq!(err.exit_code(), exit_code::WORKFLOW);
    }

    #[test]
    fn core_errors_keep_their_category() {
        let err: CliError = CoreError::AuthenticationFailed {
            message: "token rejected (HTTP 401)".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);

        let err: CliError = CoreError::Timeout.into();
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn missing_token_is_an_auth_error() {
        let err: CliError = ConfigError::NoCredentials {
            profile: "plant".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
