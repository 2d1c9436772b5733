// ── Workflows ──
//
// Multi-step operations built on the raw client. Every step returns
// `Result<_, StepError>`; the public entry points fold those into a
// `WorkflowOutcome` and never return `Err`, so one failed item never stops
// the rest of a batch.

pub mod dispatch;
pub mod provision;
pub mod rename;
pub mod resolver;

use heatly_api::Envelope;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::UnresolvedReason;

pub use provision::resolve_and_provision;
pub use rename::{RenameRequest, rename_device};
pub use resolver::{ResolutionReport, resolve_serials};

/// A single workflow step failed. Variants follow the failure taxonomy the
/// outcome kinds are derived from.
#[derive(Debug, Error)]
pub enum StepError {
    /// Connection, timeout, non-2xx, or unparseable body.
    #[error(transparent)]
    Transport(#[from] heatly_api::Error),

    /// The platform answered with a non-zero `resultCode`.
    #[error("{message}")]
    Business {
        message: String,
        response: Envelope<Value>,
    },

    /// A successful response is missing a field or carries one that cannot
    /// be decoded.
    #[error("{0}")]
    DataShape(String),

    /// The call worked, but nothing in the result matches what the caller
    /// expected to find.
    #[error("{0}")]
    Reconciliation(String),

    /// The write was accepted but the follow-up read cannot confirm it.
    #[error("{message}")]
    VerificationAmbiguous {
        message: String,
        response: Option<Envelope<Value>>,
    },
}

impl StepError {
    /// Raw platform response attached to this failure, if any.
    pub fn into_response(self) -> Option<Envelope<Value>> {
        match self {
            Self::Business { response, .. } => Some(response),
            Self::VerificationAmbiguous { response, .. } => response,
            Self::Transport(_) | Self::DataShape(_) | Self::Reconciliation(_) => None,
        }
    }

    /// Whether running the same step again could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_transient())
    }

    pub(crate) fn unresolved_reason(&self) -> UnresolvedReason {
        match self {
            Self::DataShape(_) => UnresolvedReason::GuidMissing,
            Self::Reconciliation(_) => UnresolvedReason::NotFound,
            Self::Transport(_) | Self::Business { .. } | Self::VerificationAmbiguous { .. } => {
                UnresolvedReason::QueryFailed
            }
        }
    }
}

/// Pass a business-success envelope through; turn anything else into
/// `StepError::Business` carrying the platform's message verbatim.
pub(crate) fn accept<T: Serialize>(envelope: Envelope<T>) -> Result<Envelope<T>, StepError> {
    if envelope.is_success() {
        Ok(envelope)
    } else {
        Err(StepError::Business {
            message: envelope.message_or_code(),
            response: envelope.to_raw(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn business_failure_keeps_message_and_response() {
        let envelope: Envelope<Value> = Envelope {
            result_code: 3,
            message: Some("集中器离线".into()),
            data: None,
        };
        let err = accept(envelope).unwrap_err();
        assert_eq!(err.to_string(), "集中器离线");
        assert_eq!(err.unresolved_reason(), UnresolvedReason::QueryFailed);
        assert_eq!(err.into_response().map(|r| r.result_code), Some(3));
    }

    #[test]
    fn only_transport_failures_can_be_transient() {
        let outage = StepError::Transport(heatly_api::Error::Http {
            status: 502,
            body: "bad gateway".into(),
        });
        assert!(outage.is_transient());
        assert_eq!(outage.unresolved_reason(), UnresolvedReason::QueryFailed);

        let rejected = StepError::Transport(heatly_api::Error::Http {
            status: 400,
            body: String::new(),
        });
        assert!(!rejected.is_transient());
        assert!(!StepError::DataShape("no guid".into()).is_transient());
    }
}
