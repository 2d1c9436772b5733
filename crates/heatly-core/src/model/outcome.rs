// ── Workflow outcome types ──
//
// Every workflow run ends in exactly one `WorkflowOutcome`. The caller only
// ever sees the finished value; workflows assemble it locally and return it.

use heatly_api::Envelope;
use serde::Serialize;
use serde_json::Value;
use strum::{Display, IntoStaticStr};

/// What happened, as a closed set callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutcomeKind {
    Succeeded,
    /// Provisioning went through, but some inputs could not be resolved.
    PartiallySucceeded,
    /// Nothing was sent to the platform.
    NothingToSubmit,
    /// Cancelled before every lookup ran; nothing was sent.
    Cancelled,
    QueryFailed,
    /// The lookup worked but no record sits at the expected address.
    AddressNotFound,
    /// A record came back with a field the field mapper cannot decode.
    DataIntegrity,
    UpdateFailed,
    /// The update was accepted but the re-query could not confirm it.
    /// The change may or may not have happened.
    VerificationFailed,
}

impl OutcomeKind {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded | Self::PartiallySucceeded)
    }
}

/// Why a serial number did not resolve to a guid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum UnresolvedReason {
    #[serde(rename = "not found")]
    #[strum(serialize = "not found")]
    NotFound,
    #[serde(rename = "guid missing")]
    #[strum(serialize = "guid missing")]
    GuidMissing,
    #[serde(rename = "query failed")]
    #[strum(serialize = "query failed")]
    QueryFailed,
    #[serde(rename = "cancelled")]
    #[strum(serialize = "cancelled")]
    Cancelled,
}

/// Per-input result of batch resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceResolution {
    pub serial_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnresolvedReason>,
}

impl DeviceResolution {
    pub fn resolved(serial_no: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            serial_no: serial_no.into(),
            guid: Some(guid.into()),
            found: true,
            reason: None,
        }
    }

    pub fn unresolved(serial_no: impl Into<String>, reason: UnresolvedReason) -> Self {
        Self {
            serial_no: serial_no.into(),
            guid: None,
            found: false,
            reason: Some(reason),
        }
    }
}

/// Workflow-specific detail attached to an outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OutcomeDetail {
    /// Batch provisioning: one entry per input serial number, input order.
    #[serde(rename = "device_info")]
    Devices(Vec<DeviceResolution>),
    /// Rename: the raw verification query response, when one was made.
    #[serde(rename = "verify_result")]
    Verify(Option<Envelope<Value>>),
}

/// Final report of one workflow run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowOutcome {
    pub success: bool,
    pub kind: OutcomeKind,
    pub message: String,
    /// Raw response of the write step (provisioning or update). `None` when
    /// the write was never made or failed in transport.
    pub update_result: Option<Envelope<Value>>,
    #[serde(flatten)]
    pub detail: OutcomeDetail,
}

impl WorkflowOutcome {
    pub fn new(
        kind: OutcomeKind,
        message: impl Into<String>,
        update_result: Option<Envelope<Value>>,
        detail: OutcomeDetail,
    ) -> Self {
        Self {
            success: kind.is_success(),
            kind,
            message: message.into(),
            update_result,
            detail,
        }
    }

    /// Per-device detail of a batch run; empty for a rename.
    pub fn devices(&self) -> &[DeviceResolution] {
        match &self.detail {
            OutcomeDetail::Devices(devices) => devices,
            OutcomeDetail::Verify(_) => &[],
        }
    }

    /// Raw verification response of a rename run.
    pub fn verify_result(&self) -> Option<&Envelope<Value>> {
        match &self.detail {
            OutcomeDetail::Verify(v) => v.as_ref(),
            OutcomeDetail::Devices(_) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_follows_kind() {
        let ok = WorkflowOutcome::new(
            OutcomeKind::PartiallySucceeded,
            "",
            None,
            OutcomeDetail::Devices(Vec::new()),
        );
        assert!(ok.success);

        let ambiguous = WorkflowOutcome::new(
            OutcomeKind::VerificationFailed,
            "",
            None,
            OutcomeDetail::Verify(None),
        );
        assert!(!ambiguous.success);
    }

    #[test]
    fn reasons_render_as_plain_text() {
        assert_eq!(UnresolvedReason::GuidMissing.to_string(), "guid missing");
        assert_eq!(
            serde_json::to_value(UnresolvedReason::NotFound).unwrap(),
            json!("not found")
        );
        assert_eq!(OutcomeKind::AddressNotFound.to_string(), "address_not_found");
    }

    #[test]
    fn detail_flattens_under_its_own_key() {
        let outcome = WorkflowOutcome::new(
            OutcomeKind::NothingToSubmit,
            "serial number list is empty",
            None,
            OutcomeDetail::Devices(Vec::new()),
        );
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["device_info"], json!([]));
        assert!(value.get("verify_result").is_none());
        assert_eq!(value["update_result"], json!(null));
    }
}
