// ── Resolve-and-provision ──
//
// Resolution first, then a single dispatch of whatever resolved. The per-item
// detail list always has one entry per input, in input order.

use heatly_api::PlatformClient;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{StepError, dispatch, resolver};
use crate::model::{OutcomeDetail, OutcomeKind, WorkflowOutcome};

/// Resolve `serials` to guids and provision the ones that resolved.
pub async fn resolve_and_provision(
    client: &PlatformClient,
    serials: &[String],
    concurrency: usize,
    cancel: &CancellationToken,
) -> WorkflowOutcome {
    if serials.is_empty() {
        return WorkflowOutcome::new(
            OutcomeKind::NothingToSubmit,
            "serial number list is empty",
            None,
            OutcomeDetail::Devices(Vec::new()),
        );
    }

    let report = resolver::resolve_serials(client, serials, concurrency, cancel).await;
    let resolved = report.resolved();
    let unresolved: Vec<&str> = report.unresolved().into_iter().map(|(s, _)| s).collect();
    let unresolved_count = unresolved.len();
    info!(
        resolved = resolved.len(),
        unresolved = unresolved_count,
        "resolution finished"
    );

    if report.was_cancelled() {
        let message = format!(
            "cancelled after resolving {} of {} devices; nothing submitted",
            resolved.len(),
            serials.len()
        );
        return WorkflowOutcome::new(
            OutcomeKind::Cancelled,
            message,
            None,
            OutcomeDetail::Devices(report.devices),
        );
    }

    let (kind, message, update_result) = match dispatch::submit(client, &resolved).await {
        Ok(None) => (
            OutcomeKind::NothingToSubmit,
            "no resolvable devices; nothing submitted".to_owned(),
            None,
        ),
        Ok(Some(response)) if unresolved.is_empty() => (
            OutcomeKind::Succeeded,
            format!("all {} devices provisioned", resolved.len()),
            Some(response),
        ),
        Ok(Some(response)) => (
            OutcomeKind::PartiallySucceeded,
            format!(
                "provisioned {} devices; {unresolved_count} unresolved: [{}]",
                resolved.len(),
                unresolved.join(", ")
            ),
            Some(response),
        ),
        Err(StepError::Transport(e)) => (
            OutcomeKind::UpdateFailed,
            format!("provisioning request failed: {e}"),
            None,
        ),
        Err(e) => (
            OutcomeKind::UpdateFailed,
            format!("provisioning failed: {e}"),
            e.into_response(),
        ),
    };

    WorkflowOutcome::new(kind, message, update_result, OutcomeDetail::Devices(report.devices))
}
