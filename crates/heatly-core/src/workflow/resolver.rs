// ── Identifier resolution ──
//
// Maps each input serial number to its collector guid with one lookup per
// item. Lookups run on a bounded `buffered` stream, so at most `n` are in
// flight and results come back in input order regardless of which finished
// first.

use std::collections::{BTreeSet, HashSet};

use futures_util::StreamExt;
use futures_util::stream;
use heatly_api::{FindNetEquipmentParams, PlatformClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{StepError, accept};
use crate::config::MAX_LOOKUP_CONCURRENCY;
use crate::model::{DeviceResolution, NetEquipment, ResolvedDevice, UnresolvedReason};

/// Per-item results of one resolution pass, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionReport {
    pub devices: Vec<DeviceResolution>,
}

impl ResolutionReport {
    /// Devices with a usable guid, input order preserved.
    pub fn resolved(&self) -> Vec<ResolvedDevice> {
        self.devices
            .iter()
            .filter(|d| d.found)
            .filter_map(|d| {
                d.guid.as_ref().map(|guid| ResolvedDevice {
                    serial_no: d.serial_no.clone(),
                    guid: guid.clone(),
                })
            })
            .collect()
    }

    /// Serial numbers that did not resolve, with the reason.
    pub fn unresolved(&self) -> Vec<(&str, UnresolvedReason)> {
        self.devices
            .iter()
            .filter_map(|d| d.reason.map(|r| (d.serial_no.as_str(), r)))
            .collect()
    }

    pub fn was_cancelled(&self) -> bool {
        self.devices
            .iter()
            .any(|d| d.reason == Some(UnresolvedReason::Cancelled))
    }
}

/// Resolve every serial number to a guid.
///
/// Duplicates are resolved independently. Items not yet started when
/// `cancel` fires are reported as `cancelled` without a lookup.
pub async fn resolve_serials(
    client: &PlatformClient,
    serials: &[String],
    concurrency: usize,
    cancel: &CancellationToken,
) -> ResolutionReport {
    warn_on_duplicates(serials);

    let limit = concurrency.clamp(1, MAX_LOOKUP_CONCURRENCY);
    debug!(count = serials.len(), limit, "resolving serial numbers");

    let devices = stream::iter(serials)
        .map(|serial| resolve_one(client, serial, cancel))
        .buffered(limit)
        .collect::<Vec<_>>()
        .await;

    ResolutionReport { devices }
}

async fn resolve_one(
    client: &PlatformClient,
    serial: &str,
    cancel: &CancellationToken,
) -> DeviceResolution {
    if cancel.is_cancelled() {
        debug!(serial_no = serial, "skipping lookup after cancellation");
        return DeviceResolution::unresolved(serial, UnresolvedReason::Cancelled);
    }

    match lookup_guid(client, serial).await {
        Ok(guid) => DeviceResolution::resolved(serial, guid),
        Err(e) => {
            let reason = e.unresolved_reason();
            warn!(
                serial_no = serial,
                %reason,
                transient = e.is_transient(),
                error = %e,
                "serial number not resolved"
            );
            DeviceResolution::unresolved(serial, reason)
        }
    }
}

/// One `serial_no = X, page_size = 1` lookup.
async fn lookup_guid(client: &PlatformClient, serial: &str) -> Result<String, StepError> {
    let envelope = accept(
        client
            .find_net_equipment(&FindNetEquipmentParams::by_serial_no(serial))
            .await?,
    )?;

    let Some(record) = envelope.data.and_then(|page| page.data.into_iter().next()) else {
        return Err(StepError::Reconciliation(format!(
            "no equipment with serial number '{serial}'"
        )));
    };

    let equipment = NetEquipment::from(record);
    equipment
        .usable_guid()
        .map(str::to_owned)
        .ok_or_else(|| StepError::DataShape(format!("equipment '{serial}' has no guid")))
}

fn warn_on_duplicates(serials: &[String]) {
    let mut seen = HashSet::new();
    let duplicates: BTreeSet<&str> = serials
        .iter()
        .map(String::as_str)
        .filter(|s| !seen.insert(*s))
        .collect();

    if !duplicates.is_empty() {
        warn!(
            ?duplicates,
            "serial numbers repeated in batch; each occurrence is submitted separately"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_splits_resolved_and_unresolved_in_order() {
        let report = ResolutionReport {
            devices: vec![
                DeviceResolution::resolved("a", "g-a"),
                DeviceResolution::unresolved("b", UnresolvedReason::NotFound),
                DeviceResolution::resolved("c", "g-c"),
                DeviceResolution::unresolved("d", UnresolvedReason::GuidMissing),
            ],
        };

        let resolved: Vec<_> = report.resolved().into_iter().map(|d| d.serial_no).collect();
        assert_eq!(resolved, ["a", "c"]);
        assert_eq!(
            report.unresolved(),
            [
                ("b", UnresolvedReason::NotFound),
                ("d", UnresolvedReason::GuidMissing)
            ]
        );
        assert!(!report.was_cancelled());
    }
}
