// ── Field-preserving rename ──
//
// Query -> Match -> Prepare -> Update -> Verify. The update endpoint replaces
// the whole record, so Prepare copies every field of the matched record
// through the field mapper and changes only `serial_no`. Each step runs once;
// nothing is retried and nothing is rolled back.

use heatly_api::{Envelope, FindHouseholdValveParams, HouseholdValveWire, PlatformClient, Scalar};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{StepError, accept};
use crate::model::{HouseholdValve, OutcomeDetail, OutcomeKind, WorkflowOutcome};

/// The same serial number can be installed at several addresses; one page
/// must hold every collision.
const QUERY_PAGE_SIZE: u32 = 20;

/// Which device to rename, and to what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRequest {
    /// Serial number the device has now.
    pub current_serial: String,
    /// Installation address that pins down which device carries it.
    pub address: String,
    pub new_serial: String,
}

/// Rename one household valve and confirm the change by re-querying.
pub async fn rename_device(client: &PlatformClient, request: &RenameRequest) -> WorkflowOutcome {
    let RenameRequest {
        current_serial,
        address,
        new_serial,
    } = request;
    info!(%current_serial, %new_serial, %address, "renaming household valve");

    let candidates = match query(client, current_serial).await {
        Ok(candidates) => candidates,
        Err(e) => return failed(OutcomeKind::QueryFailed, format!("query failed: {e}"), None),
    };

    let matched = match match_address(candidates, current_serial, address) {
        Ok(matched) => matched,
        Err(e) => return failed(OutcomeKind::AddressNotFound, e.to_string(), None),
    };

    let payload = match prepare(matched, new_serial) {
        Ok(payload) => payload,
        Err(e) => {
            return failed(
                OutcomeKind::DataIntegrity,
                format!("record at '{address}' has malformed field: {e}"),
                None,
            );
        }
    };

    let update_result = match update(client, &payload).await {
        Ok(response) => response,
        Err(e) => {
            let message = format!("update failed: {e}");
            return failed(OutcomeKind::UpdateFailed, message, e.into_response());
        }
    };

    match verify(client, new_serial, address).await {
        Ok(verify_result) => {
            info!(%current_serial, %new_serial, "rename verified");
            WorkflowOutcome::new(
                OutcomeKind::Succeeded,
                format!("renamed '{current_serial}' to '{new_serial}' at {address}"),
                Some(update_result),
                OutcomeDetail::Verify(Some(verify_result)),
            )
        }
        Err(e) => {
            warn!(%new_serial, error = %e, "update accepted but not confirmed");
            let message = format!("verification failed: {e}");
            WorkflowOutcome::new(
                OutcomeKind::VerificationFailed,
                message,
                Some(update_result),
                OutcomeDetail::Verify(e.into_response()),
            )
        }
    }
}

fn failed(
    kind: OutcomeKind,
    message: String,
    update_result: Option<Envelope<Value>>,
) -> WorkflowOutcome {
    warn!(%kind, %message, "rename stopped");
    WorkflowOutcome::new(kind, message, update_result, OutcomeDetail::Verify(None))
}

// ── Steps ──────────────────────────────────────────────────────────

/// Every record carrying `serial`, across the whole location tree.
async fn query(client: &PlatformClient, serial: &str) -> Result<Vec<HouseholdValveWire>, StepError> {
    let params = FindHouseholdValveParams::by_serial_no_unscoped(serial, QUERY_PAGE_SIZE);
    let envelope = accept(client.find_household_valves(&params).await?)?;
    let records = envelope.data.map(|page| page.data).unwrap_or_default();
    debug!(serial_no = serial, count = records.len(), "rename candidates");
    Ok(records)
}

/// Pick the candidate installed at `address`.
fn match_address(
    candidates: Vec<HouseholdValveWire>,
    serial: &str,
    address: &str,
) -> Result<HouseholdValveWire, StepError> {
    let total = candidates.len();
    candidates
        .into_iter()
        .find(|c| c.is_at(address))
        .ok_or_else(|| {
            StepError::Reconciliation(format!(
                "no device with address '{address}' among {total} results for serial '{serial}'"
            ))
        })
}

/// Full update payload: the matched record with only `serial_no` replaced.
///
/// The lookup exposes the unit only by name, while the update expects it in
/// `unitId`; the name is carried over when the id is absent or null.
fn prepare(matched: HouseholdValveWire, new_serial: &str) -> Result<HouseholdValveWire, StepError> {
    let mut valve =
        HouseholdValve::try_from(matched).map_err(|e| StepError::DataShape(e.to_string()))?;

    new_serial.clone_into(&mut valve.serial_no);
    if valve.unit_id.as_ref().is_none_or(Scalar::is_null) {
        valve.unit_id.clone_from(&valve.unit_name);
    }

    Ok(valve.into())
}

async fn update(
    client: &PlatformClient,
    payload: &HouseholdValveWire,
) -> Result<Envelope<Value>, StepError> {
    accept(client.update_household_valve(payload).await?)
}

/// Re-query by the new serial number and require a record at `address`
/// that carries it. The raw response rides along either way.
async fn verify(
    client: &PlatformClient,
    new_serial: &str,
    address: &str,
) -> Result<Envelope<Value>, StepError> {
    let ambiguous = |message: String, response: Option<Envelope<Value>>| {
        StepError::VerificationAmbiguous { message, response }
    };

    let envelope = client
        .find_household_valves(&FindHouseholdValveParams::by_serial_no(new_serial))
        .await
        .map_err(|e| ambiguous(format!("re-query failed: {e}"), None))?;
    let raw = envelope.to_raw();

    if !envelope.is_success() {
        return Err(ambiguous(
            format!("re-query rejected: {}", envelope.message_or_code()),
            Some(raw),
        ));
    }

    let confirmed = envelope
        .records()
        .iter()
        .any(|r| r.is_at(address) && r.serial_no == new_serial);

    if confirmed {
        Ok(raw)
    } else {
        Err(ambiguous(
            format!("no record with serial '{new_serial}' at '{address}'"),
            Some(raw),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn wire(serial: &str, address: &str) -> HouseholdValveWire {
        HouseholdValveWire {
            serial_no: serial.into(),
            address: Some(address.into()),
            ..HouseholdValveWire::default()
        }
    }

    #[test]
    fn match_picks_the_record_at_the_address() {
        let picked = match_address(
            vec![wire("25249851", "X"), wire("25249851", "Y")],
            "25249851",
            "Y",
        )
        .unwrap();
        assert!(picked.is_at("Y"));
    }

    #[test]
    fn match_failure_names_the_candidate_count() {
        let err = match_address(vec![wire("1", "X")], "1", "Z").unwrap_err();
        assert_eq!(
            err.to_string(),
            "no device with address 'Z' among 1 results for serial '1'"
        );
    }

    #[test]
    fn prepare_changes_only_the_serial() {
        let mut original = wire("25249851", "X");
        original.unit_id = Some("u-4".into());
        original.memo = Some("二次网".into());
        original.is_read_card = Some("支持".into());

        let payload = prepare(original.clone(), "25249852").unwrap();

        let mut expected = original;
        expected.serial_no = "25249852".into();
        assert_eq!(payload, expected);
    }

    #[test]
    fn prepare_carries_unit_name_into_missing_unit_id() {
        let mut original = wire("1", "X");
        original.unit_name = Some("二单元".into());

        let payload = prepare(original, "2").unwrap();
        assert_eq!(payload.unit_id, Some("二单元".into()));
        assert_eq!(payload.unit_name, Some("二单元".into()));
    }

    #[test]
    fn prepare_writes_columns_back_as_read() {
        let original: HouseholdValveWire = serde_json::from_value(serde_json::json!({
            "serialNo": "1",
            "address": "X",
            "unitId": "u-1",
            "index": "03",
            "stationBranchId": "17",
            "port": ""
        }))
        .unwrap();

        let payload = serde_json::to_value(prepare(original, "2").unwrap()).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "serialNo": "2",
                "address": "X",
                "unitId": "u-1",
                "index": "03",
                "stationBranchId": "17",
                "port": ""
            })
        );
    }

    #[test]
    fn prepare_rejects_undecodable_flags() {
        let mut original = wire("1", "X");
        original.is_lock_tem = Some("maybe".into());
        assert!(matches!(
            prepare(original, "2"),
            Err(StepError::DataShape(_))
        ));
    }
}
