// ── Network equipment (collector) domain types ──

use heatly_api::Scalar;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A collector as listed by the platform.
///
/// `guid` is platform-assigned; it is only ever read, never made up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetEquipment {
    pub guid: Option<String>,
    pub serial_no: String,
    pub name: Option<Scalar>,
    pub equipment_type_id: Option<Scalar>,
    pub equipment_type_name: Option<Scalar>,
    pub factory_id: Option<Scalar>,
    pub factory_name: Option<Scalar>,
    pub model_id: Option<Scalar>,
    pub model_name: Option<Scalar>,
    pub meter_no: Option<Scalar>,
    pub install_type: Option<Scalar>,
    pub install_site: Option<Scalar>,
    pub address: Option<Scalar>,
    pub communication_type: Option<Scalar>,
    pub enabled: Option<Scalar>,
    pub create_date: Option<Scalar>,
    pub memo: Option<Scalar>,
    pub extra: Map<String, Value>,
}

impl NetEquipment {
    /// The guid, if present and non-blank.
    pub fn usable_guid(&self) -> Option<&str> {
        self.guid.as_deref().filter(|g| !g.trim().is_empty())
    }
}

/// A serial number paired with the guid the platform gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDevice {
    pub serial_no: String,
    pub guid: String,
}

impl From<ResolvedDevice> for heatly_api::ProvisioningItem {
    fn from(device: ResolvedDevice) -> Self {
        Self {
            serial_no: device.serial_no,
            guid: device.guid,
        }
    }
}

/// Current status row for one meter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterStatus {
    pub serial_no: String,
    pub address: Option<String>,
    pub comm_status: Option<String>,
    pub read_time: Option<String>,
    /// Model-specific reading columns.
    pub readings: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_guid_is_not_usable() {
        let equipment = NetEquipment {
            guid: Some("  ".into()),
            ..NetEquipment::default()
        };
        assert_eq!(equipment.usable_guid(), None);
    }
}
