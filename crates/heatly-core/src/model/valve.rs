// ── Household valve domain types ──

use heatly_api::Scalar;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One household valve as persisted by the platform.
///
/// `address` is the key an operator uses to tell apart two valves that share
/// a serial number; `serial_no` is mutable and is what a rename changes.
/// Columns are kept as the platform sent them; only the capability flags
/// are decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseholdValve {
    pub serial_no: String,
    pub address: Option<Scalar>,

    // Location
    pub station_branch_id: Option<Scalar>,
    pub station_branch_name: Option<Scalar>,
    pub unit_id: Option<Scalar>,
    pub unit_name: Option<Scalar>,
    pub detail_position: Option<Scalar>,
    pub intermediate_path: Option<Scalar>,
    pub install_site: Option<Scalar>,

    // Hardware
    pub valve_type: Option<Scalar>,
    pub factory_id: Option<Scalar>,
    pub factory_name: Option<Scalar>,
    pub model_id: Option<Scalar>,
    pub model_name: Option<Scalar>,
    pub caliber: Option<Scalar>,
    pub equipment_use: Option<Scalar>,
    pub identification_code: Option<Scalar>,

    // Communication
    pub net_equ_id: Option<Scalar>,
    pub net_equ_name: Option<Scalar>,
    pub collector_id: Option<Scalar>,
    pub communication_type: Option<Scalar>,
    pub port: Option<Scalar>,
    pub baud_rate: Option<Scalar>,
    pub check_bit: Option<Scalar>,
    pub index: Option<Scalar>,

    // Room panel
    pub panel_id: Option<Scalar>,
    pub panel_serial_no: Option<Scalar>,
    pub room_panel_id: Option<Scalar>,

    // Capabilities
    pub read_card: Flag,
    pub temperature_control: Flag,
    pub temperature_setting: Flag,
    pub temperature_range: Flag,
    pub temperature_lock: Flag,

    // Bookkeeping
    pub enabled: Option<Scalar>,
    pub unique_id: Option<Scalar>,
    pub install_date: Option<Scalar>,
    pub create_date: Option<Scalar>,
    pub memo: Option<Scalar>,

    /// Platform fields with no typed counterpart, carried through unchanged.
    pub extra: Map<String, Value>,
}

/// A decoded capability flag.
///
/// `Absent` and `Null` both mean "not reported"; they are kept apart so a
/// write sends back exactly what the read carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    #[default]
    Absent,
    Null,
    Set(bool),
}

impl Flag {
    pub fn get(self) -> Option<bool> {
        match self {
            Self::Set(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Self::Set(value)
    }
}
