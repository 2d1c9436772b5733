// ── Wire-to-domain conversions ──
//
// Bridges `heatly_api` wire records and `heatly_core::model` domain types.
// Every field is mapped by name in both directions: the valve update endpoint
// replaces the whole record, so a field skipped here is a field erased on
// the platform. Column values pass through as read. Wire-to-domain is
// fallible because capability flags only admit two sentinel strings.

use heatly_api::{HouseholdValveWire, MeterCurrentData, NetEquipmentWire, Scalar};
use serde_json::Value;
use thiserror::Error;

use crate::model::{Flag, HouseholdValve, MeterStatus, NetEquipment};

// ── Capability codec ───────────────────────────────────────────────

const SUPPORTED: &str = "支持";
const UNSUPPORTED: &str = "不支持";

/// A wire value the field mapper refuses to guess at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldMapError {
    #[error("{field} must be \"支持\" or \"不支持\", got {value:?}")]
    InvalidCapability { field: &'static str, value: String },
}

/// Two-way codec for the platform's string-encoded capability flags.
pub struct Capability;

impl Capability {
    /// `"支持"` is set, `"不支持"` is cleared, absent and null are kept as
    /// such. Anything else is an error naming the field.
    pub fn decode(field: &'static str, raw: Option<&Scalar>) -> Result<Flag, FieldMapError> {
        let Some(raw) = raw else {
            return Ok(Flag::Absent);
        };
        if raw.is_null() {
            return Ok(Flag::Null);
        }
        match raw.as_str() {
            Some(SUPPORTED) => Ok(Flag::Set(true)),
            Some(UNSUPPORTED) => Ok(Flag::Set(false)),
            _ => Err(FieldMapError::InvalidCapability {
                field,
                value: raw.to_string(),
            }),
        }
    }

    pub fn encode(flag: bool) -> &'static str {
        if flag { SUPPORTED } else { UNSUPPORTED }
    }

    fn encode_flag(flag: Flag) -> Option<Scalar> {
        match flag {
            Flag::Absent => None,
            Flag::Null => Some(Scalar::from(Value::Null)),
            Flag::Set(value) => Some(Scalar::from(Self::encode(value))),
        }
    }
}

// ── Household valve ────────────────────────────────────────────────

impl TryFrom<HouseholdValveWire> for HouseholdValve {
    type Error = FieldMapError;

    fn try_from(w: HouseholdValveWire) -> Result<Self, Self::Error> {
        Ok(Self {
            read_card: Capability::decode("isReadCard", w.is_read_card.as_ref())?,
            temperature_control: Capability::decode("isTemControl", w.is_tem_control.as_ref())?,
            temperature_setting: Capability::decode("isSettingTem", w.is_setting_tem.as_ref())?,
            temperature_range: Capability::decode("isTemRange", w.is_tem_range.as_ref())?,
            temperature_lock: Capability::decode("isLockTem", w.is_lock_tem.as_ref())?,
            serial_no: w.serial_no,
            address: w.address,
            station_branch_id: w.station_branch_id,
            station_branch_name: w.station_branch_name,
            unit_id: w.unit_id,
            unit_name: w.unit_name,
            detail_position: w.detail_position,
            intermediate_path: w.intermediate_path,
            install_site: w.install_site,
            valve_type: w.valve_type,
            factory_id: w.factory_id,
            factory_name: w.factory_name,
            model_id: w.model_id,
            model_name: w.model_name,
            caliber: w.caliber,
            equipment_use: w.equipment_use,
            identification_code: w.identification_code,
            net_equ_id: w.net_equ_id,
            net_equ_name: w.net_equ_name,
            collector_id: w.collector_id,
            communication_type: w.communication_type,
            port: w.port,
            baud_rate: w.baud_rate,
            check_bit: w.check_bit,
            index: w.index,
            panel_id: w.panel_id,
            panel_serial_no: w.panel_serial_no,
            room_panel_id: w.room_panel_id,
            enabled: w.enabled,
            unique_id: w.unique_id,
            install_date: w.install_date,
            create_date: w.create_date,
            memo: w.memo,
            extra: w.extra,
        })
    }
}

impl From<HouseholdValve> for HouseholdValveWire {
    fn from(v: HouseholdValve) -> Self {
        Self {
            is_read_card: Capability::encode_flag(v.read_card),
            is_tem_control: Capability::encode_flag(v.temperature_control),
            is_setting_tem: Capability::encode_flag(v.temperature_setting),
            is_tem_range: Capability::encode_flag(v.temperature_range),
            is_lock_tem: Capability::encode_flag(v.temperature_lock),
            serial_no: v.serial_no,
            address: v.address,
            station_branch_id: v.station_branch_id,
            station_branch_name: v.station_branch_name,
            unit_id: v.unit_id,
            unit_name: v.unit_name,
            detail_position: v.detail_position,
            intermediate_path: v.intermediate_path,
            install_site: v.install_site,
            valve_type: v.valve_type,
            factory_id: v.factory_id,
            factory_name: v.factory_name,
            model_id: v.model_id,
            model_name: v.model_name,
            caliber: v.caliber,
            equipment_use: v.equipment_use,
            identification_code: v.identification_code,
            net_equ_id: v.net_equ_id,
            net_equ_name: v.net_equ_name,
            collector_id: v.collector_id,
            communication_type: v.communication_type,
            port: v.port,
            baud_rate: v.baud_rate,
            check_bit: v.check_bit,
            index: v.index,
            panel_id: v.panel_id,
            panel_serial_no: v.panel_serial_no,
            room_panel_id: v.room_panel_id,
            enabled: v.enabled,
            unique_id: v.unique_id,
            install_date: v.install_date,
            create_date: v.create_date,
            memo: v.memo,
            extra: v.extra,
        }
    }
}

// ── Network equipment ──────────────────────────────────────────────

impl From<NetEquipmentWire> for NetEquipment {
    fn from(w: NetEquipmentWire) -> Self {
        Self {
            guid: w.guid,
            serial_no: w.serial_no,
            name: w.net_equ_name,
            equipment_type_id: w.equipment_type_id,
            equipment_type_name: w.equipment_type_name,
            factory_id: w.factory_id,
            factory_name: w.factory_name,
            model_id: w.model_id,
            model_name: w.model_name,
            meter_no: w.meter_no,
            install_type: w.install_type,
            install_site: w.install_site,
            address: w.address,
            communication_type: w.communication_type,
            enabled: w.enabled,
            create_date: w.create_date,
            memo: w.memo,
            extra: w.extra,
        }
    }
}

impl From<NetEquipment> for NetEquipmentWire {
    fn from(e: NetEquipment) -> Self {
        Self {
            guid: e.guid,
            serial_no: e.serial_no,
            net_equ_name: e.name,
            equipment_type_id: e.equipment_type_id,
            equipment_type_name: e.equipment_type_name,
            factory_id: e.factory_id,
            factory_name: e.factory_name,
            model_id: e.model_id,
            model_name: e.model_name,
            meter_no: e.meter_no,
            install_type: e.install_type,
            install_site: e.install_site,
            address: e.address,
            communication_type: e.communication_type,
            enabled: e.enabled,
            create_date: e.create_date,
            memo: e.memo,
            extra: e.extra,
        }
    }
}

// ── Meter status ───────────────────────────────────────────────────

impl From<MeterCurrentData> for MeterStatus {
    fn from(m: MeterCurrentData) -> Self {
        Self {
            serial_no: m.serial_no,
            address: m.address,
            comm_status: m.comm_status,
            read_time: m.read_time,
            readings: m.extra,
        }
    }
}
