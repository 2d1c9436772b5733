// Platform response types
//
// Every endpoint wraps its payload in `{resultCode, message, data}`; paged
// reads nest a `{total, data: [...]}` page inside. Device records are
// enumerated field by field because the update endpoint is a full replace:
// anything a read drops is gone after the next write. Keys the platform adds
// later land in `extra` and ride along unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard platform response envelope.
///
/// ```json
/// { "resultCode": 0, "message": "optional", "data": { ... } }
/// ```
///
/// `resultCode == 0` is business success. Anything else is a business
/// failure whose `message` should reach the operator verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub result_code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.result_code == 0
    }

    /// The platform's message, or a synthesized `resultCode=N` marker.
    pub fn message_or_code(&self) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("resultCode={}", self.result_code))
    }
}

impl<T: Serialize> Envelope<T> {
    /// Re-encode the payload as untyped JSON, for audit trails.
    pub fn to_raw(&self) -> Envelope<Value> {
        Envelope {
            result_code: self.result_code,
            message: self.message.clone(),
            data: self
                .data
                .as_ref()
                .map(|d| serde_json::to_value(d).unwrap_or_default()),
        }
    }
}

/// One page of a paged read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            total: 0,
            data: Vec::new(),
        }
    }
}

impl<T> Envelope<Page<T>> {
    /// Records on this page; empty when `data` is absent.
    pub fn records(&self) -> &[T] {
        self.data.as_ref().map_or(&[], |p| p.data.as_slice())
    }
}

// ── Household valve ──────────────────────────────────────────────────

/// Household valve record as returned by `findHouseholdValve` and accepted
/// by `updateHouseholdValve`.
///
/// Every column except `serialNo` is a [`Scalar`]: a key the read did not
/// carry stays absent on write, and a key it did carry goes back with the
/// same JSON value. Capability flags (`isReadCard` etc.) arrive as the
/// sentinel strings `"支持"` / `"不支持"` and are decoded in core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdValveWire {
    #[serde(default, deserialize_with = "column::text")]
    pub serial_no: String,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub station_branch_name: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub station_branch_id: Option<Scalar>,
    #[serde(
        default,
        rename = "type",
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub valve_type: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_name: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub factory_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub factory_name: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub model_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub model_name: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub net_equ_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub net_equ_name: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub collector_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub port: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub baud_rate: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_bit: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub index: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub caliber: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_read_card: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_tem_control: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_setting_tem: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_tem_range: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_lock_tem: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub detail_position: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub intermediate_path: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub install_date: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_date: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub memo: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub unique_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub panel_serial_no: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub communication_type: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub panel_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub room_panel_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub identification_code: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub equipment_use: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub install_site: Option<Scalar>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HouseholdValveWire {
    /// Whether this record is installed at exactly `address`.
    pub fn is_at(&self, address: &str) -> bool {
        self.address.as_ref().and_then(Scalar::as_str) == Some(address)
    }
}

// ── Network equipment (collectors) ───────────────────────────────────

/// Network equipment record from `findNetEqu`.
///
/// Only `guid` and `serialNo` are read as text; the remaining columns are
/// kept as sent so an odd value in one of them never hides the guid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetEquipmentWire {
    #[serde(default, deserialize_with = "column::opt_text")]
    pub guid: Option<String>,
    #[serde(default, deserialize_with = "column::text")]
    pub serial_no: String,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub net_equ_name: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub equipment_type_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub equipment_type_name: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub factory_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub factory_name: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub model_id: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub model_name: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub meter_no: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub install_type: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub install_site: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub communication_type: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_date: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "column::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub memo: Option<Scalar>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One item of an `updateControl` provisioning batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningItem {
    pub serial_no: String,
    pub guid: String,
}

// ── Meter current data ───────────────────────────────────────────────

/// Status row from `findHouseholdMeterCurrentDataAdvanced`.
///
/// The row carries dozens of reading columns that vary by meter model; only
/// the identifying fields are modeled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterCurrentData {
    #[serde(default)]
    pub serial_no: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "column::opt_text")]
    pub comm_status: Option<String>,
    #[serde(default)]
    pub read_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Column values ────────────────────────────────────────────────────

/// One column value exactly as the platform sent it.
///
/// The platform is inconsistent about quoting: the same column comes back as
/// `12`, `"12"`, `"012"` or `""` depending on the endpoint. A full-replace
/// write has to send back what was read, so the JSON value is kept as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scalar(Value);

impl Scalar {
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// The value, when it was sent as a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Boolean view; accepts `0`/`1` and `"true"`/`"false"`.
    pub fn as_bool(&self) -> Option<bool> {
        match &self.0 {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Strings print verbatim, null prints empty, anything else as JSON.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Null => Ok(()),
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<Value> for Scalar {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self(Value::from(value))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self(Value::from(value))
    }
}

mod column {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::Scalar;

    /// Only runs when the key is present, so `Some(null)` and absent stay
    /// apart.
    pub fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Scalar>, D::Error> {
        Scalar::deserialize(d).map(Some)
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(D::Error::custom(format!(
                "expected string or number, got {other}"
            ))),
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        opt_text(d).map(Option::unwrap_or_default)
    }
}
