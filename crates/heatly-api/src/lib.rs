//! Async client for the heat-metering platform's maintenance API.
//!
//! Thin, uniform wrappers over the platform's JSON endpoints:
//!
//! - **[`PlatformClient`]** -- bearer-token authenticated GET/PUT/POST with
//!   `{resultCode, message, data}` envelope parsing. Business result codes
//!   are returned, not raised.
//! - **[`models`]** -- wire types. Device records enumerate every field so a
//!   read-modify-write never loses data.
//! - **[`params`]** -- one query struct per endpoint with the platform's
//!   defaults stated in one place.

pub mod client;
pub mod error;
pub mod models;
pub mod params;
pub mod transport;

mod house_valve;
mod meter;
mod net_equipment;

pub use client::PlatformClient;
pub use error::Error;
pub use models::{
    Envelope, HouseholdValveWire, MeterCurrentData, NetEquipmentWire, Page, ProvisioningItem,
    Scalar,
};
pub use params::{FindHouseholdValveParams, FindMeterCurrentDataParams, FindNetEquipmentParams};
pub use transport::{TlsMode, TransportConfig};
