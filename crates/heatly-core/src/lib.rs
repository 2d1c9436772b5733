//! Provisioning and rename workflows for the heat-metering platform.
//!
//! Sits between `heatly-api` and the CLI:
//!
//! - **[`Platform`]** -- session facade owning the one HTTP client.
//!   [`Platform::scoped()`] connects, runs a closure, and releases the client
//!   on every exit path.
//!
//! - **Workflows** ([`workflow`]) -- `resolve_and_provision` maps serial
//!   numbers to collector guids with bounded concurrency and submits the
//!   resolved subset in one batch; `rename_device` changes a valve's serial
//!   number by read-modify-write and verifies it. Both return a
//!   [`WorkflowOutcome`] instead of an error.
//!
//! - **Field mapper** ([`convert`]) -- lossless wire/domain conversion,
//!   including the `"支持"` / `"不支持"` capability flag codec.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod platform;
pub mod workflow;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{PlatformConfig, TlsVerification};
pub use convert::{Capability, FieldMapError};
pub use error::CoreError;
pub use platform::Platform;
pub use workflow::{RenameRequest, ResolutionReport, StepError};

pub use model::{
    DeviceResolution, Flag, HouseholdValve, MeterStatus, NetEquipment, OutcomeDetail,
    OutcomeKind, ResolvedDevice, UnresolvedReason, WorkflowOutcome,
};

// The CLI builds queries directly and prints raw columns.
pub use heatly_api::{FindHouseholdValveParams, FindNetEquipmentParams, Scalar};
