// ── Domain model ──

pub mod equipment;
pub mod outcome;
pub mod valve;

pub use equipment::{MeterStatus, NetEquipment, ResolvedDevice};
pub use outcome::{
    DeviceResolution, OutcomeDetail, OutcomeKind, UnresolvedReason, WorkflowOutcome,
};
pub use valve::{Flag, HouseholdValve};
