//! `opticare-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{
    ConsumptionId, InventoryItemId, MachineId, MachinePartId, MaintenanceId, NotificationId,
    UsageEntryId,
};
