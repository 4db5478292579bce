//! Usage-ledger domain module.
//!
//! Immutable per-equipment, per-item usage entries and the fold that derives
//! cumulative consumption from them. The ledger itself (append-only storage)
//! lives in the infra crate.

pub mod entry;

pub use entry::{RecordUsageRequest, UsageLogEntry, cumulative_usage};
