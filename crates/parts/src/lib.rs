//! Wear-part domain module.
//!
//! Installed-part records and the usage/status transition rules, implemented
//! purely as deterministic domain logic (no IO, no storage).

pub mod part;

pub use part::{MachinePart, PartStatus, UsageUpdate};
