//! Inventory domain module.
//!
//! This crate contains business rules for inventory items, implemented purely
//! as deterministic domain logic (no IO, no storage). Stock is only ever
//! mutated through `InventoryItem::apply_adjustment`; the derived status is
//! never set by callers.

pub mod item;

pub use item::{Adjustment, InventoryItem, ItemKind, StockStatus, WearSpec};
