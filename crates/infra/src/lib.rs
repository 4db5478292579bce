//! `opticare-infra` — stateful collaborators around the pure domain crates.
//!
//! Stores are injected per scope (never package-level singletons), so tests
//! run in isolation with fresh state. All operations are synchronous
//! request/response; operations touching both inventory and a record are
//! treated as one logical transaction with explicit compensation on partial
//! failure.

pub mod coordinator;
pub mod inventory_store;
pub mod ledger;
pub mod notifications;
pub mod store;
pub mod tracker;

pub use coordinator::ConsumptionCoordinator;
pub use inventory_store::{InventoryAccess, InventoryStore};
pub use ledger::UsageLedger;
pub use notifications::InMemoryNotificationSink;
pub use store::{InMemoryStore, KeyedStore};
pub use tracker::WearPartTracker;
