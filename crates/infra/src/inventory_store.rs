use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use opticare_core::{DomainError, DomainResult, InventoryItemId};
use opticare_inventory::{Adjustment, InventoryItem};

/// Read/adjust boundary for inventory state, the seam orchestration code
/// depends on. Implementations surface transport failures as
/// `StorageUnavailable`.
pub trait InventoryAccess: Send + Sync {
    fn get(&self, item_id: InventoryItemId) -> DomainResult<Option<InventoryItem>>;
    fn adjust(
        &self,
        item_id: InventoryItemId,
        delta: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Adjustment>;
}

impl<S> InventoryAccess for Arc<S>
where
    S: InventoryAccess + ?Sized,
{
    fn get(&self, item_id: InventoryItemId) -> DomainResult<Option<InventoryItem>> {
        (**self).get(item_id)
    }

    fn adjust(
        &self,
        item_id: InventoryItemId,
        delta: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Adjustment> {
        (**self).adjust(item_id, delta, now)
    }
}

/// Owner of inventory item state.
///
/// `quantity`/`status` on an item change only through [`InventoryStore::adjust`].
/// The read-modify-write runs under a single write lock, so two simultaneous
/// deductions against the same item serialize instead of both reading the
/// same quantity and independently deciding it is sufficient.
#[derive(Debug, Default)]
pub struct InventoryStore {
    items: RwLock<HashMap<InventoryItemId, InventoryItem>>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, item: InventoryItem) -> DomainResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        if items.contains_key(&item.id()) {
            return Err(DomainError::validation("inventory item already exists"));
        }
        items.insert(item.id(), item);
        Ok(())
    }

    /// Plain read, no side effects.
    pub fn get(&self, item_id: InventoryItemId) -> DomainResult<Option<InventoryItem>> {
        let items = self
            .items
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(items.get(&item_id).cloned())
    }

    pub fn list(&self) -> DomainResult<Vec<InventoryItem>> {
        let items = self
            .items
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(items.values().cloned().collect())
    }

    /// Retire an item. Ledger entries and consumption records referencing it
    /// stay as history.
    pub fn remove(&self, item_id: InventoryItemId) -> DomainResult<Option<InventoryItem>> {
        let mut items = self
            .items
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(items.remove(&item_id))
    }

    /// Atomically apply a signed stock delta.
    ///
    /// Fails with `NotFound` if the item is absent and `InsufficientStock` if
    /// the result would be negative; in both cases nothing is mutated.
    pub fn adjust(
        &self,
        item_id: InventoryItemId,
        delta: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Adjustment> {
        let mut items = self
            .items
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        let item = items
            .get_mut(&item_id)
            .ok_or(DomainError::not_found("inventory item"))?;

        let adjustment = item.apply_adjustment(delta, now)?;
        tracing::debug!(
            item_id = %item_id,
            delta,
            new_quantity = adjustment.new_quantity,
            new_status = ?adjustment.new_status,
            "stock adjusted"
        );
        Ok(adjustment)
    }
}

impl InventoryAccess for InventoryStore {
    fn get(&self, item_id: InventoryItemId) -> DomainResult<Option<InventoryItem>> {
        InventoryStore::get(self, item_id)
    }

    fn adjust(
        &self,
        item_id: InventoryItemId,
        delta: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Adjustment> {
        InventoryStore::adjust(self, item_id, delta, now)
    }
}
