use std::sync::RwLock;

use opticare_core::{DomainError, DomainResult, InventoryItemId, MachineId, UsageEntryId};
use opticare_usage::UsageLogEntry;

/// Append-only log of per-equipment, per-item usage events.
///
/// Source of truth for cumulative consumption. Entries are immutable; the
/// only non-append mutation is [`UsageLedger::remove`], which exists because
/// an edit is modeled as delete + recreate.
#[derive(Debug, Default)]
pub struct UsageLedger {
    entries: RwLock<Vec<UsageLogEntry>>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: UsageLogEntry) -> DomainResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        entries.push(entry);
        Ok(())
    }

    pub fn get(&self, entry_id: UsageEntryId) -> DomainResult<Option<UsageLogEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(entries.iter().find(|e| e.id == entry_id).cloned())
    }

    pub fn list(&self) -> DomainResult<Vec<UsageLogEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(entries.clone())
    }

    /// All entries for one (equipment, item) pair, in insertion order.
    pub fn entries_for(
        &self,
        equipment_id: MachineId,
        inventory_item_id: InventoryItemId,
    ) -> DomainResult<Vec<UsageLogEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(entries
            .iter()
            .filter(|e| e.equipment_id == equipment_id && e.inventory_item_id == inventory_item_id)
            .cloned()
            .collect())
    }

    pub fn remove(&self, entry_id: UsageEntryId) -> DomainResult<Option<UsageLogEntry>> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        let idx = entries.iter().position(|e| e.id == entry_id);
        Ok(idx.map(|i| entries.remove(i)))
    }
}
