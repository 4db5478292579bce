use std::sync::Arc;

use chrono::{DateTime, Utc};

use opticare_alerts::{
    AlertContext, AlertEngine, AlertSubject, NotificationSink, StockAlertContext,
};
use opticare_core::{
    ConsumptionId, DomainError, DomainResult, InventoryItemId, MachineId, MaintenanceId,
    UsageEntryId,
};
use opticare_inventory::{Adjustment, InventoryItem, WearSpec};
use opticare_maintenance::{ConsumePartRequest, MaintenanceRecord, PartConsumption};
use opticare_parts::PartStatus;
use opticare_usage::{RecordUsageRequest, UsageLogEntry, cumulative_usage};

use crate::inventory_store::InventoryAccess;
use crate::ledger::UsageLedger;
use crate::store::{InMemoryStore, KeyedStore};

/// Orchestrates the consume/reverse transaction between maintenance or usage
/// events and the inventory store, keeping stock and records consistent.
///
/// Every multi-step operation either completes or compensates: once the
/// inventory adjustment has committed, a failure in a later step triggers an
/// explicit rollback of the adjustment before the error surfaces. A failed
/// rollback escalates as `InconsistentState` — never silently swallowed, and
/// never silently retried.
pub struct ConsumptionCoordinator<I, M, C>
where
    I: InventoryAccess,
    M: KeyedStore<MaintenanceId, MaintenanceRecord>,
    C: KeyedStore<ConsumptionId, PartConsumption>,
{
    inventory: I,
    maintenances: M,
    consumptions: C,
    ledger: Arc<UsageLedger>,
    /// Last observed wear status per (equipment, item) pair — the prior state
    /// threshold crossings are detected against.
    usage_status: InMemoryStore<(MachineId, InventoryItemId), PartStatus>,
    sink: Arc<dyn NotificationSink>,
}

impl<I, M, C> ConsumptionCoordinator<I, M, C>
where
    I: InventoryAccess,
    M: KeyedStore<MaintenanceId, MaintenanceRecord>,
    C: KeyedStore<ConsumptionId, PartConsumption>,
{
    pub fn new(
        inventory: I,
        maintenances: M,
        consumptions: C,
        ledger: Arc<UsageLedger>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            inventory,
            maintenances,
            consumptions,
            ledger,
            usage_status: InMemoryStore::new(),
            sink,
        }
    }

    /// Book a part consumption against a maintenance event.
    ///
    /// Deducts stock, persists the consumption record and adds
    /// `quantity * unit_cost` to the maintenance's accumulated cost as one
    /// logical transaction.
    pub fn consume_part(
        &self,
        request: &ConsumePartRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<PartConsumption> {
        request.validate()?;

        let mut maintenance = self
            .maintenances
            .get(&request.maintenance_id)?
            .ok_or(DomainError::not_found("maintenance"))?;
        let item = self
            .inventory
            .get(request.inventory_item_id)?
            .ok_or(DomainError::not_found("inventory item"))?;
        // Built before any mutation, so a cost overflow aborts cleanly.
        let consumption = PartConsumption::new(
            ConsumptionId::new(),
            request.maintenance_id,
            request.inventory_item_id,
            request.quantity,
            request.unit_cost_cents,
            now,
        )?;

        // Stock deduction commits first; every later failure compensates it.
        let adjustment = self
            .inventory
            .adjust(request.inventory_item_id, -request.quantity, now)?;

        if let Err(cause) = self.consumptions.upsert(consumption.id, consumption.clone()) {
            return Err(self.rollback_stock(request.inventory_item_id, request.quantity, now, cause));
        }

        let persisted = maintenance
            .add_cost(consumption.total_cost_cents)
            .and_then(|()| self.maintenances.upsert(request.maintenance_id, maintenance));
        if let Err(cause) = persisted {
            let cause = match self.consumptions.remove(&consumption.id) {
                Ok(_) => cause,
                Err(remove_err) => DomainError::inconsistent(format!(
                    "consumption record rollback failed after '{cause}': {remove_err}"
                )),
            };
            return Err(self.rollback_stock(request.inventory_item_id, request.quantity, now, cause));
        }

        tracing::info!(
            consumption_id = %consumption.id,
            maintenance_id = %request.maintenance_id,
            item_id = %request.inventory_item_id,
            quantity = request.quantity,
            total_cost_cents = consumption.total_cost_cents,
            "part consumption booked"
        );
        self.emit_stock_alert(&item, adjustment, now);
        Ok(consumption)
    }

    /// Undo a consumption: restore stock, decrement the maintenance cost
    /// (clamped at zero), then delete the record.
    ///
    /// If the stock restore fails the record stays and the error surfaces —
    /// consumption history and inventory never diverge.
    pub fn reverse_consumption(
        &self,
        consumption_id: ConsumptionId,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let consumption = self
            .consumptions
            .get(&consumption_id)?
            .ok_or(DomainError::not_found("consumption"))?;

        self.inventory
            .adjust(consumption.inventory_item_id, consumption.quantity, now)?;

        let mut subtracted = 0;
        if let Some(mut maintenance) = self.maintenances.get(&consumption.maintenance_id)? {
            subtracted = maintenance.subtract_cost_clamped(consumption.total_cost_cents);
            if let Err(cause) = self
                .maintenances
                .upsert(consumption.maintenance_id, maintenance)
            {
                return Err(self.rollback_restore(
                    consumption.inventory_item_id,
                    consumption.quantity,
                    now,
                    cause,
                ));
            }
        }

        if let Err(cause) = self.consumptions.remove(&consumption_id) {
            // Re-add the cost that was actually subtracted, then re-deduct stock.
            let cause = match self.maintenances.get(&consumption.maintenance_id) {
                Ok(Some(mut maintenance)) if subtracted > 0 => {
                    let readded = maintenance.add_cost(subtracted).and_then(|()| {
                        self.maintenances
                            .upsert(consumption.maintenance_id, maintenance)
                    });
                    match readded {
                        Ok(()) => cause,
                        Err(e) => DomainError::inconsistent(format!(
                            "cost rollback failed after '{cause}': {e}"
                        )),
                    }
                }
                Ok(_) => cause,
                Err(e) => {
                    DomainError::inconsistent(format!("cost rollback failed after '{cause}': {e}"))
                }
            };
            return Err(self.rollback_restore(
                consumption.inventory_item_id,
                consumption.quantity,
                now,
                cause,
            ));
        }

        tracing::info!(
            consumption_id = %consumption_id,
            item_id = %consumption.inventory_item_id,
            restored_quantity = consumption.quantity,
            cost_subtracted_cents = subtracted,
            "part consumption reversed"
        );
        Ok(())
    }

    /// Record a usage event for an item on a piece of equipment.
    ///
    /// Positive quantities deduct stock; negative quantities are usage resets
    /// and touch only the ledger. When the item is a tracked wear part, the
    /// cumulative total is recomputed against its rated lifespan and a
    /// threshold crossing raises exactly one notification.
    pub fn record_usage(
        &self,
        request: RecordUsageRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<UsageLogEntry> {
        request.validate()?;

        let item = self
            .inventory
            .get(request.inventory_item_id)?
            .ok_or(DomainError::not_found("inventory item"))?;

        let mut adjustment = None;
        if request.quantity_used > 0.0 {
            let quantity = request.quantity_used as i64;
            adjustment = Some(
                self.inventory
                    .adjust(request.inventory_item_id, -quantity, now)?,
            );
        }

        let entry = request.into_entry(UsageEntryId::new(), now);
        if let Err(cause) = self.ledger.append(entry.clone()) {
            if adjustment.is_some() {
                return Err(self.rollback_stock(
                    entry.inventory_item_id,
                    entry.quantity_used as i64,
                    now,
                    cause,
                ));
            }
            return Err(cause);
        }

        if let Some(spec) = item.wear() {
            self.recompute_usage_status(
                entry.equipment_id,
                entry.inventory_item_id,
                item.name(),
                spec,
                now,
            )?;
        }
        if let Some(adjustment) = adjustment {
            self.emit_stock_alert(&item, adjustment, now);
        }

        Ok(entry)
    }

    /// Delete a usage entry, restoring any stock it deducted.
    ///
    /// An edit is delete + recreate; deleting recomputes the pair's wear
    /// status, so a band that is left re-arms for a future upward crossing.
    pub fn delete_usage_entry(
        &self,
        entry_id: UsageEntryId,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let entry = self
            .ledger
            .get(entry_id)?
            .ok_or(DomainError::not_found("usage entry"))?;

        if entry.quantity_used > 0.0 {
            // Restore first; if this fails, the entry stays and the error surfaces.
            self.inventory
                .adjust(entry.inventory_item_id, entry.quantity_used as i64, now)?;
        }

        if let Err(cause) = self.ledger.remove(entry_id) {
            if entry.quantity_used > 0.0 {
                return Err(self.rollback_restore(
                    entry.inventory_item_id,
                    entry.quantity_used as i64,
                    now,
                    cause,
                ));
            }
            return Err(cause);
        }

        match self.inventory.get(entry.inventory_item_id)? {
            Some(item) => {
                if let Some(spec) = item.wear() {
                    self.recompute_usage_status(
                        entry.equipment_id,
                        entry.inventory_item_id,
                        item.name(),
                        spec,
                        now,
                    )?;
                }
            }
            None => {
                // The item was retired; drop the tracked status so a
                // re-created item at the same id starts from Normal.
                self.usage_status
                    .remove(&(entry.equipment_id, entry.inventory_item_id))?;
            }
        }

        Ok(())
    }

    /// Recompute the wear status of one (equipment, item) pair from the
    /// ledger and feed a transition to the alert engine.
    fn recompute_usage_status(
        &self,
        equipment_id: MachineId,
        inventory_item_id: InventoryItemId,
        item_name: &str,
        spec: &WearSpec,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let entries = self.ledger.entries_for(equipment_id, inventory_item_id)?;
        let cumulative = cumulative_usage(&entries);
        let usage_percentage = cumulative / spec.max_lifespan * 100.0;
        let new_status = PartStatus::for_percentage(usage_percentage);

        let key = (equipment_id, inventory_item_id);
        let previous_status = self.usage_status.get(&key)?.unwrap_or(PartStatus::Normal);
        if new_status == previous_status {
            return Ok(());
        }
        self.usage_status.upsert(key, new_status)?;

        let ctx = AlertContext {
            subject: AlertSubject::EquipmentItem {
                equipment_id,
                inventory_item_id,
            },
            part_name: item_name,
            previous_status,
            new_status,
            usage_percentage,
            current_usage: cumulative,
            max_usage: spec.max_lifespan,
            usage_unit: &spec.usage_unit,
        };
        if let Some(notification) = AlertEngine::evaluate(&ctx, now) {
            tracing::info!(
                equipment_id = %equipment_id,
                item_id = %inventory_item_id,
                new_status = ?new_status,
                usage_percentage,
                "usage threshold crossed"
            );
            self.sink.deliver(notification);
        }
        Ok(())
    }

    fn emit_stock_alert(&self, item: &InventoryItem, adjustment: Adjustment, now: DateTime<Utc>) {
        let ctx = StockAlertContext {
            inventory_item_id: item.id(),
            item_name: item.name(),
            previous_status: adjustment.previous_status,
            new_status: adjustment.new_status,
            quantity: adjustment.new_quantity,
            min_quantity: item.min_quantity(),
        };
        if let Some(notification) = AlertEngine::evaluate_stock(&ctx, now) {
            self.sink.deliver(notification);
        }
    }

    /// Compensate a committed deduction by re-adding the quantity. Returns
    /// the error to surface: the original cause, or `InconsistentState` when
    /// the rollback itself failed.
    fn rollback_stock(
        &self,
        item_id: InventoryItemId,
        quantity: i64,
        now: DateTime<Utc>,
        cause: DomainError,
    ) -> DomainError {
        match self.inventory.adjust(item_id, quantity, now) {
            Ok(_) => {
                tracing::warn!(item_id = %item_id, quantity, %cause, "stock deduction rolled back");
                cause
            }
            Err(rollback_err) => {
                let escalated = DomainError::inconsistent(format!(
                    "stock rollback failed after '{cause}': {rollback_err}"
                ));
                tracing::error!(item_id = %item_id, quantity, %escalated, "stock rollback failed");
                escalated
            }
        }
    }

    /// Compensate a committed restore by re-deducting the quantity.
    fn rollback_restore(
        &self,
        item_id: InventoryItemId,
        quantity: i64,
        now: DateTime<Utc>,
        cause: DomainError,
    ) -> DomainError {
        match self.inventory.adjust(item_id, -quantity, now) {
            Ok(_) => {
                tracing::warn!(item_id = %item_id, quantity, %cause, "stock restore rolled back");
                cause
            }
            Err(rollback_err) => {
                let escalated = DomainError::inconsistent(format!(
                    "stock rollback failed after '{cause}': {rollback_err}"
                ));
                tracing::error!(item_id = %item_id, quantity, %escalated, "stock rollback failed");
                escalated
            }
        }
    }
}
