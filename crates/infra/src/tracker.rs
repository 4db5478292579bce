use std::sync::Arc;

use chrono::{DateTime, Utc};

use opticare_alerts::{AlertContext, AlertEngine, AlertSubject, NotificationSink};
use opticare_core::{DomainError, DomainResult, InventoryItemId, MachineId, MachinePartId};
use opticare_parts::{MachinePart, UsageUpdate};

use crate::store::KeyedStore;

/// Registry of installed wear parts, one record per machine/part instance.
///
/// Owns `current_usage`/`status` on [`MachinePart`]; recomputes status on
/// every usage update and feeds the alert engine on transitions.
pub struct WearPartTracker<S>
where
    S: KeyedStore<MachinePartId, MachinePart>,
{
    parts: S,
    sink: Arc<dyn NotificationSink>,
}

impl<S> WearPartTracker<S>
where
    S: KeyedStore<MachinePartId, MachinePart>,
{
    pub fn new(parts: S, sink: Arc<dyn NotificationSink>) -> Self {
        Self { parts, sink }
    }

    pub fn install(&self, part: MachinePart) -> DomainResult<()> {
        self.parts.upsert(part.id(), part)
    }

    pub fn get(&self, part_id: MachinePartId) -> DomainResult<MachinePart> {
        self.parts
            .get(&part_id)?
            .ok_or(DomainError::not_found("machine part"))
    }

    pub fn list_for_machine(&self, machine_id: MachineId) -> DomainResult<Vec<MachinePart>> {
        Ok(self
            .parts
            .list()?
            .into_iter()
            .filter(|p| p.machine_id() == machine_id)
            .collect())
    }

    /// Record additional usage against an installed part.
    ///
    /// Persists the updated part and, when the status transitioned into
    /// `Warning`/`Critical`, hands exactly one notification to the sink.
    pub fn record_usage(
        &self,
        part_id: MachinePartId,
        additional: f64,
        now: DateTime<Utc>,
    ) -> DomainResult<UsageUpdate> {
        let mut part = self.get(part_id)?;
        let previous_status = part.status();
        let update = part.record_usage(additional)?;
        self.parts.upsert(part_id, part.clone())?;

        if update.status_changed {
            tracing::info!(
                part_id = %part_id,
                previous = ?previous_status,
                new = ?update.new_status,
                usage_percentage = update.usage_percentage,
                "wear part status changed"
            );
            let ctx = AlertContext {
                subject: AlertSubject::Part { part_id },
                part_name: part.name(),
                previous_status,
                new_status: update.new_status,
                usage_percentage: update.usage_percentage,
                current_usage: part.current_usage(),
                max_usage: part.max_usage(),
                usage_unit: part.usage_unit(),
            };
            if let Some(notification) = AlertEngine::evaluate(&ctx, now) {
                self.sink.deliver(notification);
            }
        }

        Ok(update)
    }

    /// Replace an installed part with a fresh instance.
    ///
    /// Tombstone-and-recreate: the successor (zero usage, `Normal`) is
    /// persisted first, then the old record is removed, so the old instance's
    /// final usage stays attributable to it. Fails with `NotFound` if
    /// `part_id` does not exist.
    pub fn replace_part(
        &self,
        part_id: MachinePartId,
        new_inventory_item_id: InventoryItemId,
        now: DateTime<Utc>,
    ) -> DomainResult<MachinePart> {
        let old = self.get(part_id)?;
        let successor = old.replacement(new_inventory_item_id, now);
        self.parts.upsert(successor.id(), successor.clone())?;
        if let Err(cause) = self.parts.remove(&part_id) {
            // Compensate: take the successor back out so the slot never shows
            // two live parts.
            let cause = match self.parts.remove(&successor.id()) {
                Ok(_) => cause,
                Err(remove_err) => DomainError::inconsistent(format!(
                    "successor rollback failed after '{cause}': {remove_err}"
                )),
            };
            tracing::warn!(part_id = %part_id, %cause, "part replacement rolled back");
            return Err(cause);
        }
        tracing::info!(
            old_part_id = %part_id,
            new_part_id = %successor.id(),
            final_usage = old.current_usage(),
            "wear part replaced"
        );
        Ok(successor)
    }
}
