use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opticare_core::{ConsumptionId, DomainError, DomainResult, InventoryItemId, MaintenanceId};

/// A recorded deduction of inventory stock attributed to a maintenance event.
///
/// Created atomically with the inventory deduction by the coordinator;
/// immutable once persisted. Deleting it restores the deducted quantity and
/// the maintenance cost in the same transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartConsumption {
    pub id: ConsumptionId,
    pub maintenance_id: MaintenanceId,
    pub inventory_item_id: InventoryItemId,
    pub quantity: i64,
    pub unit_cost_cents: i64,
    pub total_cost_cents: i64,
    pub recorded_at: DateTime<Utc>,
}

impl PartConsumption {
    /// Rejects a `quantity * unit_cost` product that overflows `i64` with
    /// `InvalidQuantity`.
    pub fn new(
        id: ConsumptionId,
        maintenance_id: MaintenanceId,
        inventory_item_id: InventoryItemId,
        quantity: i64,
        unit_cost_cents: i64,
        recorded_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let total_cost_cents = quantity
            .checked_mul(unit_cost_cents)
            .ok_or(DomainError::invalid_quantity("total cost overflows"))?;
        Ok(Self {
            id,
            maintenance_id,
            inventory_item_id,
            quantity,
            unit_cost_cents,
            total_cost_cents,
            recorded_at,
        })
    }
}

/// Typed request for booking a part consumption against a maintenance event.
///
/// Validated at the boundary before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumePartRequest {
    pub maintenance_id: MaintenanceId,
    pub inventory_item_id: InventoryItemId,
    pub quantity: i64,
    pub unit_cost_cents: i64,
}

impl ConsumePartRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= 0 {
            return Err(DomainError::invalid_quantity(
                "consumption quantity must be positive",
            ));
        }
        if self.unit_cost_cents < 0 {
            return Err(DomainError::validation("unit cost cannot be negative"));
        }
        Ok(())
    }
}
