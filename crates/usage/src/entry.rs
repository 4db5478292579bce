use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opticare_core::{DomainError, DomainResult, InventoryItemId, MachineId, UsageEntryId};

/// One usage event of an inventory item on a piece of equipment.
///
/// Immutable once created. `quantity_used` is signed: a negative entry is the
/// documented mechanism for resetting cumulative usage after a maintenance
/// replacement. Edits are modeled as delete + recreate, never in-place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub id: UsageEntryId,
    pub equipment_id: MachineId,
    pub inventory_item_id: InventoryItemId,
    pub date: DateTime<Utc>,
    pub quantity_used: f64,
    pub unit: String,
    pub responsible: String,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Typed request for recording a usage event, validated at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUsageRequest {
    pub equipment_id: MachineId,
    pub inventory_item_id: InventoryItemId,
    pub date: DateTime<Utc>,
    pub quantity_used: f64,
    pub unit: String,
    pub responsible: String,
    pub comment: Option<String>,
}

impl RecordUsageRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if !self.quantity_used.is_finite() {
            return Err(DomainError::invalid_quantity(
                "quantity_used must be a finite number",
            ));
        }
        if self.quantity_used == 0.0 {
            return Err(DomainError::invalid_quantity(
                "quantity_used cannot be zero",
            ));
        }
        // Positive entries deduct stock, so they must be whole units.
        if self.quantity_used > 0.0 && self.quantity_used.fract() != 0.0 {
            return Err(DomainError::invalid_quantity(
                "stock-affecting usage must be a whole number of units",
            ));
        }
        if self.responsible.trim().is_empty() {
            return Err(DomainError::validation("responsible cannot be empty"));
        }
        Ok(())
    }

    pub fn into_entry(self, id: UsageEntryId, created_at: DateTime<Utc>) -> UsageLogEntry {
        UsageLogEntry {
            id,
            equipment_id: self.equipment_id,
            inventory_item_id: self.inventory_item_id,
            date: self.date,
            quantity_used: self.quantity_used,
            unit: self.unit,
            responsible: self.responsible,
            comment: self.comment,
            created_at,
        }
    }
}

/// Fold entries into cumulative usage, clamped at zero after each step.
///
/// A reset entry larger than the accumulated total cannot drive cumulative
/// usage negative.
pub fn cumulative_usage<'a>(entries: impl IntoIterator<Item = &'a UsageLogEntry>) -> f64 {
    entries
        .into_iter()
        .fold(0.0, |acc, e| (acc + e.quantity_used).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(quantity_used: f64) -> UsageLogEntry {
        UsageLogEntry {
            id: UsageEntryId::new(),
            equipment_id: MachineId::new(),
            inventory_item_id: InventoryItemId::new(),
            date: Utc::now(),
            quantity_used,
            unit: "cuts".to_string(),
            responsible: "lab tech".to_string(),
            comment: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn cumulative_usage_sums_signed_entries() {
        let entries = vec![entry(500.0), entry(1_000.0), entry(-300.0)];
        assert_eq!(cumulative_usage(&entries), 1_200.0);
    }

    #[test]
    fn reset_larger_than_total_clamps_at_zero() {
        let entries = vec![entry(400.0), entry(-10_000.0), entry(250.0)];
        assert_eq!(cumulative_usage(&entries), 250.0);
    }

    #[test]
    fn empty_ledger_is_zero() {
        assert_eq!(cumulative_usage(&[]), 0.0);
    }

    #[test]
    fn fractional_positive_quantity_is_rejected() {
        let req = RecordUsageRequest {
            equipment_id: MachineId::new(),
            inventory_item_id: InventoryItemId::new(),
            date: Utc::now(),
            quantity_used: 2.5,
            unit: "pads".to_string(),
            responsible: "lab tech".to_string(),
            comment: None,
        };
        assert!(matches!(
            req.validate().unwrap_err(),
            DomainError::InvalidQuantity(_)
        ));
    }

    #[test]
    fn negative_reset_entries_validate() {
        let req = RecordUsageRequest {
            equipment_id: MachineId::new(),
            inventory_item_id: InventoryItemId::new(),
            date: Utc::now(),
            quantity_used: -18_000.0,
            unit: "cuts".to_string(),
            responsible: "lab tech".to_string(),
            comment: Some("reset after wheel replacement".to_string()),
        };
        assert!(req.validate().is_ok());
    }
}
