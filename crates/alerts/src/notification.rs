use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opticare_core::{InventoryItemId, MachineId, MachinePartId, NotificationId};

/// Notification severity for the consumer UI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// What class of condition a notification reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A wear part crossed a usage threshold.
    WearThreshold,
    /// An inventory item dropped to low or zero stock.
    StockLevel,
}

/// The entity a notification relates to; its `Display` rendering is the key
/// space callers later query "alerts for this entity" with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertSubject {
    /// An installed wear-part instance.
    Part { part_id: MachinePartId },
    /// A (equipment, inventory item) pair tracked through the usage ledger.
    EquipmentItem {
        equipment_id: MachineId,
        inventory_item_id: InventoryItemId,
    },
    /// An inventory item's stock level.
    Item { inventory_item_id: InventoryItemId },
}

impl core::fmt::Display for AlertSubject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AlertSubject::Part { part_id } => write!(f, "{part_id}"),
            AlertSubject::EquipmentItem {
                equipment_id,
                inventory_item_id,
            } => write!(f, "{equipment_id}_{inventory_item_id}"),
            AlertSubject::Item { inventory_item_id } => write!(f, "{inventory_item_id}"),
        }
    }
}

/// A notification value object, handed to a sink for delivery.
///
/// Write-once except for the `read` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub related: AlertSubject,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

/// Delivery seam: accepts a constructed notification and owns
/// delivery/visibility from there.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: Notification);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equipment_item_subject_renders_composite_key() {
        let equipment_id = MachineId::new();
        let inventory_item_id = InventoryItemId::new();
        let subject = AlertSubject::EquipmentItem {
            equipment_id,
            inventory_item_id,
        };
        assert_eq!(
            subject.to_string(),
            format!("{equipment_id}_{inventory_item_id}")
        );
    }
}
