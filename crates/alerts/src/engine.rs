use chrono::{DateTime, Utc};

use opticare_core::{InventoryItemId, NotificationId};
use opticare_inventory::StockStatus;
use opticare_parts::PartStatus;

use crate::notification::{AlertSubject, Notification, NotificationKind, Severity};

/// Everything the engine needs to decide on, and phrase, a wear-part alert.
#[derive(Debug, Clone)]
pub struct AlertContext<'a> {
    pub subject: AlertSubject,
    pub part_name: &'a str,
    pub previous_status: PartStatus,
    pub new_status: PartStatus,
    pub usage_percentage: f64,
    pub current_usage: f64,
    pub max_usage: f64,
    pub usage_unit: &'a str,
}

/// Context for a stock-level alert on an inventory item.
#[derive(Debug, Clone)]
pub struct StockAlertContext<'a> {
    pub inventory_item_id: InventoryItemId,
    pub item_name: &'a str,
    pub previous_status: StockStatus,
    pub new_status: StockStatus,
    pub quantity: i64,
    pub min_quantity: i64,
}

/// Stateless threshold evaluator.
///
/// The single de-duplication rule: emit only on a status *transition* into
/// `Warning` or `Critical`. Repeated evaluations that keep the subject in the
/// same band never emit again; a band that was left and re-entered emits
/// again.
pub struct AlertEngine;

impl AlertEngine {
    pub fn evaluate(ctx: &AlertContext<'_>, now: DateTime<Utc>) -> Option<Notification> {
        if ctx.new_status == ctx.previous_status {
            return None;
        }

        let severity = match ctx.new_status {
            PartStatus::Critical => Severity::High,
            PartStatus::Warning => Severity::Medium,
            PartStatus::Normal => return None,
        };

        let title = match ctx.new_status {
            PartStatus::Critical => format!("{} has reached its rated lifespan", ctx.part_name),
            _ => format!("{} is approaching its rated lifespan", ctx.part_name),
        };

        // Message carries the absolute numbers so the consumer can act
        // without a follow-up query.
        let message = format!(
            "{}: {:.0} of {:.0} {} used ({:.1}%)",
            ctx.part_name,
            ctx.current_usage,
            ctx.max_usage,
            ctx.usage_unit,
            ctx.usage_percentage,
        );

        Some(Notification {
            id: NotificationId::new(),
            kind: NotificationKind::WearThreshold,
            title,
            message,
            severity,
            related: ctx.subject,
            read: false,
            created_at: now,
        })
    }

    pub fn evaluate_stock(ctx: &StockAlertContext<'_>, now: DateTime<Utc>) -> Option<Notification> {
        if ctx.new_status == ctx.previous_status {
            return None;
        }

        let severity = match ctx.new_status {
            StockStatus::OutOfStock => Severity::High,
            StockStatus::LowStock => Severity::Medium,
            StockStatus::InStock => return None,
        };

        let title = match ctx.new_status {
            StockStatus::OutOfStock => format!("{} is out of stock", ctx.item_name),
            _ => format!("{} is running low", ctx.item_name),
        };
        let message = format!(
            "{}: {} in stock (minimum {})",
            ctx.item_name, ctx.quantity, ctx.min_quantity,
        );

        Some(Notification {
            id: NotificationId::new(),
            kind: NotificationKind::StockLevel,
            title,
            message,
            severity,
            related: AlertSubject::Item {
                inventory_item_id: ctx.inventory_item_id,
            },
            read: false,
            created_at: now,
        })
    }
}
