use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opticare_core::{DomainError, DomainResult, InventoryItemId};

/// Derived stock status.
///
/// Always a pure function of `(quantity, min_quantity)`; see
/// [`StockStatus::for_quantity`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// `quantity == 0 → OutOfStock`; `0 < quantity < min_quantity → LowStock`;
    /// otherwise `InStock`.
    ///
    /// The low-stock comparison is strict: `quantity == min_quantity` is
    /// `InStock`.
    pub fn for_quantity(quantity: i64, min_quantity: i64) -> Self {
        if quantity == 0 {
            StockStatus::OutOfStock
        } else if quantity < min_quantity {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

/// Kind of inventory item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Plain consumable (pads, fluids, blocking material).
    Consumable,
    /// Wear part with a rated lifespan, installed on machines and tracked
    /// until replacement.
    WearPart,
}

/// Wear-part attributes, present only on `ItemKind::WearPart` items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearSpec {
    /// Unit cumulative usage is measured in (e.g. "cuts", "hours").
    pub usage_unit: String,
    /// Rated maximum usage before replacement is due.
    pub max_lifespan: f64,
}

/// Outcome of a successful stock adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Adjustment {
    pub previous_status: StockStatus,
    pub new_quantity: i64,
    pub new_status: StockStatus,
}

/// An inventory item (consumable or wear part).
///
/// `quantity` and `status` move together as a single unit; no caller ever
/// observes an inconsistent intermediate state. Both are private and only
/// change through [`InventoryItem::apply_adjustment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: InventoryItemId,
    name: String,
    category: String,
    kind: ItemKind,
    quantity: i64,
    min_quantity: i64,
    status: StockStatus,
    wear: Option<WearSpec>,
    last_updated: DateTime<Utc>,
}

impl InventoryItem {
    pub fn new(
        id: InventoryItemId,
        name: impl Into<String>,
        category: impl Into<String>,
        kind: ItemKind,
        quantity: i64,
        min_quantity: i64,
        wear: Option<WearSpec>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if quantity < 0 {
            return Err(DomainError::invalid_quantity("quantity cannot be negative"));
        }
        if min_quantity < 0 {
            return Err(DomainError::invalid_quantity(
                "min_quantity cannot be negative",
            ));
        }
        match (kind, &wear) {
            (ItemKind::WearPart, None) => {
                return Err(DomainError::validation(
                    "wear parts require a usage unit and max lifespan",
                ));
            }
            (ItemKind::Consumable, Some(_)) => {
                return Err(DomainError::validation(
                    "consumables cannot carry wear attributes",
                ));
            }
            _ => {}
        }
        if let Some(spec) = &wear {
            if !spec.max_lifespan.is_finite() || spec.max_lifespan <= 0.0 {
                return Err(DomainError::invalid_quantity(
                    "max_lifespan must be a positive number",
                ));
            }
        }

        Ok(Self {
            id,
            name,
            category: category.into(),
            kind,
            quantity,
            min_quantity,
            status: StockStatus::for_quantity(quantity, min_quantity),
            wear,
            last_updated: now,
        })
    }

    pub fn id(&self) -> InventoryItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn min_quantity(&self) -> i64 {
        self.min_quantity
    }

    pub fn status(&self) -> StockStatus {
        self.status
    }

    pub fn wear(&self) -> Option<&WearSpec> {
        self.wear.as_ref()
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Apply a signed stock delta.
    ///
    /// Rejects any adjustment that would drive `quantity` below zero with
    /// `InsufficientStock` and performs no mutation in that case. On success,
    /// quantity, status and `last_updated` change together.
    pub fn apply_adjustment(
        &mut self,
        delta: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Adjustment> {
        let new_quantity = self.quantity + delta;
        if new_quantity < 0 {
            return Err(DomainError::insufficient_stock(self.quantity, -delta));
        }

        let previous_status = self.status;
        self.quantity = new_quantity;
        self.status = StockStatus::for_quantity(new_quantity, self.min_quantity);
        self.last_updated = now;

        Ok(Adjustment {
            previous_status,
            new_quantity,
            new_status: self.status,
        })
    }
}
