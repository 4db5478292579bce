use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use opticare_core::{InventoryItemId, MachineId, MaintenanceId};
use opticare_maintenance::{MaintenanceRecord, PartConsumption};

/// Minimal machine reference needed for report grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRef {
    pub id: MachineId,
    pub name: String,
    /// Lab area / location the machine sits in (grouping key for cost-by-area).
    pub location: String,
}

/// Total maintenance spend for one machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentCost {
    pub machine_id: MachineId,
    pub total_cost_cents: i64,
}

/// One calendar-month cost bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub cost_cents: i64,
}

/// Six trailing calendar months of maintenance cost for one lab area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaMonthlyCost {
    pub area: String,
    /// Exactly six buckets, oldest first, zero-filled.
    pub monthly: Vec<MonthlyBucket>,
}

/// Aggregated consumption totals for one inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartUsageTotal {
    pub inventory_item_id: InventoryItemId,
    pub name: String,
    pub total_quantity: i64,
    pub total_cost_cents: i64,
}

/// Total cost per equipment: the maintenance's accumulated cost plus the
/// consumption totals booked against that equipment's maintenances, summed.
///
/// Note: the accumulated maintenance cost already absorbs consumption totals
/// as they are booked; the report nevertheless sums both, matching the
/// dashboard's historical definition. Sorted descending by cost.
pub fn total_cost_by_equipment(
    maintenances: &[MaintenanceRecord],
    consumptions: &[PartConsumption],
) -> Vec<EquipmentCost> {
    let machine_of: HashMap<MaintenanceId, MachineId> = maintenances
        .iter()
        .map(|m| (m.id(), m.machine_id()))
        .collect();

    let mut totals: HashMap<MachineId, i64> = HashMap::new();
    for m in maintenances {
        *totals.entry(m.machine_id()).or_default() += m.cost_cents();
    }
    for c in consumptions {
        // Consumptions pointing at unknown maintenances are skipped.
        if let Some(machine_id) = machine_of.get(&c.maintenance_id) {
            *totals.entry(*machine_id).or_default() += c.total_cost_cents;
        }
    }

    let mut out: Vec<EquipmentCost> = totals
        .into_iter()
        .map(|(machine_id, total_cost_cents)| EquipmentCost {
            machine_id,
            total_cost_cents,
        })
        .collect();
    out.sort_by(|a, b| {
        b.total_cost_cents
            .cmp(&a.total_cost_cents)
            .then_with(|| a.machine_id.as_uuid().as_bytes().cmp(b.machine_id.as_uuid().as_bytes()))
    });
    out
}

/// The (year, month) pairs of the trailing `n` calendar months ending at
/// `now`'s month, oldest first.
fn trailing_months(now: DateTime<Utc>, n: usize) -> Vec<(i32, u32)> {
    let mut year = now.year();
    let mut month = now.month();
    let mut months = Vec::with_capacity(n);
    for _ in 0..n {
        months.push((year, month));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    months.reverse();
    months
}

/// Maintenance cost per lab area over the trailing six calendar months.
///
/// Bucketing is by calendar month of `start_date`, not rolling 30-day
/// windows. Areas come from the machine registry; machines without
/// maintenance in the window still produce zero-filled buckets for their
/// area. Sorted by area name.
pub fn monthly_cost_by_area(
    machines: &[MachineRef],
    maintenances: &[MaintenanceRecord],
    now: DateTime<Utc>,
) -> Vec<AreaMonthlyCost> {
    let months = trailing_months(now, 6);
    let area_of: HashMap<MachineId, &str> = machines
        .iter()
        .map(|m| (m.id, m.location.as_str()))
        .collect();

    let mut per_area: HashMap<&str, HashMap<(i32, u32), i64>> = HashMap::new();
    for m in machines {
        per_area.entry(m.location.as_str()).or_default();
    }
    for m in maintenances {
        let Some(area) = area_of.get(&m.machine_id()) else {
            continue;
        };
        let key = (m.start_date().year(), m.start_date().month());
        if !months.contains(&key) {
            continue;
        }
        *per_area.entry(area).or_default().entry(key).or_default() += m.cost_cents();
    }

    let mut out: Vec<AreaMonthlyCost> = per_area
        .into_iter()
        .map(|(area, buckets)| AreaMonthlyCost {
            area: area.to_string(),
            monthly: months
                .iter()
                .map(|&(year, month)| MonthlyBucket {
                    year,
                    month,
                    cost_cents: buckets.get(&(year, month)).copied().unwrap_or(0),
                })
                .collect(),
        })
        .collect();
    out.sort_by(|a, b| a.area.cmp(&b.area));
    out
}

/// Consumption records grouped by item, summing quantity and cost, sorted
/// descending by summed quantity (ties broken by cost, then id, for
/// determinism). Items missing from `item_names` keep an empty name.
pub fn most_used_parts(
    consumptions: &[PartConsumption],
    item_names: &HashMap<InventoryItemId, String>,
) -> Vec<PartUsageTotal> {
    let mut totals: HashMap<InventoryItemId, (i64, i64)> = HashMap::new();
    for c in consumptions {
        let entry = totals.entry(c.inventory_item_id).or_default();
        entry.0 += c.quantity;
        entry.1 += c.total_cost_cents;
    }

    let mut out: Vec<PartUsageTotal> = totals
        .into_iter()
        .map(|(id, (total_quantity, total_cost_cents))| PartUsageTotal {
            inventory_item_id: id,
            name: item_names.get(&id).cloned().unwrap_or_default(),
            total_quantity,
            total_cost_cents,
        })
        .collect();
    out.sort_by(|a, b| {
        b.total_quantity
            .cmp(&a.total_quantity)
            .then_with(|| b.total_cost_cents.cmp(&a.total_cost_cents))
            .then_with(|| {
                a.inventory_item_id
                    .as_uuid()
                    .as_bytes()
                    .cmp(b.inventory_item_id.as_uuid().as_bytes())
            })
    });
    out
}
