use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opticare_core::{DomainError, DomainResult, InventoryItemId, MachineId, MachinePartId};

/// Health status of a tracked wear part.
///
/// Always a pure function of `current_usage / max_usage`; see
/// [`PartStatus::for_percentage`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartStatus {
    Normal,
    Warning,
    Critical,
}

impl PartStatus {
    /// `pct >= 100 → Critical`; `75 <= pct < 100 → Warning`; else `Normal`.
    ///
    /// Both breakpoints are inclusive on the upper band: exactly 75.0 is
    /// `Warning`, exactly 100.0 is `Critical`.
    pub fn for_percentage(pct: f64) -> Self {
        if pct >= 100.0 {
            PartStatus::Critical
        } else if pct >= 75.0 {
            PartStatus::Warning
        } else {
            PartStatus::Normal
        }
    }
}

/// Outcome of recording additional usage against a part.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UsageUpdate {
    pub new_status: PartStatus,
    /// True iff the status stored before this update differs from `new_status`.
    /// Downward transitions (after a reset) are reported once, too.
    pub status_changed: bool,
    pub usage_percentage: f64,
}

/// An installed wear-part instance on a machine.
///
/// `current_usage` only increases through [`MachinePart::record_usage`];
/// replacement is tombstone-and-recreate (see [`MachinePart::replacement`]),
/// never an in-place reset, so the final usage of the old instance stays
/// attributable to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachinePart {
    id: MachinePartId,
    machine_id: MachineId,
    inventory_item_id: InventoryItemId,
    name: String,
    installed_at: DateTime<Utc>,
    usage_unit: String,
    max_usage: f64,
    current_usage: f64,
    status: PartStatus,
}

impl MachinePart {
    pub fn new(
        id: MachinePartId,
        machine_id: MachineId,
        inventory_item_id: InventoryItemId,
        name: impl Into<String>,
        usage_unit: impl Into<String>,
        max_usage: f64,
        installed_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("part name cannot be empty"));
        }
        if !max_usage.is_finite() || max_usage <= 0.0 {
            return Err(DomainError::invalid_quantity(
                "max_usage must be a positive number",
            ));
        }

        Ok(Self {
            id,
            machine_id,
            inventory_item_id,
            name,
            installed_at,
            usage_unit: usage_unit.into(),
            max_usage,
            current_usage: 0.0,
            status: PartStatus::Normal,
        })
    }

    pub fn id(&self) -> MachinePartId {
        self.id
    }

    pub fn machine_id(&self) -> MachineId {
        self.machine_id
    }

    pub fn inventory_item_id(&self) -> InventoryItemId {
        self.inventory_item_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn installed_at(&self) -> DateTime<Utc> {
        self.installed_at
    }

    pub fn usage_unit(&self) -> &str {
        &self.usage_unit
    }

    pub fn max_usage(&self) -> f64 {
        self.max_usage
    }

    pub fn current_usage(&self) -> f64 {
        self.current_usage
    }

    pub fn status(&self) -> PartStatus {
        self.status
    }

    pub fn usage_percentage(&self) -> f64 {
        self.current_usage / self.max_usage * 100.0
    }

    /// Add usage to the part and recompute its status.
    ///
    /// `additional` must be finite and non-negative; cumulative usage is
    /// monotonic through this path. `status_changed` in the returned update is
    /// the trigger condition the alert engine consumes.
    pub fn record_usage(&mut self, additional: f64) -> DomainResult<UsageUpdate> {
        if !additional.is_finite() || additional < 0.0 {
            return Err(DomainError::invalid_quantity(
                "additional usage must be a finite, non-negative number",
            ));
        }

        self.current_usage += additional;
        let usage_percentage = self.usage_percentage();
        let new_status = PartStatus::for_percentage(usage_percentage);
        let status_changed = new_status != self.status;
        self.status = new_status;

        Ok(UsageUpdate {
            new_status,
            status_changed,
            usage_percentage,
        })
    }

    /// Build the successor record for a replacement.
    ///
    /// Fresh id, zero usage, `Normal` status; machine, name, usage unit and
    /// rated maximum are carried over from this instance.
    pub fn replacement(
        &self,
        new_inventory_item_id: InventoryItemId,
        installed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MachinePartId::new(),
            machine_id: self.machine_id,
            inventory_item_id: new_inventory_item_id,
            name: self.name.clone(),
            installed_at,
            usage_unit: self.usage_unit.clone(),
            max_usage: self.max_usage,
            current_usage: 0.0,
            status: PartStatus::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn blade(max_usage: f64) -> MachinePart {
        MachinePart::new(
            MachinePartId::new(),
            MachineId::new(),
            InventoryItemId::new(),
            "cutting wheel",
            "cuts",
            max_usage,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn breakpoints_are_inclusive() {
        assert_eq!(PartStatus::for_percentage(74.999), PartStatus::Normal);
        assert_eq!(PartStatus::for_percentage(75.0), PartStatus::Warning);
        assert_eq!(PartStatus::for_percentage(99.999), PartStatus::Warning);
        assert_eq!(PartStatus::for_percentage(100.0), PartStatus::Critical);
        assert_eq!(PartStatus::for_percentage(130.0), PartStatus::Critical);
    }

    #[test]
    fn usage_below_warning_band_reports_no_change() {
        // maxUsage=25000, currentUsage=18000: +500 lands at 74.0%.
        let mut part = blade(25_000.0);
        part.record_usage(18_000.0).unwrap();

        let update = part.record_usage(500.0).unwrap();
        assert_eq!(update.new_status, PartStatus::Normal);
        assert!(!update.status_changed);
        assert!((update.usage_percentage - 74.0).abs() < 1e-9);

        // +1000 more lands at 78.0% and crosses into Warning exactly once.
        let update = part.record_usage(1_000.0).unwrap();
        assert_eq!(update.new_status, PartStatus::Warning);
        assert!(update.status_changed);
        assert!((update.usage_percentage - 78.0).abs() < 1e-9);
    }

    #[test]
    fn second_update_in_same_band_reports_no_change() {
        let mut part = blade(100.0);
        let first = part.record_usage(80.0).unwrap();
        assert!(first.status_changed);
        assert_eq!(first.new_status, PartStatus::Warning);

        let second = part.record_usage(5.0).unwrap();
        assert!(!second.status_changed);
        assert_eq!(second.new_status, PartStatus::Warning);
    }

    #[test]
    fn negative_usage_is_rejected() {
        let mut part = blade(100.0);
        let err = part.record_usage(-1.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity(_)));
        assert_eq!(part.current_usage(), 0.0);
    }

    #[test]
    fn replacement_starts_fresh_and_keeps_ratings() {
        let mut part = blade(25_000.0);
        part.record_usage(24_000.0).unwrap();

        let new_item = InventoryItemId::new();
        let successor = part.replacement(new_item, Utc::now());

        assert_ne!(successor.id(), part.id());
        assert_eq!(successor.machine_id(), part.machine_id());
        assert_eq!(successor.inventory_item_id(), new_item);
        assert_eq!(successor.max_usage(), 25_000.0);
        assert_eq!(successor.current_usage(), 0.0);
        assert_eq!(successor.status(), PartStatus::Normal);
        // Old instance keeps its final usage.
        assert_eq!(part.current_usage(), 24_000.0);
    }

    proptest! {
        /// Property: within any sequence of usage increments, a band is entered
        /// at most once in a row — consecutive updates landing in the same band
        /// report `status_changed` only on the first.
        #[test]
        fn status_changes_only_on_band_transitions(
            increments in prop::collection::vec(0.0f64..30.0, 1..60),
        ) {
            let mut part = blade(100.0);
            let mut previous = part.status();
            for inc in increments {
                let update = part.record_usage(inc).unwrap();
                prop_assert_eq!(update.status_changed, update.new_status != previous);
                prop_assert_eq!(
                    update.new_status,
                    PartStatus::for_percentage(part.usage_percentage())
                );
                previous = update.new_status;
            }
        }

        /// Property: usage is monotonic through `record_usage`.
        #[test]
        fn usage_is_monotonic(
            increments in prop::collection::vec(0.0f64..500.0, 1..40),
        ) {
            let mut part = blade(25_000.0);
            let mut last = 0.0f64;
            for inc in increments {
                part.record_usage(inc).unwrap();
                prop_assert!(part.current_usage() >= last);
                last = part.current_usage();
            }
        }
    }
}
