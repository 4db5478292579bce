use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opticare_core::{DomainError, DomainResult, MachineId, MaintenanceId};

/// A maintenance event on a machine.
///
/// `cost_cents` accumulates the base cost plus every part consumption booked
/// against this event; reversals subtract with a clamp at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    id: MaintenanceId,
    machine_id: MachineId,
    description: String,
    start_date: DateTime<Utc>,
    cost_cents: i64,
}

impl MaintenanceRecord {
    pub fn new(
        id: MaintenanceId,
        machine_id: MachineId,
        description: impl Into<String>,
        start_date: DateTime<Utc>,
        cost_cents: i64,
    ) -> DomainResult<Self> {
        if cost_cents < 0 {
            return Err(DomainError::validation("cost cannot be negative"));
        }
        Ok(Self {
            id,
            machine_id,
            description: description.into(),
            start_date,
            cost_cents,
        })
    }

    pub fn id(&self) -> MaintenanceId {
        self.id
    }

    pub fn machine_id(&self) -> MachineId {
        self.machine_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn cost_cents(&self) -> i64 {
        self.cost_cents
    }

    /// Add to the accumulated cost. Rejects a sum that would overflow `i64`
    /// with `InvalidQuantity`, leaving the record untouched.
    pub fn add_cost(&mut self, cents: i64) -> DomainResult<()> {
        self.cost_cents = self
            .cost_cents
            .checked_add(cents)
            .ok_or(DomainError::invalid_quantity("cost sum overflows"))?;
        Ok(())
    }

    /// Subtract cost, clamped at zero (never negative). Returns the amount
    /// actually subtracted, which a compensating action needs to re-add
    /// exactly.
    pub fn subtract_cost_clamped(&mut self, cents: i64) -> i64 {
        let subtracted = cents.min(self.cost_cents);
        self.cost_cents -= subtracted;
        subtracted
    }
}
