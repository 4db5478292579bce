//! Derived reporting views.
//!
//! Stateless folds over maintenance and consumption records. Every function
//! tolerates empty inputs and returns empty or zero-valued aggregates rather
//! than failing.

pub mod report;

pub use report::{
    AreaMonthlyCost, EquipmentCost, MachineRef, MonthlyBucket, PartUsageTotal,
    most_used_parts, monthly_cost_by_area, total_cost_by_equipment,
};
