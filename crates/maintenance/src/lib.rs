//! Maintenance domain module.
//!
//! Maintenance events and their part-consumption records. Costs are integer
//! cents; the accumulated maintenance cost clamps at zero on subtraction.

pub mod consumption;
pub mod record;

pub use consumption::{ConsumePartRequest, PartConsumption};
pub use record::MaintenanceRecord;
