//! Maintenance settings and scheduling rules.

mod error;
mod schedule;
mod settings;

pub use error::MaintenanceDomainError;
pub use schedule::is_maintenance_cycle_due;
pub use settings::{MaintenanceHour, MaintenanceSettings, MaintenanceSettingsUpdate};
