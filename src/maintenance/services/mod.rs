//! Maintenance orchestration services.

mod error;
mod scheduler;
mod settings;

pub use error::{MaintenanceError, MaintenanceResult};
pub use scheduler::{CycleReport, MAINTENANCE_CYCLE_LABEL, MaintenanceScheduler, PollOutcome};
pub use settings::MaintenanceSettingsService;
