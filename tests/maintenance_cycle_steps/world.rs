//! Shared world state for maintenance cycle BDD scenarios.

use std::sync::Arc;

use super::helpers::{Backend, FixedClock, Harness};
use hangar::backup::ports::BackupManager;
use hangar::config::PlatformConfig;
use hangar::maintenance::{
    adapters::memory::InMemoryConfigStore,
    services::{MaintenanceError, MaintenanceScheduler, MaintenanceSettingsService, PollOutcome},
};
use rstest::fixture;

/// Scheduler type used by the BDD world.
pub type TestScheduler = MaintenanceScheduler<dyn BackupManager, InMemoryConfigStore, FixedClock>;

/// Scenario world for maintenance cycle behaviour tests.
pub struct MaintenanceWorld {
    pub harness: Harness,
    pub scheduler: TestScheduler,
    pub last_outcome: Option<Result<PollOutcome, MaintenanceError>>,
}

impl MaintenanceWorld {
    /// Creates a world over the in-memory backup manager.
    #[must_use]
    pub fn new() -> Self {
        let harness = Harness::new(Backend::Fake);
        let scheduler = MaintenanceScheduler::new(
            Arc::clone(&harness.manager),
            MaintenanceSettingsService::new(Arc::new(InMemoryConfigStore::new())),
            harness.apps.clone(),
            Arc::clone(&harness.coordinator),
            Arc::clone(&harness.clock),
            &PlatformConfig::default(),
        );
        Self {
            harness,
            scheduler,
            last_outcome: None,
        }
    }
}

impl Default for MaintenanceWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MaintenanceWorld {
    MaintenanceWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
