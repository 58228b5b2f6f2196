//! Daily maintenance cycles over several simulated days.

use super::helpers::{Backend, Harness, at, key, version};
use hangar::backup::{
    domain::{BackupDescription, RetentionLimits},
    ports::BackupManager,
};
use hangar::config::PlatformConfig;
use hangar::maintenance::{
    adapters::memory::InMemoryConfigStore,
    services::{MaintenanceScheduler, MaintenanceSettingsService, PollOutcome},
};
use rstest::rstest;
use std::sync::Arc;

type Scheduler = MaintenanceScheduler<dyn BackupManager, InMemoryConfigStore, super::helpers::FixedClock>;

fn scheduler_for(harness: &Harness) -> Scheduler {
    MaintenanceScheduler::new(
        Arc::clone(&harness.manager),
        MaintenanceSettingsService::new(Arc::new(InMemoryConfigStore::new())),
        harness.apps.clone(),
        Arc::clone(&harness.coordinator),
        Arc::clone(&harness.clock),
        &PlatformConfig::default(),
    )
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn a_week_of_polling_keeps_the_daily_window(#[case] backend: Backend) {
    let harness = Harness::with_limits(
        backend,
        RetentionLimits {
            keep_daily: 3,
            keep_weekly: 0,
            keep_monthly: 0,
        },
    );
    harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;
    let scheduler = scheduler_for(&harness);
    scheduler
        .settings()
        .ensure_defaults()
        .await
        .expect("defaults");

    let mut completed = 0;
    for day in 4..=10 {
        for hour in [3, 4, 5] {
            harness.clock.set(at(2024, 3, day, hour));
            if let PollOutcome::Completed(_) = scheduler.poll_once().await.expect("poll") {
                completed += 1;
            }
        }
    }

    assert_eq!(completed, 7);
    let backups = harness.local_backups(&key("acme", "wiki")).await;
    assert_eq!(backups.len(), 3);
    assert!(
        backups
            .iter()
            .all(|backup| backup.description == BackupDescription::Auto)
    );
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn an_update_replaces_the_separate_backup(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;
    harness
        .store
        .publish("wiki-2", key("acme", "wiki"), version("2.0", at(2024, 2, 1, 0)))
        .expect("publish");
    let scheduler = scheduler_for(&harness);
    scheduler
        .settings()
        .ensure_defaults()
        .await
        .expect("defaults");

    let report = scheduler.trigger_cycle().await.expect("cycle");

    assert_eq!(report.updated, vec![key("acme", "wiki")]);
    assert!(report.backed_up.is_empty());
    let backups = harness.local_backups(&key("acme", "wiki")).await;
    assert_eq!(backups.len(), 1);
    assert_eq!(
        backups.first().map(|backup| backup.version_name.as_str()),
        Some("1.0")
    );
}
