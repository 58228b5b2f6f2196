//! Retention sweeps through the backup manager.

use super::helpers::{Backend, Harness, at, key};
use hangar::backup::{
    domain::{BackupDescription, RepositoryLocation, RetentionLimits},
    ports::RemoteRepositoryConfig,
};
use chrono::{DateTime, Utc};
use rstest::rstest;

const TWO_DAILY: RetentionLimits = RetentionLimits {
    keep_daily: 2,
    keep_weekly: 0,
    keep_monthly: 0,
};

/// Installs `acme / wiki` and backs it up once a day from March 1st to 4th,
/// manually on the first day.
async fn four_days_of_backups(harness: &Harness) {
    let app_id = harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;
    for day in 1..=4 {
        harness.clock.set(at(2024, 3, day, 4));
        let description = if day == 1 {
            BackupDescription::Manual
        } else {
            BackupDescription::Auto
        };
        harness
            .manager
            .create_backup(app_id, description)
            .await
            .expect("backup");
    }
}

async fn creation_times(harness: &Harness, location: RepositoryLocation) -> Vec<DateTime<Utc>> {
    let mut times: Vec<_> = harness
        .manager
        .list_backups_of_app(&key("acme", "wiki"), location)
        .await
        .expect("list backups")
        .into_iter()
        .map(|backup| backup.created_at)
        .collect();
    times.sort();
    times
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_keeps_bucket_survivors_and_manual_backups(#[case] backend: Backend) {
    let harness = Harness::with_limits(backend, TWO_DAILY);
    four_days_of_backups(&harness).await;

    harness
        .manager
        .run_retention_policy()
        .await
        .expect("retention");

    assert_eq!(
        creation_times(&harness, RepositoryLocation::Local).await,
        vec![at(2024, 3, 1, 4), at(2024, 3, 3, 4), at(2024, 3, 4, 4)]
    );
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_covers_the_remote_repository_only_when_enabled(#[case] backend: Backend) {
    let harness = Harness::with_limits(backend, TWO_DAILY);
    harness.enable_remote();
    four_days_of_backups(&harness).await;

    harness
        .remote
        .set(RemoteRepositoryConfig::disabled())
        .expect("disable remote");
    harness
        .manager
        .run_retention_policy()
        .await
        .expect("local retention");
    harness.enable_remote();

    assert_eq!(creation_times(&harness, RepositoryLocation::Remote).await.len(), 4);
    assert_eq!(creation_times(&harness, RepositoryLocation::Local).await.len(), 3);

    harness
        .manager
        .run_retention_policy()
        .await
        .expect("full retention");

    assert_eq!(
        creation_times(&harness, RepositoryLocation::Remote).await,
        vec![at(2024, 3, 1, 4), at(2024, 3, 3, 4), at(2024, 3, 4, 4)]
    );
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn default_limits_keep_a_week_of_daily_backups(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    four_days_of_backups(&harness).await;

    harness
        .manager
        .run_retention_policy()
        .await
        .expect("retention");

    assert_eq!(creation_times(&harness, RepositoryLocation::Local).await.len(), 4);
}
