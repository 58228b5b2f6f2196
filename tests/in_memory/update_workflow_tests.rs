//! Updates with a safety backup, through the guarded entry points.

use super::helpers::{Backend, Harness, at, key, version};
use hangar::app::{adapters::memory::LifecycleEvent, ports::AppRepository};
use hangar::backup::{domain::BackupDescription, ports::ErrorKind};
use hangar::coordinator::OPERATION_BUSY_MESSAGE;
use rstest::rstest;

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn update_backs_up_the_old_version_first(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    let app_id = harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;
    harness
        .store
        .publish("wiki-1", key("acme", "wiki"), version("1.0", at(2024, 1, 1, 0)))
        .expect("publish 1.0");
    harness
        .store
        .publish("wiki-2", key("acme", "wiki"), version("2.0", at(2024, 2, 1, 0)))
        .expect("publish 2.0");

    harness
        .operations()
        .update_app(app_id)
        .await
        .expect("update");

    let backups = harness.local_backups(&key("acme", "wiki")).await;
    assert_eq!(backups.len(), 1);
    let backup = backups.first().expect("safety backup");
    assert_eq!(backup.version_name, "1.0");
    assert_eq!(backup.version_created_at, at(2024, 1, 1, 0));
    assert_eq!(backup.description, BackupDescription::Auto);

    let app = harness
        .apps
        .find_by_id(app_id)
        .await
        .expect("lookup")
        .expect("same identifier");
    assert_eq!(app.version().name(), "2.0");
    assert_eq!(
        harness.lifecycle.events().last(),
        Some(&LifecycleEvent::Started(app_id))
    );
    assert!(!harness.coordinator.is_locked());
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn update_without_newer_version_changes_nothing(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    let app_id = harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;
    harness
        .store
        .publish("wiki-0", key("acme", "wiki"), version("0.9", at(2023, 12, 1, 0)))
        .expect("publish 0.9");
    harness
        .store
        .publish("wiki-1", key("acme", "wiki"), version("1.0", at(2024, 1, 1, 0)))
        .expect("publish 1.0");

    let err = harness
        .operations()
        .update_app(app_id)
        .await
        .expect_err("already up to date");

    assert_eq!(err.kind(), ErrorKind::AlreadyUpToDate);
    assert!(err.to_string().contains("is already up to date"));
    assert!(harness.local_backups(&key("acme", "wiki")).await.is_empty());
    assert!(harness.lifecycle.events().is_empty());
    let app = harness
        .apps
        .find_by_id(app_id)
        .await
        .expect("lookup")
        .expect("app");
    assert_eq!(app.version().name(), "1.0");
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn update_is_refused_while_another_operation_runs(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    let app_id = harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;
    harness
        .store
        .publish("wiki-2", key("acme", "wiki"), version("2.0", at(2024, 2, 1, 0)))
        .expect("publish 2.0");
    let operations = harness.operations();
    harness
        .coordinator
        .try_lock("create backup")
        .expect("acquire");

    let err = operations
        .update_app(app_id)
        .await
        .expect_err("coordinator is held");

    assert_eq!(err.kind(), ErrorKind::Busy);
    assert_eq!(err.to_string(), OPERATION_BUSY_MESSAGE);
    assert!(harness.local_backups(&key("acme", "wiki")).await.is_empty());
}
