//! Behaviour shared by both backup manager implementations.

use super::helpers::{Backend, Harness, at, key, version};
use hangar::app::ports::AppRepository;
use hangar::backup::{
    domain::{BackupDescription, BackupId, RepositoryLocation},
    ports::{BackupManagerError, ErrorKind},
};
use rstest::rstest;

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn created_backups_carry_the_app_version(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    let app_id = harness.install("acme", "wiki", "1.4", at(2024, 1, 15, 8)).await;

    harness
        .manager
        .create_backup(app_id, BackupDescription::Manual)
        .await
        .expect("backup");

    let backups = harness.local_backups(&key("acme", "wiki")).await;
    assert_eq!(backups.len(), 1);
    let backup = backups.first().expect("backup");
    assert_eq!(backup.app, key("acme", "wiki"));
    assert_eq!(backup.version_name, "1.4");
    assert_eq!(backup.version_created_at, at(2024, 1, 15, 8));
    assert_eq!(backup.description, BackupDescription::Manual);
    assert_eq!(backup.created_at, at(2024, 3, 1, 12));
    assert_eq!(backup.location, RepositoryLocation::Local);
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn listings_are_scoped_to_one_app(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    let wiki = harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;
    let wiki_fork = harness.install("acme", "wiki-fork", "1.0", at(2024, 1, 1, 0)).await;
    let other = harness.install("other", "wiki", "1.0", at(2024, 1, 1, 0)).await;

    for app_id in [wiki, wiki_fork, other, wiki] {
        harness
            .manager
            .create_backup(app_id, BackupDescription::Custom("nightly".to_owned()))
            .await
            .expect("backup");
    }

    let backups = harness.local_backups(&key("acme", "wiki")).await;
    assert_eq!(backups.len(), 2);
    assert!(backups.iter().all(|backup| backup.app == key("acme", "wiki")));
    assert!(
        backups
            .iter()
            .all(|backup| backup.description == BackupDescription::Custom("nightly".to_owned()))
    );
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn apps_in_repository_are_unique_in_first_seen_order(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    let chat = harness.install("acme", "chat", "1.0", at(2024, 1, 1, 0)).await;
    let wiki = harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;

    for app_id in [chat, wiki, chat] {
        harness
            .manager
            .create_backup(app_id, BackupDescription::Auto)
            .await
            .expect("backup");
    }

    let apps = harness
        .manager
        .list_apps_in_backup_repo(RepositoryLocation::Local)
        .await
        .expect("list apps");
    assert_eq!(apps, vec![key("acme", "chat"), key("acme", "wiki")]);
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn remote_repository_is_used_only_when_enabled(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    let app_id = harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;
    harness
        .manager
        .create_backup(app_id, BackupDescription::Manual)
        .await
        .expect("local-only backup");

    let while_disabled = harness
        .manager
        .list_backups_of_app(&key("acme", "wiki"), RepositoryLocation::Remote)
        .await
        .expect("remote listing");
    assert!(while_disabled.is_empty());

    harness.enable_remote();
    harness
        .manager
        .create_backup(app_id, BackupDescription::Manual)
        .await
        .expect("backup to both");

    let remote = harness
        .manager
        .list_backups_of_app(&key("acme", "wiki"), RepositoryLocation::Remote)
        .await
        .expect("remote listing");
    assert_eq!(remote.len(), 1);
    assert_eq!(
        remote.first().map(|backup| backup.location),
        Some(RepositoryLocation::Remote)
    );
    assert_eq!(harness.local_backups(&key("acme", "wiki")).await.len(), 2);
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_backups_are_gone(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    let app_id = harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;
    harness
        .manager
        .create_backup(app_id, BackupDescription::Manual)
        .await
        .expect("backup");
    let backup = harness
        .local_backups(&key("acme", "wiki"))
        .await
        .pop()
        .expect("backup");

    harness
        .manager
        .delete_backup(&backup.id, RepositoryLocation::Local)
        .await
        .expect("delete");
    let again = harness
        .manager
        .delete_backup(&backup.id, RepositoryLocation::Local)
        .await;

    assert!(harness.local_backups(&key("acme", "wiki")).await.is_empty());
    let err = again.expect_err("second delete");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn restore_reinstalls_the_backed_up_version(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    let app_id = harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;
    harness
        .manager
        .create_backup(app_id, BackupDescription::Manual)
        .await
        .expect("backup");
    let backup = harness
        .local_backups(&key("acme", "wiki"))
        .await
        .pop()
        .expect("backup");
    let backed_up_content = harness
        .apps
        .find_by_id(app_id)
        .await
        .expect("lookup")
        .expect("app")
        .version()
        .content()
        .to_vec();
    harness
        .apps
        .update_version(app_id, &version("2.0", at(2024, 2, 1, 0)))
        .await
        .expect("move to 2.0");

    let restored = harness
        .manager
        .restore_backup(&backup.id, RepositoryLocation::Local)
        .await
        .expect("restore");

    assert_eq!(restored.app, key("acme", "wiki"));
    assert_eq!(restored.version_name, "1.0");
    assert_eq!(restored.content, backed_up_content);
    let app = harness
        .apps
        .find_by_key(&key("acme", "wiki"))
        .await
        .expect("lookup")
        .expect("restored app");
    assert_eq!(app.version().name(), "1.0");
    assert_eq!(app.version().created_at(), at(2024, 1, 1, 0));
    assert!(app.should_be_running());
    assert_eq!(harness.apps.list_all().await.expect("list").len(), 1);
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn restoring_an_unknown_backup_is_not_found(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    let id = BackupId::new("0".repeat(64)).expect("valid id");

    let result = harness
        .manager
        .restore_backup(&id, RepositoryLocation::Local)
        .await;

    assert!(matches!(
        result,
        Err(BackupManagerError::BackupNotFound { location: RepositoryLocation::Local, .. })
    ));
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn backups_of_unknown_apps_are_rejected(#[case] backend: Backend) {
    let harness = Harness::new(backend);

    let result = harness
        .manager
        .create_backup(hangar::app::domain::AppId::new(99), BackupDescription::Manual)
        .await;

    assert_eq!(result.expect_err("unknown app").kind(), ErrorKind::NotFound);
}

#[rstest]
#[case::fake(Backend::Fake)]
#[case::snapshot(Backend::Snapshot)]
#[tokio::test(flavor = "multi_thread")]
async fn descriptions_with_commas_are_rejected_before_any_snapshot(#[case] backend: Backend) {
    let harness = Harness::new(backend);
    let app_id = harness.install("acme", "wiki", "1.0", at(2024, 1, 1, 0)).await;

    let result = harness
        .manager
        .create_backup(
            app_id,
            BackupDescription::Custom("before migration, step 2".to_owned()),
        )
        .await;

    let err = result.expect_err("comma in description");
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(harness.local_backups(&key("acme", "wiki")).await.is_empty());
    assert!(harness.lifecycle.events().is_empty());
}
