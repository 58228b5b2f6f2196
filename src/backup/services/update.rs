//! Update with a safety backup and rollback.

use super::PlatformPorts;
use crate::app::{
    domain::{AppId, NewApp},
    ports::StoreVersion,
    services::upsert_app,
};
use crate::backup::{
    domain::BackupDescription,
    ports::{BackupManager, BackupManagerError, BackupManagerResult},
};

/// Selects the store version with the latest publication timestamp.
///
/// Among versions sharing the latest timestamp the first listed wins.
#[must_use]
pub fn latest_version(versions: &[StoreVersion]) -> Option<&StoreVersion> {
    versions.iter().fold(None, |latest, candidate| match latest {
        Some(current) if candidate.created_at <= current.created_at => Some(current),
        _ => Some(candidate),
    })
}

/// Updates an app to the newest version in the app store.
///
/// Nothing is touched unless the newest store version was published strictly
/// after the installed one. Otherwise an [`BackupDescription::Auto`] backup
/// of the installed version is taken through `manager`, which stops and
/// resumes the app around the snapshot. The new version is then downloaded,
/// the app is stopped, the new version replaces the installed one under the
/// same app identifier, and the app is started again. When installing the
/// new version fails the previous version is reinstated, the app is
/// restarted and the original failure is returned. A failure before the
/// version swap leaves the app running.
///
/// # Errors
///
/// Returns [`BackupManagerError::AlreadyUpToDate`] when no newer version
/// exists, [`BackupManagerError::NoVersionsAvailable`] when the store lists
/// none, [`BackupManagerError::PlatformDatabaseProtected`] for the platform
/// database app, and any collaborator failure.
pub async fn update_app_version<M>(
    manager: &M,
    ports: &PlatformPorts,
    app_id: AppId,
) -> BackupManagerResult<()>
where
    M: BackupManager + ?Sized,
{
    let installed = ports.app(app_id).await?;
    if installed.is_platform_database() {
        return Err(BackupManagerError::PlatformDatabaseProtected { operation: "update" });
    }

    let versions = ports.store.versions(app_id).await?;
    let latest = latest_version(&versions).ok_or(BackupManagerError::NoVersionsAvailable(app_id))?;
    if latest.created_at <= installed.version().created_at() {
        tracing::info!(
            app = %installed.key(),
            version = installed.version().name(),
            "app is already up to date"
        );
        return Err(BackupManagerError::AlreadyUpToDate {
            app: installed.key().clone(),
            version: installed.version().name().to_owned(),
        });
    }

    tracing::info!(
        app = %installed.key(),
        from = installed.version().name(),
        to = latest.name.as_str(),
        "starting app update"
    );
    manager
        .create_backup(app_id, BackupDescription::Auto)
        .await?;
    let downloaded = ports.store.download_version(&latest.id).await?;

    let replacement = NewApp {
        key: installed.key().clone(),
        version: downloaded.version,
        should_be_running: installed.should_be_running(),
    };
    ports.lifecycle.stop_app(app_id).await?;
    if let Err(err) = upsert_app(ports.apps.as_ref(), &replacement).await {
        tracing::error!(
            app = %installed.key(),
            error = %err,
            "failed to install new version; reinstating the previous one"
        );
        let previous = NewApp {
            key: installed.key().clone(),
            version: installed.version().clone(),
            should_be_running: installed.should_be_running(),
        };
        if let Err(rollback_err) = upsert_app(ports.apps.as_ref(), &previous).await {
            tracing::error!(
                app = %installed.key(),
                error = %rollback_err,
                "failed to reinstate the previous version"
            );
        }
        if let Err(start_err) = ports.lifecycle.start_app(app_id).await {
            tracing::error!(
                app = %installed.key(),
                error = %start_err,
                "failed to restart the app after a failed update"
            );
        }
        return Err(err.into());
    }

    ports.lifecycle.start_app(app_id).await?;
    tracing::info!(app = %installed.key(), version = latest.name.as_str(), "app updated");
    Ok(())
}
