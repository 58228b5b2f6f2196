//! Retention sweep across backup repositories.

use crate::backup::{
    domain::{RepositoryLocation, RetentionLimits, candidates_for_deletion},
    ports::{BackupManager, BackupManagerResult},
};

/// Deletes the backups no retention bucket keeps.
///
/// The local repository is always swept and the remote one only when
/// `remote_enabled` is set. Manual backups are never deleted. A failure to
/// list or delete the backups of one app is logged and the sweep carries on
/// with the next one.
///
/// # Errors
///
/// Returns the error from listing the apps present in a repository.
pub async fn sweep_retention<M>(
    manager: &M,
    limits: RetentionLimits,
    remote_enabled: bool,
) -> BackupManagerResult<()>
where
    M: BackupManager + ?Sized,
{
    sweep_location(manager, limits, RepositoryLocation::Local).await?;
    if remote_enabled {
        sweep_location(manager, limits, RepositoryLocation::Remote).await?;
    }
    Ok(())
}

async fn sweep_location<M>(
    manager: &M,
    limits: RetentionLimits,
    location: RepositoryLocation,
) -> BackupManagerResult<()>
where
    M: BackupManager + ?Sized,
{
    let apps = manager.list_apps_in_backup_repo(location).await?;
    for app in apps {
        let backups = match manager.list_backups_of_app(&app, location).await {
            Ok(backups) => backups,
            Err(err) => {
                tracing::error!(%app, %location, error = %err, "retention sweep skipped app");
                continue;
            }
        };

        let expired = candidates_for_deletion(&backups, limits)
            .into_iter()
            .filter(|backup| !backup.description.is_manual());
        for backup in expired {
            match manager.delete_backup(&backup.id, location).await {
                Ok(()) => tracing::info!(%app, %location, backup = %backup.id, "retention deleted backup"),
                Err(err) => tracing::error!(
                    %app,
                    %location,
                    backup = %backup.id,
                    error = %err,
                    "retention failed to delete backup"
                ),
            }
        }
    }
    Ok(())
}
