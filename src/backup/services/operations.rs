//! Coordinator-guarded entry points for app-mutating operations.

use crate::app::{
    domain::{AppId, AppKey},
    ports::AppLifecycle,
};
use crate::backup::{
    domain::{BackupDescription, BackupId, BackupRecord, RepositoryLocation, RestoredVersion},
    ports::{BackupManager, BackupManagerError, BackupManagerResult},
};
use crate::coordinator::OperationCoordinator;
use std::future::Future;
use std::sync::Arc;

/// Entry points used by the outer API layer.
///
/// Every mutating operation fails fast with
/// [`BackupManagerError::Busy`] while another one
/// holds the coordinator. Listings are served without the coordinator.
pub struct BackupOperations<M>
where
    M: BackupManager + ?Sized,
{
    manager: Arc<M>,
    coordinator: Arc<OperationCoordinator>,
    lifecycle: Arc<dyn AppLifecycle>,
}

impl<M> BackupOperations<M>
where
    M: BackupManager + ?Sized,
{
    /// Creates the entry points over a manager and the shared coordinator.
    #[must_use]
    pub const fn new(
        manager: Arc<M>,
        coordinator: Arc<OperationCoordinator>,
        lifecycle: Arc<dyn AppLifecycle>,
    ) -> Self {
        Self {
            manager,
            coordinator,
            lifecycle,
        }
    }

    async fn guarded<T, F>(&self, label: &str, operation: F) -> BackupManagerResult<T>
    where
        F: Future<Output = BackupManagerResult<T>>,
    {
        let _held = self.coordinator.try_acquire(label)?;
        operation.await
    }

    /// Creates a backup of an installed app.
    ///
    /// # Errors
    ///
    /// Returns `Busy` under contention or the manager's error.
    pub async fn create_backup(
        &self,
        app_id: AppId,
        description: BackupDescription,
    ) -> BackupManagerResult<()> {
        self.guarded(
            "create backup",
            self.manager.create_backup(app_id, description),
        )
        .await
    }

    /// Restores a backup.
    ///
    /// # Errors
    ///
    /// Returns `Busy` under contention or the manager's error.
    pub async fn restore_backup(
        &self,
        id: &BackupId,
        location: RepositoryLocation,
    ) -> BackupManagerResult<RestoredVersion> {
        self.guarded("restore backup", self.manager.restore_backup(id, location))
            .await
    }

    /// Deletes a backup.
    ///
    /// # Errors
    ///
    /// Returns `Busy` under contention or the manager's error.
    pub async fn delete_backup(
        &self,
        id: &BackupId,
        location: RepositoryLocation,
    ) -> BackupManagerResult<()> {
        self.guarded("delete backup", self.manager.delete_backup(id, location))
            .await
    }

    /// Prunes an app.
    ///
    /// # Errors
    ///
    /// Returns `Busy` under contention or the manager's error.
    pub async fn prune_app(&self, app_id: AppId) -> BackupManagerResult<()> {
        self.guarded("prune app", self.manager.prune_app(app_id))
            .await
    }

    /// Updates an app to the newest store version.
    ///
    /// # Errors
    ///
    /// Returns `Busy` under contention or the manager's error.
    pub async fn update_app(&self, app_id: AppId) -> BackupManagerResult<()> {
        self.guarded("update app", self.manager.update_app_version(app_id))
            .await
    }

    /// Starts an app.
    ///
    /// # Errors
    ///
    /// Returns `Busy` under contention or the lifecycle error.
    pub async fn start_app(&self, app_id: AppId) -> BackupManagerResult<()> {
        self.guarded("start app", async {
            self.lifecycle
                .start_app(app_id)
                .await
                .map_err(BackupManagerError::from)
        })
        .await
    }

    /// Stops an app.
    ///
    /// # Errors
    ///
    /// Returns `Busy` under contention or the lifecycle error.
    pub async fn stop_app(&self, app_id: AppId) -> BackupManagerResult<()> {
        self.guarded("stop app", async {
            self.lifecycle
                .stop_app(app_id)
                .await
                .map_err(BackupManagerError::from)
        })
        .await
    }

    /// Ensures the snapshot tooling is ready.
    ///
    /// # Errors
    ///
    /// Returns `Busy` under contention or the manager's error.
    pub async fn prepare_repository(&self) -> BackupManagerResult<()> {
        self.guarded("prepare backup repository", self.manager.prepare_repository())
            .await
    }

    /// Lists the backups of an app. Not gated by the coordinator.
    ///
    /// # Errors
    ///
    /// Returns the manager's error.
    pub async fn list_backups_of_app(
        &self,
        app: &AppKey,
        location: RepositoryLocation,
    ) -> BackupManagerResult<Vec<BackupRecord>> {
        self.manager.list_backups_of_app(app, location).await
    }

    /// Lists the apps with backups in a repository. Not gated by the
    /// coordinator.
    ///
    /// # Errors
    ///
    /// Returns the manager's error.
    pub async fn list_apps_in_backup_repo(
        &self,
        location: RepositoryLocation,
    ) -> BackupManagerResult<Vec<AppKey>> {
        self.manager.list_apps_in_backup_repo(location).await
    }
}
