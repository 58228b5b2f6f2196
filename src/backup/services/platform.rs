//! Collaborators shared by every backup manager implementation.

use crate::app::{
    domain::{AppId, AppRecord},
    ports::{AppLifecycle, AppRepository, AppStoreClient, PlatformDatabase},
};
use crate::backup::{
    domain::RepositoryLocation,
    ports::{BackupManagerError, BackupManagerResult, RemoteRepositorySettings, RepositoryTarget},
};
use std::sync::Arc;

/// Platform collaborators consumed by the backup core.
#[derive(Clone)]
pub struct PlatformPorts {
    /// Installed app records.
    pub apps: Arc<dyn AppRepository>,
    /// Container start and stop.
    pub lifecycle: Arc<dyn AppLifecycle>,
    /// The platform's own database app.
    pub database: Arc<dyn PlatformDatabase>,
    /// App store catalog.
    pub store: Arc<dyn AppStoreClient>,
    /// Remote repository settings.
    pub remote: Arc<dyn RemoteRepositorySettings>,
}

impl PlatformPorts {
    /// Fetches an installed app.
    ///
    /// # Errors
    ///
    /// Returns [`BackupManagerError::AppNotFound`] when no app has the
    /// identifier, or the repository error.
    pub async fn app(&self, id: AppId) -> BackupManagerResult<AppRecord> {
        self.apps
            .find_by_id(id)
            .await?
            .ok_or(BackupManagerError::AppNotFound(id))
    }

    /// Returns the remote target when the remote repository is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`BackupManagerError::RemoteSettings`] when the settings cannot
    /// be read.
    pub async fn remote_target(&self) -> BackupManagerResult<Option<RepositoryTarget>> {
        let config = self.remote.remote_repository().await?;
        Ok(config.enabled.then_some(RepositoryTarget::Remote(config)))
    }

    /// Resolves a location to a target, or `None` for a disabled remote
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns [`BackupManagerError::RemoteSettings`] when the settings cannot
    /// be read.
    pub async fn target_for(
        &self,
        location: RepositoryLocation,
    ) -> BackupManagerResult<Option<RepositoryTarget>> {
        match location {
            RepositoryLocation::Local => Ok(Some(RepositoryTarget::Local)),
            RepositoryLocation::Remote => self.remote_target().await,
        }
    }

    /// Brings an app back after its volumes were snapshotted or restored.
    ///
    /// The platform database is reinitialized and flagged to run; every other
    /// app is started.
    ///
    /// # Errors
    ///
    /// Returns lifecycle or repository errors.
    pub async fn resume(&self, app: &AppRecord) -> BackupManagerResult<()> {
        if app.is_platform_database() {
            self.database.reinitialize().await?;
            self.apps.set_should_be_running(app.id(), true).await?;
        } else {
            self.lifecycle.start_app(app.id()).await?;
        }
        Ok(())
    }
}
