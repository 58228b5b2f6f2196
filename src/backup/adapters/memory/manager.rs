//! In-memory backup manager.

use crate::app::{
    domain::{AppId, AppKey, AppRecord, AppVersion, NewApp},
    services::replace_app,
};
use crate::backup::{
    domain::{
        BackupDescription, BackupId, BackupRecord, RepositoryLocation, RestoredVersion,
        RetentionLimits, declared_volumes,
    },
    ports::{BackupManager, BackupManagerError, BackupManagerResult, SnapshotStoreError},
    services::{PlatformPorts, sweep_retention, update_app_version},
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::{Arc, RwLock};

/// First identifier handed out by the fake repository.
const FIRST_BACKUP_SEQUENCE: u64 = 100;

/// Deterministic [`BackupManager`] that keeps both repositories as one
/// ordered list.
///
/// Listing, filtering and retention follow the same rules as
/// [`crate::backup::services::SnapshotBackupManager`]; only volumes and
/// container resources are not modelled.
#[derive(Clone)]
pub struct InMemoryBackupManager<C>
where
    C: Clock + Send + Sync,
{
    ports: PlatformPorts,
    clock: Arc<C>,
    limits: RetentionLimits,
    state: Arc<RwLock<FakeRepository>>,
}

#[derive(Debug)]
struct FakeRepository {
    backups: Vec<StoredBackup>,
    next_sequence: u64,
}

impl Default for FakeRepository {
    fn default() -> Self {
        Self {
            backups: Vec::new(),
            next_sequence: FIRST_BACKUP_SEQUENCE,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredBackup {
    record: BackupRecord,
    content: Vec<u8>,
}

fn poisoned(err: impl ToString) -> BackupManagerError {
    BackupManagerError::Snapshot(SnapshotStoreError::tool(std::io::Error::other(
        err.to_string(),
    )))
}

impl<C> InMemoryBackupManager<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty fake repository.
    #[must_use]
    pub fn new(ports: PlatformPorts, clock: Arc<C>, limits: RetentionLimits) -> Self {
        Self {
            ports,
            clock,
            limits,
            state: Arc::default(),
        }
    }

    /// Removes every stored backup.
    ///
    /// # Errors
    ///
    /// Returns an error when lock acquisition fails.
    pub fn clear(&self) -> BackupManagerResult<()> {
        self.state.write().map_err(poisoned)?.backups.clear();
        Ok(())
    }

    fn store(
        &self,
        location: RepositoryLocation,
        app: &AppRecord,
        description: &BackupDescription,
    ) -> BackupManagerResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let id = BackupId::new(format!("{:064x}", state.next_sequence))?;
        state.next_sequence += 1;
        let version = app.version();
        state.backups.push(StoredBackup {
            record: BackupRecord {
                id,
                app: app.key().clone(),
                version_name: version.name().to_owned(),
                version_created_at: version.created_at(),
                description: description.clone(),
                created_at: self.clock.utc(),
                location,
            },
            content: version.content().to_vec(),
        });
        Ok(())
    }

    fn stored(&self, location: RepositoryLocation) -> BackupManagerResult<Vec<StoredBackup>> {
        Ok(self
            .state
            .read()
            .map_err(poisoned)?
            .backups
            .iter()
            .filter(|stored| stored.record.location == location)
            .cloned()
            .collect())
    }

    async fn visible(&self, location: RepositoryLocation) -> BackupManagerResult<Vec<StoredBackup>> {
        if self.ports.target_for(location).await?.is_none() {
            return Ok(Vec::new());
        }
        self.stored(location)
    }
}

#[async_trait]
impl<C> BackupManager for InMemoryBackupManager<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn create_backup(
        &self,
        app_id: AppId,
        description: BackupDescription,
    ) -> BackupManagerResult<()> {
        description.validate()?;
        let app = self.ports.app(app_id).await?;
        declared_volumes(app.version().content())?;

        let mut locations = vec![RepositoryLocation::Local];
        if self.ports.remote_target().await?.is_some() {
            locations.push(RepositoryLocation::Remote);
        }
        for location in locations {
            self.ports.lifecycle.stop_app(app_id).await?;
            let stored = self.store(location, &app, &description);
            let resumed = self.ports.resume(&app).await;
            stored?;
            resumed?;
        }
        Ok(())
    }

    async fn delete_backup(
        &self,
        id: &BackupId,
        location: RepositoryLocation,
    ) -> BackupManagerResult<()> {
        let not_found = || BackupManagerError::BackupNotFound {
            id: id.clone(),
            location,
        };
        if self.ports.target_for(location).await?.is_none() {
            return Err(not_found());
        }
        let mut state = self.state.write().map_err(poisoned)?;
        let position = state
            .backups
            .iter()
            .position(|stored| stored.record.location == location && &stored.record.id == id)
            .ok_or_else(not_found)?;
        state.backups.remove(position);
        Ok(())
    }

    async fn list_backups_of_app(
        &self,
        app: &AppKey,
        location: RepositoryLocation,
    ) -> BackupManagerResult<Vec<BackupRecord>> {
        Ok(self
            .visible(location)
            .await?
            .into_iter()
            .map(|stored| stored.record)
            .filter(|record| &record.app == app)
            .collect())
    }

    async fn restore_backup(
        &self,
        id: &BackupId,
        location: RepositoryLocation,
    ) -> BackupManagerResult<RestoredVersion> {
        let stored = self
            .visible(location)
            .await?
            .into_iter()
            .find(|stored| &stored.record.id == id)
            .ok_or_else(|| BackupManagerError::BackupNotFound {
                id: id.clone(),
                location,
            })?;
        let record = stored.record;

        let restored = NewApp {
            key: record.app.clone(),
            version: AppVersion::new(
                record.version_name.clone(),
                record.version_created_at,
                stored.content.clone(),
            )?,
            should_be_running: true,
        };
        let app_id = replace_app(self.ports.apps.as_ref(), &restored).await?;
        let app = self.ports.app(app_id).await?;
        self.ports.resume(&app).await?;

        Ok(RestoredVersion {
            app: record.app,
            version_name: record.version_name,
            content: stored.content,
        })
    }

    async fn list_apps_in_backup_repo(
        &self,
        location: RepositoryLocation,
    ) -> BackupManagerResult<Vec<AppKey>> {
        let mut apps: Vec<AppKey> = Vec::new();
        for stored in self.visible(location).await? {
            if !apps.contains(&stored.record.app) {
                apps.push(stored.record.app);
            }
        }
        Ok(apps)
    }

    async fn run_retention_policy(&self) -> BackupManagerResult<()> {
        let remote_enabled = self.ports.remote_target().await?.is_some();
        sweep_retention(self, self.limits, remote_enabled).await
    }

    async fn prune_app(&self, app_id: AppId) -> BackupManagerResult<()> {
        let app = self.ports.app(app_id).await?;
        if app.is_platform_database() {
            return Err(BackupManagerError::PlatformDatabaseProtected { operation: "prune" });
        }
        self.ports.lifecycle.stop_app(app_id).await?;
        self.ports.apps.delete(app_id).await?;
        Ok(())
    }

    async fn update_app_version(&self, app_id: AppId) -> BackupManagerResult<()> {
        update_app_version(self, &self.ports, app_id).await
    }

    async fn prepare_repository(&self) -> BackupManagerResult<()> {
        tracing::debug!("in-memory backup repository needs no preparation");
        Ok(())
    }
}
