//! Backup manager backed by a snapshot store and a container runtime.

use super::{PlatformPorts, sweep_retention, update_app_version};
use crate::app::{
    domain::{AppId, AppKey, AppRecord, AppVersion, NewApp},
    services::replace_app,
};
use crate::backup::{
    domain::{
        BackupDescription, BackupDomainError, BackupId, BackupRecord, RepositoryLocation,
        RestoredVersion, RetentionLimits, SnapshotTags, declared_volumes,
    },
    ports::{
        BackupManager, BackupManagerError, BackupManagerResult, ContainerRuntime,
        RepositoryTarget, Snapshot, SnapshotRequest, SnapshotStore,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

/// [`BackupManager`] that persists backups as tagged snapshots.
#[derive(Clone)]
pub struct SnapshotBackupManager<S, C>
where
    S: SnapshotStore,
    C: ContainerRuntime,
{
    ports: PlatformPorts,
    snapshots: Arc<S>,
    containers: Arc<C>,
    limits: RetentionLimits,
}

impl<S, C> SnapshotBackupManager<S, C>
where
    S: SnapshotStore,
    C: ContainerRuntime,
{
    /// Creates a manager over the given collaborators.
    #[must_use]
    pub const fn new(
        ports: PlatformPorts,
        snapshots: Arc<S>,
        containers: Arc<C>,
        limits: RetentionLimits,
    ) -> Self {
        Self {
            ports,
            snapshots,
            containers,
            limits,
        }
    }

    async fn snapshot_to(
        &self,
        target: &RepositoryTarget,
        app: &AppRecord,
        request: &SnapshotRequest,
    ) -> BackupManagerResult<()> {
        self.ports.lifecycle.stop_app(app.id()).await?;
        let created = self.snapshots.create(target, request).await;
        let resumed = self.ports.resume(app).await;
        created?;
        resumed?;
        tracing::info!(app = %app.key(), location = %target.location(), "backup created");
        Ok(())
    }

    async fn required_target(
        &self,
        id: &BackupId,
        location: RepositoryLocation,
    ) -> BackupManagerResult<RepositoryTarget> {
        self.ports
            .target_for(location)
            .await?
            .ok_or_else(|| BackupManagerError::BackupNotFound {
                id: id.clone(),
                location,
            })
    }

    async fn clear_volumes(&self, volumes: &[String]) {
        for volume in volumes {
            if let Err(err) = self.containers.remove_containers_using_volume(volume).await {
                tracing::warn!(volume, error = %err, "could not remove containers using volume");
            }
            if let Err(err) = self.containers.remove_volume(volume).await {
                tracing::warn!(volume, error = %err, "could not remove volume");
            }
        }
    }
}

fn to_record(
    snapshot: Snapshot,
    location: RepositoryLocation,
) -> Result<BackupRecord, BackupDomainError> {
    let tags = SnapshotTags::parse(&snapshot.tags)?;
    Ok(BackupRecord {
        id: BackupId::new(snapshot.id)?,
        app: tags.app,
        version_name: tags.version_name,
        version_created_at: tags.version_created_at,
        description: tags.description,
        created_at: snapshot.time,
        location,
    })
}

#[async_trait]
impl<S, C> BackupManager for SnapshotBackupManager<S, C>
where
    S: SnapshotStore + 'static,
    C: ContainerRuntime + 'static,
{
    async fn create_backup(
        &self,
        app_id: AppId,
        description: BackupDescription,
    ) -> BackupManagerResult<()> {
        description.validate()?;
        let app = self.ports.app(app_id).await?;
        let version = app.version();
        let request = SnapshotRequest {
            tags: SnapshotTags {
                app: app.key().clone(),
                version_name: version.name().to_owned(),
                version_created_at: version.created_at(),
                description,
            }
            .to_tags(),
            volumes: declared_volumes(version.content())?,
            archive_name: format!("{}.zip", version.name()),
            archive: version.content().to_vec(),
        };

        self.snapshot_to(&RepositoryTarget::Local, &app, &request)
            .await?;
        if let Some(remote) = self.ports.remote_target().await? {
            self.snapshot_to(&remote, &app, &request).await?;
        }
        Ok(())
    }

    async fn delete_backup(
        &self,
        id: &BackupId,
        location: RepositoryLocation,
    ) -> BackupManagerResult<()> {
        let target = self.required_target(id, location).await?;
        if self.snapshots.find(&target, id).await?.is_empty() {
            return Err(BackupManagerError::BackupNotFound {
                id: id.clone(),
                location,
            });
        }
        self.snapshots.forget(&target, id).await?;
        tracing::info!(backup = %id, %location, "backup deleted");
        Ok(())
    }

    async fn list_backups_of_app(
        &self,
        app: &AppKey,
        location: RepositoryLocation,
    ) -> BackupManagerResult<Vec<BackupRecord>> {
        let Some(target) = self.ports.target_for(location).await? else {
            tracing::info!("remote backup repository is disabled; nothing to list");
            return Ok(Vec::new());
        };
        let snapshots = self
            .snapshots
            .list(&target, &SnapshotTags::filter_for(app))
            .await?;
        let mut records = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let record = to_record(snapshot, location)?;
            if &record.app == app {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn restore_backup(
        &self,
        id: &BackupId,
        location: RepositoryLocation,
    ) -> BackupManagerResult<RestoredVersion> {
        let target = self.required_target(id, location).await?;
        let mut matches = self.snapshots.find(&target, id).await?;
        let snapshot = match (matches.pop(), matches.len()) {
            (Some(snapshot), 0) => snapshot,
            (None, _) => {
                return Err(BackupManagerError::BackupNotFound {
                    id: id.clone(),
                    location,
                });
            }
            (Some(_), remaining) => {
                return Err(BackupManagerError::AmbiguousSnapshot {
                    id: id.clone(),
                    count: remaining + 1,
                });
            }
        };
        let record = to_record(snapshot, location)?;

        let archive = self.snapshots.restore_archive(&target, id).await?;
        let volumes = declared_volumes(&archive)?;
        self.clear_volumes(&volumes).await;
        self.snapshots.restore_volumes(&target, id, &volumes).await?;

        let restored = NewApp {
            key: record.app.clone(),
            version: AppVersion::new(
                record.version_name.clone(),
                record.version_created_at,
                archive.clone(),
            )?,
            should_be_running: true,
        };
        let app_id = replace_app(self.ports.apps.as_ref(), &restored).await?;
        let app = self.ports.app(app_id).await?;
        self.ports.resume(&app).await?;
        tracing::info!(backup = %id, app = %record.app, %location, "backup restored");

        Ok(RestoredVersion {
            app: record.app,
            version_name: record.version_name,
            content: archive,
        })
    }

    async fn list_apps_in_backup_repo(
        &self,
        location: RepositoryLocation,
    ) -> BackupManagerResult<Vec<AppKey>> {
        let Some(target) = self.ports.target_for(location).await? else {
            return Ok(Vec::new());
        };
        let mut apps: Vec<AppKey> = Vec::new();
        for snapshot in self.snapshots.list(&target, &[]).await? {
            let app = SnapshotTags::parse(&snapshot.tags)?.app;
            if !apps.contains(&app) {
                apps.push(app);
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
        let prefix = app.key().resource_prefix();
        self.containers.remove_network(&prefix).await?;
        self.containers
            .remove_volumes_with_prefix(&format!("{prefix}_"))
            .await?;
        self.ports.apps.delete(app_id).await?;
        tracing::info!(app = %app.key(), "app pruned");
        Ok(())
    }

    async fn update_app_version(&self, app_id: AppId) -> BackupManagerResult<()> {
        update_app_version(self, &self.ports, app_id).await
    }

    async fn prepare_repository(&self) -> BackupManagerResult<()> {
        self.snapshots.prepare_tooling().await?;
        Ok(())
    }
}
