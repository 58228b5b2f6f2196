//! The backup manager capability set.

use super::{ContainerRuntimeError, RemoteSettingsError, SnapshotStoreError};
use crate::app::{
    domain::{AppDomainError, AppId, AppKey},
    ports::{AppLifecycleError, AppRepositoryError, AppStoreError},
};
use crate::backup::domain::{
    BackupDescription, BackupDomainError, BackupId, BackupRecord, RepositoryLocation,
    RestoredVersion,
};
use crate::coordinator::OperationBusyError;
use async_trait::async_trait;
use thiserror::Error;

/// Result type for backup manager operations.
pub type BackupManagerResult<T> = Result<T, BackupManagerError>;

/// Backup lifecycle across the local and remote repositories.
///
/// Implementations must agree on every externally observable query and
/// filter result so that callers and tests are implementation-agnostic.
/// None of these methods acquire the operation coordinator; callers that
/// mutate state hold it.
#[async_trait]
pub trait BackupManager: Send + Sync {
    /// Backs up an installed app to the local repository, and to the remote
    /// one when it is enabled.
    async fn create_backup(
        &self,
        app_id: AppId,
        description: BackupDescription,
    ) -> BackupManagerResult<()>;

    /// Removes one backup from a repository.
    ///
    /// # Errors
    ///
    /// Returns [`BackupManagerError::BackupNotFound`] when `location` holds
    /// no backup with that identifier.
    async fn delete_backup(
        &self,
        id: &BackupId,
        location: RepositoryLocation,
    ) -> BackupManagerResult<()>;

    /// Lists the backups of an app in one repository.
    ///
    /// Listing the remote repository while it is disabled yields an empty
    /// list.
    async fn list_backups_of_app(
        &self,
        app: &AppKey,
        location: RepositoryLocation,
    ) -> BackupManagerResult<Vec<BackupRecord>>;

    /// Restores a backup, replacing any installed app with the same key.
    async fn restore_backup(
        &self,
        id: &BackupId,
        location: RepositoryLocation,
    ) -> BackupManagerResult<RestoredVersion>;

    /// Lists the distinct apps with backups in a repository, in first-seen
    /// order.
    async fn list_apps_in_backup_repo(
        &self,
        location: RepositoryLocation,
    ) -> BackupManagerResult<Vec<AppKey>>;

    /// Deletes every non-manual backup the retention policy does not keep.
    async fn run_retention_policy(&self) -> BackupManagerResult<()>;

    /// Removes an app with its network and volumes. Its backups remain.
    async fn prune_app(&self, app_id: AppId) -> BackupManagerResult<()>;

    /// Updates an app to the newest store version behind a safety backup.
    async fn update_app_version(&self, app_id: AppId) -> BackupManagerResult<()>;

    /// Ensures the snapshot tooling is ready.
    async fn prepare_repository(&self) -> BackupManagerResult<()>;
}

/// Caller-facing classification of a [`BackupManagerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Another app operation holds the coordinator.
    Busy,
    /// An app, backup or version is absent.
    NotFound,
    /// Input was rejected.
    Validation,
    /// The snapshot or container tool failed or produced unparsable output.
    ExternalToolFailure,
    /// No newer version exists.
    AlreadyUpToDate,
    /// The request references inconsistent or duplicate state.
    Conflict,
    /// Any other failure.
    Internal,
}

/// Errors returned by backup manager operations.
#[derive(Debug, Clone, Error)]
pub enum BackupManagerError {
    /// Another app operation holds the coordinator.
    #[error(transparent)]
    Busy(#[from] OperationBusyError),

    /// No app exists with the identifier.
    #[error("app {0} not found")]
    AppNotFound(AppId),

    /// The repository holds no backup with the identifier.
    #[error("backup {id} not found in {location} repository")]
    BackupNotFound {
        /// Requested backup.
        id: BackupId,
        /// Repository searched.
        location: RepositoryLocation,
    },

    /// The app store lists no versions for the app.
    #[error("no versions found for app {0}")]
    NoVersionsAvailable(AppId),

    /// The installed version is the newest available.
    #[error("can't update app '{app}': version '{version}' is already up to date")]
    AlreadyUpToDate {
        /// App that was asked to update.
        app: AppKey,
        /// Installed version name.
        version: String,
    },

    /// More than one snapshot matched a backup identifier.
    #[error("expected exactly one snapshot for backup {id}, found {count}")]
    AmbiguousSnapshot {
        /// Requested backup.
        id: BackupId,
        /// Number of matches.
        count: usize,
    },

    /// The operation is not allowed on the platform database app.
    #[error("cannot {operation} the platform database app")]
    PlatformDatabaseProtected {
        /// Refused operation.
        operation: &'static str,
    },

    /// Backup domain validation or parsing failed.
    #[error(transparent)]
    Domain(#[from] BackupDomainError),

    /// App domain validation failed.
    #[error(transparent)]
    AppDomain(#[from] AppDomainError),

    /// App repository failure.
    #[error(transparent)]
    AppRepository(#[from] AppRepositoryError),

    /// Container lifecycle failure.
    #[error(transparent)]
    AppLifecycle(#[from] AppLifecycleError),

    /// App store failure.
    #[error(transparent)]
    AppStore(#[from] AppStoreError),

    /// Snapshot store failure.
    #[error(transparent)]
    Snapshot(#[from] SnapshotStoreError),

    /// Container runtime failure.
    #[error(transparent)]
    Container(#[from] ContainerRuntimeError),

    /// Remote settings lookup failure.
    #[error(transparent)]
    RemoteSettings(#[from] RemoteSettingsError),
}

impl BackupManagerError {
    /// Classifies the error for callers that map failures to responses.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Busy(_) => ErrorKind::Busy,
            Self::AppNotFound(_)
            | Self::BackupNotFound { .. }
            | Self::NoVersionsAvailable(_)
            | Self::AppRepository(AppRepositoryError::NotFound(_))
            | Self::AppLifecycle(AppLifecycleError::UnknownApp(_))
            | Self::AppStore(AppStoreError::VersionNotFound(_)) => ErrorKind::NotFound,
            Self::AlreadyUpToDate { .. } => ErrorKind::AlreadyUpToDate,
            Self::AmbiguousSnapshot { .. }
            | Self::AppRepository(AppRepositoryError::DuplicateApp(_)) => ErrorKind::Conflict,
            Self::PlatformDatabaseProtected { .. } | Self::Domain(_) | Self::AppDomain(_) => {
                ErrorKind::Validation
            }
            Self::AppLifecycle(AppLifecycleError::Runtime(_))
            | Self::AppStore(AppStoreError::Request(_))
            | Self::Snapshot(_)
            | Self::Container(_) => ErrorKind::ExternalToolFailure,
            Self::AppRepository(AppRepositoryError::Persistence(_)) | Self::RemoteSettings(_) => {
                ErrorKind::Internal
            }
        }
    }
}
