//! Repository port for installed app records.

use crate::app::domain::{AppId, AppKey, AppRecord, AppVersion, NewApp};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for app repository operations.
pub type AppRepositoryResult<T> = Result<T, AppRepositoryError>;

/// Persistence contract for installed apps.
///
/// `(maintainer, app name)` is unique among stored records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppRepository: Send + Sync {
    /// Finds an app by identifier.
    async fn find_by_id(&self, id: AppId) -> AppRepositoryResult<Option<AppRecord>>;

    /// Finds an app by maintainer and app name.
    async fn find_by_key(&self, key: &AppKey) -> AppRepositoryResult<Option<AppRecord>>;

    /// Returns all installed apps.
    async fn list_all(&self) -> AppRepositoryResult<Vec<AppRecord>>;

    /// Inserts a new app and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppRepositoryError::DuplicateApp`] when an app with the same
    /// key is already installed.
    async fn create(&self, app: &NewApp) -> AppRepositoryResult<AppId>;

    /// Replaces the installed version of an app.
    ///
    /// # Errors
    ///
    /// Returns [`AppRepositoryError::NotFound`] when the app does not exist.
    async fn update_version(&self, id: AppId, version: &AppVersion) -> AppRepositoryResult<()>;

    /// Persists the desired run state of an app.
    ///
    /// # Errors
    ///
    /// Returns [`AppRepositoryError::NotFound`] when the app does not exist.
    async fn set_should_be_running(&self, id: AppId, should_be_running: bool)
    -> AppRepositoryResult<()>;

    /// Deletes an app record.
    ///
    /// # Errors
    ///
    /// Returns [`AppRepositoryError::NotFound`] when the app does not exist.
    async fn delete(&self, id: AppId) -> AppRepositoryResult<()>;
}

/// Errors returned by app repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AppRepositoryError {
    /// No app exists with the identifier.
    #[error("app not found: {0}")]
    NotFound(AppId),

    /// An app with the same maintainer and name is already installed.
    #[error("app already installed: {0}")]
    DuplicateApp(AppKey),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AppRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
