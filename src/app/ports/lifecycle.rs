//! Container lifecycle ports for installed apps.

use crate::app::domain::AppId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for app lifecycle operations.
pub type AppLifecycleResult<T> = Result<T, AppLifecycleError>;

/// Starts and stops app containers.
///
/// Both operations are opaque to the backup core and update the app's
/// desired run state as a side effect.
#[async_trait]
pub trait AppLifecycle: Send + Sync {
    /// Starts the app.
    async fn start_app(&self, id: AppId) -> AppLifecycleResult<()>;

    /// Stops the app.
    async fn stop_app(&self, id: AppId) -> AppLifecycleResult<()>;
}

/// Control over the platform's own database app.
#[async_trait]
pub trait PlatformDatabase: Send + Sync {
    /// Reinitializes the database after its volumes were snapshotted or
    /// restored.
    async fn reinitialize(&self) -> AppLifecycleResult<()>;
}

/// Errors returned by lifecycle adapters.
#[derive(Debug, Clone, Error)]
pub enum AppLifecycleError {
    /// The app is unknown to the container manager.
    #[error("app {0} is not known to the container manager")]
    UnknownApp(AppId),

    /// The container tool failed.
    #[error("container lifecycle failure: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl AppLifecycleError {
    /// Wraps a container tool failure.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
