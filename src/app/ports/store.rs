//! App store client port.

use crate::app::domain::{AppId, AppKey, AppVersion};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for app store operations.
pub type AppStoreResult<T> = Result<T, AppStoreError>;

/// Version metadata published by the app store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreVersion {
    /// Store-side version identifier used for downloads.
    pub id: String,
    /// Version name.
    pub name: String,
    /// Publication timestamp.
    pub created_at: DateTime<Utc>,
}

/// A downloaded version with the app it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedVersion {
    /// Maintainer and app name.
    pub key: AppKey,
    /// Version payload.
    pub version: AppVersion,
}

/// Read access to the remote app store.
#[async_trait]
pub trait AppStoreClient: Send + Sync {
    /// Lists every version the store knows for an installed app.
    async fn versions(&self, app_id: AppId) -> AppStoreResult<Vec<StoreVersion>>;

    /// Downloads the archive of a version.
    async fn download_version(&self, version_id: &str) -> AppStoreResult<DownloadedVersion>;
}

/// Errors returned by app store clients.
#[derive(Debug, Clone, Error)]
pub enum AppStoreError {
    /// The store has no such version.
    #[error("version not found in app store: {0}")]
    VersionNotFound(String),

    /// The store could not be reached or answered with an error.
    #[error("app store request failed: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync>),
}

impl AppStoreError {
    /// Wraps a transport failure.
    pub fn request(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Request(Arc::new(err))
    }
}
