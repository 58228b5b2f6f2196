//! In-memory app store catalog.

use crate::app::{
    adapters::memory::InMemoryAppRepository,
    domain::{AppId, AppKey, AppVersion},
    ports::{AppRepository, AppStoreClient, AppStoreError, AppStoreResult, DownloadedVersion, StoreVersion},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// App store double that serves versions published through
/// [`InMemoryAppStore::publish`].
///
/// Installed apps are matched to catalog entries by maintainer and app name,
/// so catalog lookups keep working after an app is reinstalled under a new
/// identifier.
#[derive(Debug, Clone)]
pub struct InMemoryAppStore {
    apps: Arc<InMemoryAppRepository>,
    catalog: Arc<RwLock<Vec<CatalogEntry>>>,
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    id: String,
    key: AppKey,
    version: AppVersion,
}

impl InMemoryAppStore {
    /// Creates an empty store resolving app identifiers through `apps`.
    #[must_use]
    pub fn new(apps: Arc<InMemoryAppRepository>) -> Self {
        Self {
            apps,
            catalog: Arc::default(),
        }
    }

    /// Publishes a version under a store-side identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppStoreError::Request`] when lock acquisition fails.
    pub fn publish(
        &self,
        version_id: impl Into<String>,
        key: AppKey,
        version: AppVersion,
    ) -> AppStoreResult<()> {
        let mut catalog = self
            .catalog
            .write()
            .map_err(|err| AppStoreError::request(std::io::Error::other(err.to_string())))?;
        catalog.push(CatalogEntry {
            id: version_id.into(),
            key,
            version,
        });
        Ok(())
    }
}

#[async_trait]
impl AppStoreClient for InMemoryAppStore {
    async fn versions(&self, app_id: AppId) -> AppStoreResult<Vec<StoreVersion>> {
        let app = self
            .apps
            .find_by_id(app_id)
            .await
            .map_err(AppStoreError::request)?
            .ok_or_else(|| AppStoreError::VersionNotFound(format!("app {app_id}")))?;
        let catalog = self
            .catalog
            .read()
            .map_err(|err| AppStoreError::request(std::io::Error::other(err.to_string())))?;
        Ok(catalog
            .iter()
            .filter(|entry| &entry.key == app.key())
            .map(|entry| StoreVersion {
                id: entry.id.clone(),
                name: entry.version.name().to_owned(),
                created_at: entry.version.created_at(),
            })
            .collect())
    }

    async fn download_version(&self, version_id: &str) -> AppStoreResult<DownloadedVersion> {
        let catalog = self
            .catalog
            .read()
            .map_err(|err| AppStoreError::request(std::io::Error::other(err.to_string())))?;
        catalog
            .iter()
            .find(|entry| entry.id == version_id)
            .map(|entry| DownloadedVersion {
                key: entry.key.clone(),
                version: entry.version.clone(),
            })
            .ok_or_else(|| AppStoreError::VersionNotFound(version_id.to_owned()))
    }
}
