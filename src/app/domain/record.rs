//! Installed app record and version payload.

use super::{AppDomainError, AppId, AppKey, ids::reject_separator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maintainer of the platform's own database app.
pub const PLATFORM_DATABASE_MAINTAINER: &str = "hangar";

/// Name of the platform's own database app.
pub const PLATFORM_DATABASE_APP: &str = "hangardb";

/// One published version of an app together with its archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppVersion {
    name: String,
    created_at: DateTime<Utc>,
    content: Vec<u8>,
}

impl AppVersion {
    /// Creates a version from its name, publication timestamp and archive.
    ///
    /// # Errors
    ///
    /// Returns [`AppDomainError::EmptyVersionName`] when the name is blank and
    /// [`AppDomainError::Comma`] when it contains a comma.
    pub fn new(
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        content: Vec<u8>,
    ) -> Result<Self, AppDomainError> {
        let normalized = name.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(AppDomainError::EmptyVersionName);
        }
        Ok(Self {
            name: reject_separator("version name", normalized)?,
            created_at,
            content,
        })
    }

    /// Returns the version name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns when the version was published.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the zipped version archive.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// App data to be inserted into the app repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApp {
    /// Maintainer and app name.
    pub key: AppKey,
    /// Installed version.
    pub version: AppVersion,
    /// Whether the app should be running after insertion.
    pub should_be_running: bool,
}

/// Installed app as stored in the app repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    id: AppId,
    key: AppKey,
    version: AppVersion,
    should_be_running: bool,
}

impl AppRecord {
    /// Builds the stored record for a newly inserted app.
    #[must_use]
    pub fn from_new(id: AppId, app: NewApp) -> Self {
        Self {
            id,
            key: app.key,
            version: app.version,
            should_be_running: app.should_be_running,
        }
    }

    /// Returns the app identifier.
    #[must_use]
    pub const fn id(&self) -> AppId {
        self.id
    }

    /// Returns the maintainer and app name.
    #[must_use]
    pub const fn key(&self) -> &AppKey {
        &self.key
    }

    /// Returns the installed version.
    #[must_use]
    pub const fn version(&self) -> &AppVersion {
        &self.version
    }

    /// Returns whether the app should currently be running.
    #[must_use]
    pub const fn should_be_running(&self) -> bool {
        self.should_be_running
    }

    /// Returns whether this is the platform's own database app.
    ///
    /// The database app is never pruned or auto-updated, and is reinitialized
    /// rather than restarted after a backup or restore.
    #[must_use]
    pub fn is_platform_database(&self) -> bool {
        self.key.maintainer() == PLATFORM_DATABASE_MAINTAINER
            && self.key.app_name() == PLATFORM_DATABASE_APP
    }

    /// Replaces the installed version, keeping the identifier.
    pub fn replace_version(&mut self, version: AppVersion) {
        self.version = version;
    }

    /// Updates the desired run state.
    pub const fn set_should_be_running(&mut self, should_be_running: bool) {
        self.should_be_running = should_be_running;
    }
}
