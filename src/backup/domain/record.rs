//! Backup records and their classification.

use super::{BackupDomainError, BackupId};
use crate::app::domain::AppKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a backup was taken.
///
/// Manual backups are never removed by the retention sweep.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackupDescription {
    /// Requested explicitly by a user.
    Manual,
    /// Taken by the maintenance cycle or before an update.
    Auto,
    /// Free-form description supplied by the caller.
    Custom(String),
}

impl BackupDescription {
    /// Returns the tag value stored with the snapshot.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Manual => "manual-backup",
            Self::Auto => "auto-backup",
            Self::Custom(text) => text,
        }
    }

    /// Builds a caller-supplied description.
    ///
    /// # Errors
    ///
    /// Returns [`BackupDomainError::InvalidDescription`] when `text` contains
    /// a comma.
    pub fn custom(text: impl Into<String>) -> Result<Self, BackupDomainError> {
        let description = Self::from(text.into());
        description.validate()?;
        Ok(description)
    }

    /// Checks that the description survives as a single snapshot tag.
    ///
    /// Snapshot stores split tag lists on commas.
    ///
    /// # Errors
    ///
    /// Returns [`BackupDomainError::InvalidDescription`] for a custom text
    /// containing a comma.
    pub fn validate(&self) -> Result<(), BackupDomainError> {
        match self {
            Self::Custom(text) if text.contains(',') => {
                Err(BackupDomainError::InvalidDescription(text.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Returns whether the retention sweep must keep this backup.
    #[must_use]
    pub const fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

impl From<&str> for BackupDescription {
    fn from(value: &str) -> Self {
        match value {
            "manual-backup" => Self::Manual,
            "auto-backup" => Self::Auto,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl From<String> for BackupDescription {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<BackupDescription> for String {
    fn from(value: BackupDescription) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for BackupDescription {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One of the two independent backup repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryLocation {
    /// Repository on the node itself.
    Local,
    /// Repository reached over SSH.
    Remote,
}

impl RepositoryLocation {
    /// Maps the `is_local` flag used by API requests.
    #[must_use]
    pub const fn from_is_local(is_local: bool) -> Self {
        if is_local { Self::Local } else { Self::Remote }
    }

    /// Returns whether this is the local repository.
    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Local)
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for RepositoryLocation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Immutable metadata of one backup in one repository location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    /// Snapshot identifier.
    pub id: BackupId,
    /// App the backup was taken from.
    pub app: AppKey,
    /// Version installed when the backup was taken.
    pub version_name: String,
    /// Publication timestamp of that version.
    pub version_created_at: DateTime<Utc>,
    /// Why the backup was taken.
    pub description: BackupDescription,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
    /// Repository holding the snapshot.
    pub location: RepositoryLocation,
}

/// What a restore put back in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredVersion {
    /// Restored app.
    pub app: AppKey,
    /// Restored version name.
    pub version_name: String,
    /// Restored version archive.
    pub content: Vec<u8>,
}
