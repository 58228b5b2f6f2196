//! Backup identifier.

use super::BackupDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a snapshot identifier in hexadecimal characters.
const BACKUP_ID_LENGTH: usize = 64;

/// Opaque snapshot identifier, unique within one repository location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackupId(String);

impl BackupId {
    /// Creates a validated backup identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BackupDomainError::InvalidBackupId`] unless the value is
    /// exactly 64 lowercase hexadecimal characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BackupDomainError> {
        let raw = value.into();
        let is_valid = raw.len() == BACKUP_ID_LENGTH
            && raw
                .chars()
                .all(|character| character.is_ascii_digit() || matches!(character, 'a'..='f'));
        if !is_valid {
            return Err(BackupDomainError::InvalidBackupId(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BackupId {
    type Error = BackupDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BackupId> for String {
    fn from(value: BackupId) -> Self {
        value.0
    }
}

impl AsRef<str> for BackupId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BackupId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
