//! Error types for backup domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or parsing backup domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackupDomainError {
    /// The backup identifier is not 64 lowercase hexadecimal characters.
    #[error("invalid backup id '{0}', expected 64 hexadecimal characters")]
    InvalidBackupId(String),

    /// A snapshot is missing one of the five backup tags.
    #[error("snapshot tag '{0}' is missing")]
    MissingTag(&'static str),

    /// A snapshot tag value failed validation.
    #[error("snapshot tag '{tag}' is invalid: {reason}")]
    InvalidTag {
        /// Tag key.
        tag: &'static str,
        /// Validation failure.
        reason: String,
    },

    /// A custom backup description contains a comma.
    #[error("backup description '{0}' must not contain ','")]
    InvalidDescription(String),

    /// A timestamp is not valid RFC 3339.
    #[error("invalid timestamp '{0}', expected RFC 3339")]
    InvalidTimestamp(String),

    /// The version archive could not be read.
    #[error("invalid version archive: {0}")]
    InvalidArchive(String),

    /// The deployment descriptor inside the archive could not be parsed.
    #[error("invalid deployment descriptor: {0}")]
    InvalidDescriptor(String),
}
