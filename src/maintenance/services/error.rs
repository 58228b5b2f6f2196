//! Maintenance service errors.

use crate::app::ports::AppRepositoryError;
use crate::maintenance::{
    domain::MaintenanceDomainError,
    ports::{ConfigKey, ConfigStoreError},
};
use thiserror::Error;

/// Result type for maintenance services.
pub type MaintenanceResult<T> = Result<T, MaintenanceError>;

/// Errors returned by the maintenance services.
#[derive(Debug, Clone, Error)]
pub enum MaintenanceError {
    /// Submitted settings are invalid.
    #[error(transparent)]
    Domain(#[from] MaintenanceDomainError),

    /// The configuration store failed.
    #[error(transparent)]
    ConfigStore(#[from] ConfigStoreError),

    /// A setting was read before defaults were written.
    #[error("maintenance setting {0} is not initialized")]
    MissingSetting(ConfigKey),

    /// A persisted setting cannot be parsed.
    #[error("maintenance setting {key} holds an unreadable value '{value}'")]
    InvalidSetting {
        /// Offending entry.
        key: ConfigKey,
        /// Stored value.
        value: String,
    },

    /// Installed apps could not be listed.
    #[error(transparent)]
    Apps(#[from] AppRepositoryError),
}
