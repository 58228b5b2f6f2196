//! Key/value configuration store port.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for configuration store operations.
pub type ConfigStoreResult<T> = Result<T, ConfigStoreError>;

/// Keys of the persisted maintenance entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    /// `"true"` when automatic backups are on.
    EnableAutoBackups,
    /// `"true"` when automatic updates are on.
    EnableAutoUpdates,
    /// Preferred UTC hour as a decimal integer.
    PreferredMaintenanceHour,
    /// RFC 3339 timestamp of the last cycle.
    LastMaintenanceCycleExecutionDate,
    /// `"true"` once defaults have been written.
    AreMaintenanceSettingsInitialized,
}

impl ConfigKey {
    /// Returns the persisted key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnableAutoBackups => "ENABLE_AUTO_BACKUPS",
            Self::EnableAutoUpdates => "ENABLE_AUTO_UPDATES",
            Self::PreferredMaintenanceHour => "PREFERRED_MAINTENANCE_HOUR",
            Self::LastMaintenanceCycleExecutionDate => "LAST_MAINTENANCE_CYCLE_EXECUTION_DATE",
            Self::AreMaintenanceSettingsInitialized => "ARE_MAINTENANCE_SETTINGS_INITIALIZED",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Persistent string entries keyed by [`ConfigKey`].
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Reads an entry, or `None` when it was never written.
    async fn get(&self, key: ConfigKey) -> ConfigStoreResult<Option<String>>;

    /// Writes an entry, replacing any previous value.
    async fn set(&self, key: ConfigKey, value: &str) -> ConfigStoreResult<()>;
}

/// Errors returned by configuration stores.
#[derive(Debug, Clone, Error)]
pub enum ConfigStoreError {
    /// Persistence-layer failure.
    #[error("configuration store error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConfigStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
