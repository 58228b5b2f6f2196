//! Remote repository settings port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Connection details of the remote backup repository.
///
/// Owned by the settings collaborator; the backup core only reads it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepositoryConfig {
    /// Whether backups are also written to the remote repository.
    pub enabled: bool,
    /// SSH host name.
    pub host: String,
    /// SSH port.
    pub ssh_port: u16,
    /// SSH user.
    pub ssh_user: String,
    /// SSH password.
    pub ssh_password: String,
    /// `known_hosts` entries trusted for the host.
    pub ssh_known_hosts: String,
    /// Passphrase encrypting the remote repository.
    pub encryption_password: String,
}

impl RemoteRepositoryConfig {
    /// Returns a configuration with the remote repository switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }
}

impl fmt::Debug for RemoteRepositoryConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RemoteRepositoryConfig")
            .field("enabled", &self.enabled)
            .field("host", &self.host)
            .field("ssh_port", &self.ssh_port)
            .field("ssh_user", &self.ssh_user)
            .field("ssh_password", &"<redacted>")
            .field("ssh_known_hosts", &self.ssh_known_hosts)
            .field("encryption_password", &"<redacted>")
            .finish()
    }
}

/// Read access to the remote repository settings.
#[async_trait]
pub trait RemoteRepositorySettings: Send + Sync {
    /// Returns the current remote repository configuration.
    async fn remote_repository(&self) -> Result<RemoteRepositoryConfig, RemoteSettingsError>;
}

/// Errors returned by remote settings providers.
#[derive(Debug, Clone, Error)]
pub enum RemoteSettingsError {
    /// The settings could not be read.
    #[error("remote repository settings unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl RemoteSettingsError {
    /// Wraps a settings lookup failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
