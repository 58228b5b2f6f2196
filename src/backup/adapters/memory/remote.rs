//! In-memory remote repository settings.

use crate::backup::ports::{RemoteRepositoryConfig, RemoteRepositorySettings, RemoteSettingsError};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Settings provider holding one mutable remote repository configuration.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemoteRepositorySettings {
    config: Arc<RwLock<RemoteRepositoryConfig>>,
}

impl InMemoryRemoteRepositorySettings {
    /// Creates a provider serving `config`.
    #[must_use]
    pub fn new(config: RemoteRepositoryConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Creates a provider with the remote repository disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Replaces the served configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteSettingsError::Unavailable`] when lock acquisition
    /// fails.
    pub fn set(&self, config: RemoteRepositoryConfig) -> Result<(), RemoteSettingsError> {
        let mut current = self
            .config
            .write()
            .map_err(|err| RemoteSettingsError::unavailable(std::io::Error::other(err.to_string())))?;
        *current = config;
        Ok(())
    }
}

#[async_trait]
impl RemoteRepositorySettings for InMemoryRemoteRepositorySettings {
    async fn remote_repository(&self) -> Result<RemoteRepositoryConfig, RemoteSettingsError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|err| RemoteSettingsError::unavailable(std::io::Error::other(err.to_string())))
    }
}
