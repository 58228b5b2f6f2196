//! In-memory configuration store.

use crate::maintenance::ports::{ConfigKey, ConfigStore, ConfigStoreError, ConfigStoreResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory [`ConfigStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    entries: Arc<RwLock<BTreeMap<ConfigKey, String>>>,
}

impl InMemoryConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ConfigStoreError {
    ConfigStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self, key: ConfigKey) -> ConfigStoreResult<Option<String>> {
        Ok(self.entries.read().map_err(lock_error)?.get(&key).cloned())
    }

    async fn set(&self, key: ConfigKey, value: &str) -> ConfigStoreResult<()> {
        self.entries
            .write()
            .map_err(lock_error)?
            .insert(key, value.to_owned());
        Ok(())
    }
}
