//! In-memory repository for installed apps.

use crate::app::{
    domain::{AppId, AppKey, AppRecord, AppVersion, NewApp},
    ports::{AppRepository, AppRepositoryError, AppRepositoryResult},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory app repository.
///
/// Identifiers are assigned sequentially starting at 1 and never reused.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAppRepository {
    state: Arc<RwLock<InMemoryAppState>>,
}

#[derive(Debug, Default)]
struct InMemoryAppState {
    apps: BTreeMap<AppId, AppRecord>,
    last_id: i64,
}

impl InMemoryAppRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write_state(&self) -> AppRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryAppState>> {
        self.state
            .write()
            .map_err(|err| AppRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn read_state(&self) -> AppRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryAppState>> {
        self.state
            .read()
            .map_err(|err| AppRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl AppRepository for InMemoryAppRepository {
    async fn find_by_id(&self, id: AppId) -> AppRepositoryResult<Option<AppRecord>> {
        Ok(self.read_state()?.apps.get(&id).cloned())
    }

    async fn find_by_key(&self, key: &AppKey) -> AppRepositoryResult<Option<AppRecord>> {
        let state = self.read_state()?;
        Ok(state.apps.values().find(|app| app.key() == key).cloned())
    }

    async fn list_all(&self) -> AppRepositoryResult<Vec<AppRecord>> {
        Ok(self.read_state()?.apps.values().cloned().collect())
    }

    async fn create(&self, app: &NewApp) -> AppRepositoryResult<AppId> {
        let mut state = self.write_state()?;
        if state.apps.values().any(|existing| existing.key() == &app.key) {
            return Err(AppRepositoryError::DuplicateApp(app.key.clone()));
        }
        state.last_id += 1;
        let id = AppId::new(state.last_id);
        state.apps.insert(id, AppRecord::from_new(id, app.clone()));
        Ok(id)
    }

    async fn update_version(&self, id: AppId, version: &AppVersion) -> AppRepositoryResult<()> {
        let mut state = self.write_state()?;
        let app = state
            .apps
            .get_mut(&id)
            .ok_or(AppRepositoryError::NotFound(id))?;
        app.replace_version(version.clone());
        Ok(())
    }

    async fn set_should_be_running(
        &self,
        id: AppId,
        should_be_running: bool,
    ) -> AppRepositoryResult<()> {
        let mut state = self.write_state()?;
        let app = state
            .apps
            .get_mut(&id)
            .ok_or(AppRepositoryError::NotFound(id))?;
        app.set_should_be_running(should_be_running);
        Ok(())
    }

    async fn delete(&self, id: AppId) -> AppRepositoryResult<()> {
        let mut state = self.write_state()?;
        state
            .apps
            .remove(&id)
            .map(|_| ())
            .ok_or(AppRepositoryError::NotFound(id))
    }
}
