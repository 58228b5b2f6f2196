//! In-memory container lifecycle adapters.

use crate::app::{
    adapters::memory::InMemoryAppRepository,
    domain::AppId,
    ports::{
        AppLifecycle, AppLifecycleError, AppLifecycleResult, AppRepository, AppRepositoryError,
        PlatformDatabase,
    },
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

/// Lifecycle call observed by [`InMemoryAppLifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The app was started.
    Started(AppId),
    /// The app was stopped.
    Stopped(AppId),
}

/// Lifecycle adapter that only flips the desired run state in the app
/// repository and records every call.
#[derive(Debug, Clone)]
pub struct InMemoryAppLifecycle {
    apps: Arc<InMemoryAppRepository>,
    events: Arc<Mutex<Vec<LifecycleEvent>>>,
}

impl InMemoryAppLifecycle {
    /// Creates a lifecycle adapter backed by the given repository.
    #[must_use]
    pub fn new(apps: Arc<InMemoryAppRepository>) -> Self {
        Self {
            apps,
            events: Arc::default(),
        }
    }

    /// Returns every lifecycle call in order.
    #[must_use]
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn transition(&self, id: AppId, running: bool) -> AppLifecycleResult<()> {
        self.apps
            .set_should_be_running(id, running)
            .await
            .map_err(|err| match err {
                AppRepositoryError::NotFound(missing) => AppLifecycleError::UnknownApp(missing),
                other => AppLifecycleError::runtime(other),
            })?;
        let event = if running {
            LifecycleEvent::Started(id)
        } else {
            LifecycleEvent::Stopped(id)
        };
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

#[async_trait]
impl AppLifecycle for InMemoryAppLifecycle {
    async fn start_app(&self, id: AppId) -> AppLifecycleResult<()> {
        self.transition(id, true).await
    }

    async fn stop_app(&self, id: AppId) -> AppLifecycleResult<()> {
        self.transition(id, false).await
    }
}

/// Platform database adapter that counts reinitializations.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlatformDatabase {
    reinitializations: Arc<Mutex<usize>>,
}

impl InMemoryPlatformDatabase {
    /// Creates a database adapter with no recorded reinitializations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many times the database was reinitialized.
    #[must_use]
    pub fn reinitializations(&self) -> usize {
        *self
            .reinitializations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PlatformDatabase for InMemoryPlatformDatabase {
    async fn reinitialize(&self) -> AppLifecycleResult<()> {
        *self
            .reinitializations
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}
