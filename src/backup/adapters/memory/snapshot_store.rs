//! In-memory snapshot store.

use crate::backup::{
    domain::{BackupId, RepositoryLocation},
    ports::{RepositoryTarget, Snapshot, SnapshotRequest, SnapshotStore, SnapshotStoreError, SnapshotStoreResult},
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Snapshot store double holding both repositories in process.
///
/// Identifiers are random 64-character hexadecimal strings, like those of a
/// content-addressed store. Tag filters match snapshots carrying every
/// filter tag.
#[derive(Debug, Clone)]
pub struct InMemorySnapshotStore<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
    state: Arc<RwLock<SnapshotState>>,
}

#[derive(Debug, Default)]
struct SnapshotState {
    snapshots: Vec<StoredSnapshot>,
    restored_volumes: Vec<String>,
    prepared: bool,
}

#[derive(Debug, Clone)]
struct StoredSnapshot {
    location: RepositoryLocation,
    snapshot: Snapshot,
    archive: Vec<u8>,
}

fn lock_error(err: impl ToString) -> SnapshotStoreError {
    SnapshotStoreError::tool(std::io::Error::other(err.to_string()))
}

impl<C> InMemorySnapshotStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store stamping snapshots with `clock`.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            clock,
            state: Arc::default(),
        }
    }

    /// Returns the volumes recreated by restores, in order.
    #[must_use]
    pub fn restored_volumes(&self) -> Vec<String> {
        self.state
            .read()
            .map(|state| state.restored_volumes.clone())
            .unwrap_or_default()
    }

    /// Returns whether [`SnapshotStore::prepare_tooling`] has run.
    #[must_use]
    pub fn is_prepared(&self) -> bool {
        self.state.read().is_ok_and(|state| state.prepared)
    }

    /// Stores a snapshot with an explicit identifier.
    ///
    /// Lets tests reproduce states a real store can reach, such as two
    /// snapshots sharing an identifier prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotStoreError::Tool`] when lock acquisition fails.
    pub fn insert(
        &self,
        location: RepositoryLocation,
        snapshot: Snapshot,
        archive: Vec<u8>,
    ) -> SnapshotStoreResult<()> {
        self.state.write().map_err(lock_error)?.snapshots.push(StoredSnapshot {
            location,
            snapshot,
            archive,
        });
        Ok(())
    }

    fn matching(
        &self,
        target: &RepositoryTarget,
        id: &BackupId,
    ) -> SnapshotStoreResult<Vec<StoredSnapshot>> {
        let location = target.location();
        Ok(self
            .state
            .read()
            .map_err(lock_error)?
            .snapshots
            .iter()
            .filter(|stored| stored.location == location && stored.snapshot.id == id.as_str())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<C> SnapshotStore for InMemorySnapshotStore<C>
where
    C: Clock + Send + Sync,
{
    async fn prepare_tooling(&self) -> SnapshotStoreResult<()> {
        self.state.write().map_err(lock_error)?.prepared = true;
        Ok(())
    }

    async fn create(
        &self,
        target: &RepositoryTarget,
        request: &SnapshotRequest,
    ) -> SnapshotStoreResult<()> {
        let snapshot = Snapshot {
            id: format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()),
            time: self.clock.utc(),
            tags: request.tags.clone(),
        };
        self.insert(target.location(), snapshot, request.archive.clone())
    }

    async fn list(
        &self,
        target: &RepositoryTarget,
        tag_filter: &[String],
    ) -> SnapshotStoreResult<Vec<Snapshot>> {
        let location = target.location();
        Ok(self
            .state
            .read()
            .map_err(lock_error)?
            .snapshots
            .iter()
            .filter(|stored| stored.location == location)
            .filter(|stored| tag_filter.iter().all(|tag| stored.snapshot.tags.contains(tag)))
            .map(|stored| stored.snapshot.clone())
            .collect())
    }

    async fn find(
        &self,
        target: &RepositoryTarget,
        id: &BackupId,
    ) -> SnapshotStoreResult<Vec<Snapshot>> {
        Ok(self
            .matching(target, id)?
            .into_iter()
            .map(|stored| stored.snapshot)
            .collect())
    }

    async fn restore_archive(
        &self,
        target: &RepositoryTarget,
        id: &BackupId,
    ) -> SnapshotStoreResult<Vec<u8>> {
        self.matching(target, id)?
            .into_iter()
            .next()
            .map(|stored| stored.archive)
            .ok_or_else(|| SnapshotStoreError::MissingArchive(id.clone()))
    }

    async fn restore_volumes(
        &self,
        _target: &RepositoryTarget,
        _id: &BackupId,
        volumes: &[String],
    ) -> SnapshotStoreResult<()> {
        self.state
            .write()
            .map_err(lock_error)?
            .restored_volumes
            .extend_from_slice(volumes);
        Ok(())
    }

    async fn forget(&self, target: &RepositoryTarget, id: &BackupId) -> SnapshotStoreResult<()> {
        let location = target.location();
        let mut state = self.state.write().map_err(lock_error)?;
        let before = state.snapshots.len();
        state
            .snapshots
            .retain(|stored| !(stored.location == location && stored.snapshot.id == id.as_str()));
        if state.snapshots.len() == before {
            return Err(SnapshotStoreError::tool(std::io::Error::other(format!(
                "no snapshot {id} in {location} repository"
            ))));
        }
        Ok(())
    }
}
