//! Snapshot store port.
//!
//! The store is a content-addressed repository of immutable snapshots that
//! can be queried by tag. The core never depends on how a concrete tool lays
//! out its repository or reaches the remote location.

use super::RemoteRepositoryConfig;
use crate::backup::domain::{BackupId, RepositoryLocation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for snapshot store operations.
pub type SnapshotStoreResult<T> = Result<T, SnapshotStoreError>;

/// Repository a snapshot operation addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryTarget {
    /// The repository on this node.
    Local,
    /// The remote repository with its connection details.
    Remote(RemoteRepositoryConfig),
}

impl RepositoryTarget {
    /// Returns which location this target points at.
    #[must_use]
    pub const fn location(&self) -> RepositoryLocation {
        match self {
            Self::Local => RepositoryLocation::Local,
            Self::Remote(_) => RepositoryLocation::Remote,
        }
    }
}

/// Payload of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    /// `key=value` tags attached to the snapshot.
    pub tags: Vec<String>,
    /// Named volumes captured alongside the archive.
    pub volumes: Vec<String>,
    /// File name of the packaged version archive.
    pub archive_name: String,
    /// Version archive bytes.
    pub archive: Vec<u8>,
}

/// One snapshot as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Store-assigned identifier.
    pub id: String,
    /// Creation time.
    pub time: DateTime<Utc>,
    /// Tags attached at creation.
    pub tags: Vec<String>,
}

/// Content-addressed snapshot repository.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Ensures the snapshot tooling is available on this node.
    async fn prepare_tooling(&self) -> SnapshotStoreResult<()>;

    /// Takes a snapshot in `target`.
    async fn create(
        &self,
        target: &RepositoryTarget,
        request: &SnapshotRequest,
    ) -> SnapshotStoreResult<()>;

    /// Lists snapshots carrying every tag in `tag_filter`, oldest first.
    ///
    /// An empty filter lists all snapshots.
    async fn list(
        &self,
        target: &RepositoryTarget,
        tag_filter: &[String],
    ) -> SnapshotStoreResult<Vec<Snapshot>>;

    /// Returns the snapshots matching `id`.
    async fn find(
        &self,
        target: &RepositoryTarget,
        id: &BackupId,
    ) -> SnapshotStoreResult<Vec<Snapshot>>;

    /// Returns the version archive stored in a snapshot.
    async fn restore_archive(
        &self,
        target: &RepositoryTarget,
        id: &BackupId,
    ) -> SnapshotStoreResult<Vec<u8>>;

    /// Recreates `volumes` from the snapshot content.
    async fn restore_volumes(
        &self,
        target: &RepositoryTarget,
        id: &BackupId,
        volumes: &[String],
    ) -> SnapshotStoreResult<()>;

    /// Removes a snapshot.
    async fn forget(&self, target: &RepositoryTarget, id: &BackupId) -> SnapshotStoreResult<()>;
}

/// Errors returned by snapshot store adapters.
#[derive(Debug, Clone, Error)]
pub enum SnapshotStoreError {
    /// The snapshot tool failed.
    #[error("snapshot tool failed: {0}")]
    Tool(Arc<dyn std::error::Error + Send + Sync>),

    /// The snapshot tool produced output that could not be parsed.
    #[error("unparsable snapshot tool output: {0}")]
    UnparsableOutput(String),

    /// The snapshot holds no version archive.
    #[error("snapshot {0} contains no version archive")]
    MissingArchive(BackupId),
}

impl SnapshotStoreError {
    /// Wraps a snapshot tool failure.
    pub fn tool(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Tool(Arc::new(err))
    }
}
