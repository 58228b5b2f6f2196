//! Port contracts for snapshot storage, container cleanup, remote repository
//! settings and the backup manager capability set.

mod container;
mod manager;
mod remote;
mod snapshot_store;

pub use container::{ContainerRuntime, ContainerRuntimeError, ContainerRuntimeResult};
pub use manager::{BackupManager, BackupManagerError, BackupManagerResult, ErrorKind};
pub use remote::{RemoteRepositoryConfig, RemoteRepositorySettings, RemoteSettingsError};
pub use snapshot_store::{
    RepositoryTarget, Snapshot, SnapshotRequest, SnapshotStore, SnapshotStoreError,
    SnapshotStoreResult,
};
