//! In-memory backup adapters for tests and local development.

mod container;
mod manager;
mod remote;
mod snapshot_store;

pub use container::{ContainerCall, InMemoryContainerRuntime};
pub use manager::InMemoryBackupManager;
pub use remote::InMemoryRemoteRepositorySettings;
pub use snapshot_store::InMemorySnapshotStore;
