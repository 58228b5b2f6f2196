//! Container runtime port used to clear app resources.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for container runtime operations.
pub type ContainerRuntimeResult<T> = Result<T, ContainerRuntimeError>;

/// Removal of containers, volumes and networks owned by apps.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Force-removes every container that mounts `volume`.
    async fn remove_containers_using_volume(&self, volume: &str) -> ContainerRuntimeResult<()>;

    /// Removes a named volume.
    async fn remove_volume(&self, volume: &str) -> ContainerRuntimeResult<()>;

    /// Disconnects and removes a network. A missing network is not an error.
    async fn remove_network(&self, network: &str) -> ContainerRuntimeResult<()>;

    /// Removes every volume whose name starts with `prefix`.
    async fn remove_volumes_with_prefix(&self, prefix: &str) -> ContainerRuntimeResult<()>;
}

/// Errors returned by container runtime adapters.
#[derive(Debug, Clone, Error)]
pub enum ContainerRuntimeError {
    /// The container tool failed.
    #[error("container tool failed: {0}")]
    Tool(Arc<dyn std::error::Error + Send + Sync>),
}

impl ContainerRuntimeError {
    /// Wraps a container tool failure.
    pub fn tool(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Tool(Arc::new(err))
    }
}
