//! Recording container runtime.

use crate::backup::ports::{ContainerRuntime, ContainerRuntimeResult};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

/// Container runtime call observed by [`InMemoryContainerRuntime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerCall {
    /// Containers mounting the volume were removed.
    RemoveContainersUsing(String),
    /// The volume was removed.
    RemoveVolume(String),
    /// The network was removed.
    RemoveNetwork(String),
    /// Volumes with the prefix were removed.
    RemoveVolumesWithPrefix(String),
}

/// Container runtime that only records calls.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContainerRuntime {
    calls: Arc<Mutex<Vec<ContainerCall>>>,
}

impl InMemoryContainerRuntime {
    /// Creates a runtime with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every call in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ContainerCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: ContainerCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

#[async_trait]
impl ContainerRuntime for InMemoryContainerRuntime {
    async fn remove_containers_using_volume(&self, volume: &str) -> ContainerRuntimeResult<()> {
        self.record(ContainerCall::RemoveContainersUsing(volume.to_owned()));
        Ok(())
    }

    async fn remove_volume(&self, volume: &str) -> ContainerRuntimeResult<()> {
        self.record(ContainerCall::RemoveVolume(volume.to_owned()));
        Ok(())
    }

    async fn remove_network(&self, network: &str) -> ContainerRuntimeResult<()> {
        self.record(ContainerCall::RemoveNetwork(network.to_owned()));
        Ok(())
    }

    async fn remove_volumes_with_prefix(&self, prefix: &str) -> ContainerRuntimeResult<()> {
        self.record(ContainerCall::RemoveVolumesWithPrefix(prefix.to_owned()));
        Ok(())
    }
}
