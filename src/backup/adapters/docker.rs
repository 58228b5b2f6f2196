//! Container runtime driving the `docker` command line tool.

use crate::backup::ports::{ContainerRuntime, ContainerRuntimeError, ContainerRuntimeResult};
use crate::shell::{run_shell, shell_escape};
use async_trait::async_trait;

/// [`ContainerRuntime`] that shells out to `docker`.
#[derive(Debug, Clone)]
pub struct DockerContainerRuntime {
    platform_container: String,
}

impl DockerContainerRuntime {
    /// Creates a runtime that detaches `platform_container` from app
    /// networks before removing them.
    #[must_use]
    pub fn new(platform_container: impl Into<String>) -> Self {
        Self {
            platform_container: platform_container.into(),
        }
    }

    async fn run(command: &str) -> ContainerRuntimeResult<()> {
        run_shell(command)
            .await
            .map(|_| ())
            .map_err(ContainerRuntimeError::tool)
    }
}

fn remove_containers_using_volume_command(volume: &str) -> String {
    format!(
        "docker ps -a --filter {} --format '{{{{.ID}}}}' | xargs -r docker rm -f",
        shell_escape(&format!("volume={volume}"))
    )
}

fn remove_network_command(network: &str, platform_container: &str) -> String {
    let network_arg = shell_escape(network);
    format!(
        "docker network disconnect {network_arg} {} || true; docker network rm {network_arg} || true",
        shell_escape(platform_container)
    )
}

fn remove_volumes_with_prefix_command(prefix: &str) -> String {
    format!(
        "docker volume ls --filter name={} --format '{{{{.Name}}}}' | grep {} \
         | xargs -r docker volume rm -f || true",
        shell_escape(prefix),
        shell_escape(&format!("^{prefix}"))
    )
}

#[async_trait]
impl ContainerRuntime for DockerContainerRuntime {
    async fn remove_containers_using_volume(&self, volume: &str) -> ContainerRuntimeResult<()> {
        Self::run(&remove_containers_using_volume_command(volume)).await
    }

    async fn remove_volume(&self, volume: &str) -> ContainerRuntimeResult<()> {
        Self::run(&format!("docker volume rm {}", shell_escape(volume))).await
    }

    async fn remove_network(&self, network: &str) -> ContainerRuntimeResult<()> {
        Self::run(&remove_network_command(network, &self.platform_container)).await
    }

    async fn remove_volumes_with_prefix(&self, prefix: &str) -> ContainerRuntimeResult<()> {
        Self::run(&remove_volumes_with_prefix_command(prefix)).await
    }
}
