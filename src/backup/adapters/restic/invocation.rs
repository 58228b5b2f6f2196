//! Rendering of `docker run` command lines for the snapshot tool.

use crate::config::ResticConfig;
use crate::shell::shell_escape;

/// Mount point of the local repository inside the tool container.
pub(super) const LOCAL_REPOSITORY_PATH: &str = "/backups";

/// Directory the tool snapshots and restores into.
pub(super) const SOURCE_DIR: &str = "/source";

/// One container invocation of the snapshot tool.
#[derive(Debug, Default)]
pub(super) struct Invocation {
    env: Vec<String>,
    mounts: Vec<(String, String)>,
}

impl Invocation {
    /// Starts an invocation with no extra environment or mounts.
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Adds `KEY=value` environment entries.
    pub(super) fn with_env(mut self, env: &[String]) -> Self {
        self.env.extend_from_slice(env);
        self
    }

    /// Mounts a host path or named volume into the container.
    pub(super) fn with_mount(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.mounts.push((source.into(), target.into()));
        self
    }

    /// Mounts each named volume below [`SOURCE_DIR`].
    pub(super) fn with_volumes(self, volumes: &[String]) -> Self {
        volumes.iter().fold(self, |invocation, volume| {
            invocation.with_mount(volume.clone(), format!("{SOURCE_DIR}/{volume}"))
        })
    }

    /// Renders the full command line running `script` in the container.
    pub(super) fn render(&self, config: &ResticConfig, script: &str) -> String {
        let mut command = format!(
            "docker run --rm --network {} -v {}",
            shell_escape(&config.network),
            shell_escape(&format!("{}:{LOCAL_REPOSITORY_PATH}", config.repository_volume)),
        );
        for (source, target) in &self.mounts {
            command.push_str(&format!(" -v {}", shell_escape(&format!("{source}:{target}"))));
        }
        for entry in &self.env {
            command.push_str(&format!(" -e {}", shell_escape(entry)));
        }
        command.push_str(&format!(
            " -v restic_rclone:/root/.config/rclone -v restic_ssh:/root/.ssh --entrypoint '' {} sh -c {}",
            shell_escape(&config.image),
            shell_escape(script),
        ));
        command
    }
}

/// Renders `--tag` flags that attach each tag to a new snapshot.
pub(super) fn tag_flags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!(" --tag {}", shell_escape(tag)))
        .collect()
}

/// Renders a `--tag` filter matching snapshots that carry every tag.
pub(super) fn tag_filter(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    format!(" --tag {}", shell_escape(&tags.join(",")))
}
