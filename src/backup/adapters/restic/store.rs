//! `restic` implementation of [`SnapshotStore`].

use super::invocation::{Invocation, LOCAL_REPOSITORY_PATH, SOURCE_DIR, tag_filter, tag_flags};
use super::output::parse_snapshots;
use crate::backup::{
    domain::BackupId,
    ports::{
        RemoteRepositoryConfig, RepositoryTarget, Snapshot, SnapshotRequest, SnapshotStore,
        SnapshotStoreError, SnapshotStoreResult,
    },
};
use crate::config::ResticConfig;
use crate::shell::{run_shell, shell_escape};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use uuid::Uuid;

/// Location of the `known_hosts` file inside the tool container.
const KNOWN_HOSTS_PATH: &str = "/root/.ssh/known_hosts";

/// Name of the `rclone` remote pointing at the remote repository.
const RCLONE_REMOTE: &str = "myssh";

/// Snapshot store backed by the `restic` command line tool.
#[derive(Debug, Clone)]
pub struct ResticSnapshotStore {
    config: ResticConfig,
}

/// Scratch directory shared with the tool container, removed on drop.
struct Scratch {
    parent: Dir,
    name: String,
    path: Utf8PathBuf,
}

impl Scratch {
    fn create(root: &Utf8Path) -> SnapshotStoreResult<Self> {
        let parent =
            Dir::open_ambient_dir(root, ambient_authority()).map_err(SnapshotStoreError::tool)?;
        let name = format!("hangar-restic-{}", Uuid::new_v4().simple());
        parent.create_dir(&name).map_err(SnapshotStoreError::tool)?;
        let path = root.join(&name);
        Ok(Self { parent, name, path })
    }

    fn dir(&self) -> SnapshotStoreResult<Dir> {
        self.parent.open_dir(&self.name).map_err(SnapshotStoreError::tool)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if let Err(err) = self.parent.remove_dir_all(&self.name) {
            tracing::warn!(path = %self.path, error = %err, "could not remove scratch directory");
        }
    }
}

impl ResticSnapshotStore {
    /// Creates a store running the tool as configured.
    #[must_use]
    pub const fn new(config: ResticConfig) -> Self {
        Self { config }
    }

    async fn run(&self, invocation: &Invocation, script: &str) -> SnapshotStoreResult<String> {
        run_shell(&invocation.render(&self.config, script))
            .await
            .map_err(SnapshotStoreError::tool)
    }

    /// Configures access to `target` and initializes it when needed.
    ///
    /// Returns the environment that addresses the repository.
    async fn open_repository(&self, target: &RepositoryTarget) -> SnapshotStoreResult<Vec<String>> {
        let env = match target {
            RepositoryTarget::Local => vec![
                format!("RESTIC_REPOSITORY={LOCAL_REPOSITORY_PATH}"),
                format!("RESTIC_PASSWORD={}", self.config.local_password),
            ],
            RepositoryTarget::Remote(remote) => {
                self.configure_remote(remote).await?;
                vec![
                    format!("RESTIC_REPOSITORY=rclone:{RCLONE_REMOTE}:backups"),
                    format!("RESTIC_PASSWORD={}", remote.encryption_password),
                ]
            }
        };
        self.run(&Invocation::new().with_env(&env), "restic check || restic init")
            .await?;
        Ok(env)
    }

    async fn configure_remote(&self, remote: &RemoteRepositoryConfig) -> SnapshotStoreResult<()> {
        let rclone = format!(
            "rclone config create {RCLONE_REMOTE} sftp host={} user={} pass={} port={} \
             known_hosts_file={KNOWN_HOSTS_PATH} use_insecure_cipher=false",
            shell_escape(&remote.host),
            shell_escape(&remote.ssh_user),
            shell_escape(&remote.ssh_password),
            remote.ssh_port,
        );
        self.run(&Invocation::new(), &rclone).await?;
        let known_hosts = format!(
            "printf '%s\\n' {} > {KNOWN_HOSTS_PATH}",
            shell_escape(&remote.ssh_known_hosts)
        );
        self.run(&Invocation::new(), &known_hosts).await?;
        Ok(())
    }

    async fn snapshots(
        &self,
        target: &RepositoryTarget,
        tag_filter_arg: &str,
    ) -> SnapshotStoreResult<Vec<Snapshot>> {
        let env = self.open_repository(target).await?;
        let output = self
            .run(
                &Invocation::new().with_env(&env),
                &format!("restic snapshots --json{tag_filter_arg}"),
            )
            .await?;
        parse_snapshots(&output)
    }
}

#[async_trait]
impl SnapshotStore for ResticSnapshotStore {
    async fn prepare_tooling(&self) -> SnapshotStoreResult<()> {
        let image = shell_escape(&self.config.image);
        let existing = run_shell(&format!("docker images -q {image}"))
            .await
            .map_err(SnapshotStoreError::tool)?;
        if !existing.trim().is_empty() {
            tracing::info!(image = %self.config.image, "snapshot tool image already exists");
            return Ok(());
        }

        tracing::info!(image = %self.config.image, "snapshot tool image is missing; building it");
        let dockerfile_dir = &self.config.dockerfile_dir;
        run_shell(&format!(
            "docker build -t {image} -f {} {}",
            shell_escape(dockerfile_dir.join("Dockerfile.restic").as_str()),
            shell_escape(dockerfile_dir.as_str()),
        ))
        .await
        .map_err(SnapshotStoreError::tool)?;
        tracing::info!(image = %self.config.image, "snapshot tool image built");
        Ok(())
    }

    async fn create(
        &self,
        target: &RepositoryTarget,
        request: &SnapshotRequest,
    ) -> SnapshotStoreResult<()> {
        let env = self.open_repository(target).await?;
        let scratch = Scratch::create(&self.config.scratch_dir)?;
        scratch
            .dir()?
            .write(&request.archive_name, &request.archive)
            .map_err(SnapshotStoreError::tool)?;

        let invocation = Invocation::new()
            .with_env(&env)
            .with_volumes(&request.volumes)
            .with_mount(
                scratch.path.join(&request.archive_name).into_string(),
                format!("{SOURCE_DIR}/{}", request.archive_name),
            );
        self.run(
            &invocation,
            &format!("restic backup {SOURCE_DIR}{}", tag_flags(&request.tags)),
        )
        .await?;
        Ok(())
    }

    async fn list(
        &self,
        target: &RepositoryTarget,
        tag_filter_tags: &[String],
    ) -> SnapshotStoreResult<Vec<Snapshot>> {
        self.snapshots(target, &tag_filter(tag_filter_tags)).await
    }

    async fn find(
        &self,
        target: &RepositoryTarget,
        id: &BackupId,
    ) -> SnapshotStoreResult<Vec<Snapshot>> {
        Ok(self
            .snapshots(target, "")
            .await?
            .into_iter()
            .filter(|snapshot| snapshot.id == id.as_str())
            .collect())
    }

    async fn restore_archive(
        &self,
        target: &RepositoryTarget,
        id: &BackupId,
    ) -> SnapshotStoreResult<Vec<u8>> {
        let env = self.open_repository(target).await?;
        let scratch = Scratch::create(&self.config.scratch_dir)?;
        let invocation = Invocation::new()
            .with_env(&env)
            .with_mount(scratch.path.as_str(), SOURCE_DIR);
        self.run(
            &invocation,
            &format!("restic restore {} --target / --include '*.zip'", shell_escape(id.as_str())),
        )
        .await?;

        let dir = scratch.dir()?;
        let archive_name = dir
            .entries()
            .map_err(SnapshotStoreError::tool)?
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().ok())
            .find(|name| name.ends_with(".zip"))
            .ok_or_else(|| SnapshotStoreError::MissingArchive(id.clone()))?;
        dir.read(&archive_name).map_err(SnapshotStoreError::tool)
    }

    async fn restore_volumes(
        &self,
        target: &RepositoryTarget,
        id: &BackupId,
        volumes: &[String],
    ) -> SnapshotStoreResult<()> {
        let env = self.open_repository(target).await?;
        let invocation = Invocation::new().with_env(&env).with_volumes(volumes);
        self.run(
            &invocation,
            &format!("restic restore {} --target /", shell_escape(id.as_str())),
        )
        .await?;
        Ok(())
    }

    async fn forget(&self, target: &RepositoryTarget, id: &BackupId) -> SnapshotStoreResult<()> {
        let env = self.open_repository(target).await?;
        self.run(
            &Invocation::new().with_env(&env),
            &format!("restic forget {}", shell_escape(id.as_str())),
        )
        .await?;
        Ok(())
    }
}
