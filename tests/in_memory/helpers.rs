//! Shared helpers for the in-memory integration tests.
//!
//! [`Harness`] wires either backup manager implementation over the same
//! in-memory collaborators so one test body can assert both behave alike.

use chrono::{DateTime, Local, TimeZone, Utc};
use hangar::app::{
    adapters::memory::{
        InMemoryAppLifecycle, InMemoryAppRepository, InMemoryAppStore, InMemoryPlatformDatabase,
    },
    domain::{AppId, AppKey, AppVersion, NewApp},
    ports::AppRepository,
};
use hangar::backup::{
    adapters::memory::{
        InMemoryBackupManager, InMemoryContainerRuntime, InMemoryRemoteRepositorySettings,
        InMemorySnapshotStore,
    },
    domain::{RetentionLimits, RepositoryLocation, BackupRecord},
    ports::{BackupManager, RemoteRepositoryConfig},
    services::{BackupOperations, PlatformPorts, SnapshotBackupManager},
};
use hangar::coordinator::OperationCoordinator;
use mockable::Clock;
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex, PoisonError};
use zip::write::SimpleFileOptions;

/// Clock returning a settable instant.
#[derive(Debug)]
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    /// Creates a clock stopped at `now`.
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns a UTC timestamp on the hour.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Builds a zipped app archive whose compose file declares `volumes`.
pub fn compose_archive(volumes: &[&str]) -> Vec<u8> {
    let mut compose = String::from("services:\n  app:\n    image: busybox\n");
    if !volumes.is_empty() {
        compose.push_str("volumes:\n");
        for volume in volumes {
            compose.push_str(&format!("  {volume}:\n"));
        }
    }
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("docker-compose.yml", SimpleFileOptions::default())
        .expect("start compose file");
    writer
        .write_all(compose.as_bytes())
        .expect("write compose file");
    writer.finish().expect("finish archive").into_inner()
}

/// Builds an app version with a valid archive.
pub fn version(name: &str, created_at: DateTime<Utc>) -> AppVersion {
    AppVersion::new(name, created_at, compose_archive(&["data"])).expect("valid version")
}

/// Builds the key `maintainer / name`.
pub fn key(maintainer: &str, name: &str) -> AppKey {
    AppKey::new(maintainer, name).expect("valid key")
}

/// Which [`BackupManager`] implementation a harness runs.
#[derive(Debug, Clone, Copy)]
pub enum Backend {
    /// The deterministic in-memory fake.
    Fake,
    /// The snapshot-backed manager over the in-memory snapshot store.
    Snapshot,
}

/// In-memory platform with one backup manager.
pub struct Harness {
    pub apps: Arc<InMemoryAppRepository>,
    pub lifecycle: Arc<InMemoryAppLifecycle>,
    pub database: Arc<InMemoryPlatformDatabase>,
    pub store: Arc<InMemoryAppStore>,
    pub remote: Arc<InMemoryRemoteRepositorySettings>,
    pub clock: Arc<FixedClock>,
    pub coordinator: Arc<OperationCoordinator>,
    pub manager: Arc<dyn BackupManager>,
}

impl Harness {
    /// Builds a harness with default retention limits.
    pub fn new(backend: Backend) -> Self {
        Self::with_limits(backend, RetentionLimits::default())
    }

    /// Builds a harness applying `limits` during retention sweeps.
    pub fn with_limits(backend: Backend, limits: RetentionLimits) -> Self {
        let apps = Arc::new(InMemoryAppRepository::new());
        let lifecycle = Arc::new(InMemoryAppLifecycle::new(Arc::clone(&apps)));
        let database = Arc::new(InMemoryPlatformDatabase::new());
        let store = Arc::new(InMemoryAppStore::new(Arc::clone(&apps)));
        let remote = Arc::new(InMemoryRemoteRepositorySettings::disabled());
        let clock = Arc::new(FixedClock::new(at(2024, 3, 1, 12)));
        let ports = PlatformPorts {
            apps: apps.clone(),
            lifecycle: lifecycle.clone(),
            database: database.clone(),
            store: store.clone(),
            remote: remote.clone(),
        };
        let manager: Arc<dyn BackupManager> = match backend {
            Backend::Fake => Arc::new(InMemoryBackupManager::new(
                ports,
                Arc::clone(&clock),
                limits,
            )),
            Backend::Snapshot => Arc::new(SnapshotBackupManager::new(
                ports,
                Arc::new(InMemorySnapshotStore::new(Arc::clone(&clock))),
                Arc::new(InMemoryContainerRuntime::new()),
                limits,
            )),
        };
        Self {
            apps,
            lifecycle,
            database,
            store,
            remote,
            clock,
            coordinator: Arc::new(OperationCoordinator::new()),
            manager,
        }
    }

    /// Returns coordinator-guarded entry points over the manager.
    pub fn operations(&self) -> BackupOperations<dyn BackupManager> {
        BackupOperations::new(
            Arc::clone(&self.manager),
            Arc::clone(&self.coordinator),
            self.lifecycle.clone(),
        )
    }

    /// Installs `maintainer / name` at `version_name`, published at `created_at`.
    pub async fn install(
        &self,
        maintainer: &str,
        name: &str,
        version_name: &str,
        created_at: DateTime<Utc>,
    ) -> AppId {
        self.apps
            .create(&NewApp {
                key: key(maintainer, name),
                version: version(version_name, created_at),
                should_be_running: true,
            })
            .await
            .expect("install app")
    }

    /// Switches the remote repository on.
    pub fn enable_remote(&self) {
        self.remote
            .set(RemoteRepositoryConfig {
                enabled: true,
                host: "backup.example.org".to_owned(),
                ssh_port: 22,
                ssh_user: "hangar".to_owned(),
                ..RemoteRepositoryConfig::default()
            })
            .expect("enable remote");
    }

    /// Lists the backups of an app in the local repository.
    pub async fn local_backups(&self, app: &AppKey) -> Vec<BackupRecord> {
        self.manager
            .list_backups_of_app(app, RepositoryLocation::Local)
            .await
            .expect("list backups")
    }
}
