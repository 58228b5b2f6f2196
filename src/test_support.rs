//! Shared fixtures for unit tests.

use crate::app::{
    adapters::memory::{InMemoryAppLifecycle, InMemoryAppRepository, InMemoryAppStore, InMemoryPlatformDatabase},
    domain::{AppKey, AppVersion, NewApp},
};
use crate::backup::{adapters::memory::InMemoryRemoteRepositorySettings, services::PlatformPorts};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex, PoisonError};
use zip::write::SimpleFileOptions;

/// Clock returning a settable instant.
#[derive(Debug)]
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

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

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Zipped app archive whose compose file declares `volumes`.
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

pub fn new_app(maintainer: &str, name: &str, version: &str, created_at: DateTime<Utc>) -> NewApp {
    NewApp {
        key: AppKey::new(maintainer, name).expect("valid key"),
        version: AppVersion::new(version, created_at, compose_archive(&["data"]))
            .expect("valid version"),
        should_be_running: true,
    }
}

/// In-memory collaborators with handles kept for assertions.
pub struct Platform {
    pub apps: Arc<InMemoryAppRepository>,
    pub lifecycle: Arc<InMemoryAppLifecycle>,
    pub database: Arc<InMemoryPlatformDatabase>,
    pub store: Arc<InMemoryAppStore>,
    pub remote: Arc<InMemoryRemoteRepositorySettings>,
}

impl Platform {
    pub fn new() -> Self {
        let apps = Arc::new(InMemoryAppRepository::new());
        Self {
            lifecycle: Arc::new(InMemoryAppLifecycle::new(Arc::clone(&apps))),
            database: Arc::new(InMemoryPlatformDatabase::new()),
            store: Arc::new(InMemoryAppStore::new(Arc::clone(&apps))),
            remote: Arc::new(InMemoryRemoteRepositorySettings::disabled()),
            apps,
        }
    }

    pub fn ports(&self) -> PlatformPorts {
        PlatformPorts {
            apps: self.apps.clone(),
            lifecycle: self.lifecycle.clone(),
            database: self.database.clone(),
            store: self.store.clone(),
            remote: self.remote.clone(),
        }
    }
}
