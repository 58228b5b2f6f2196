//! Deployment descriptor inspection.

use super::BackupDomainError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};

/// Name of the deployment descriptor inside a version archive.
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

#[derive(Debug, Deserialize)]
struct ComposeDescriptor {
    #[serde(default)]
    volumes: Option<BTreeMap<String, serde_yaml::Value>>,
}

/// Returns the named volumes declared at the top level of the deployment
/// descriptor packaged in `archive`, sorted by name.
///
/// # Errors
///
/// Returns [`BackupDomainError::InvalidArchive`] when the archive cannot be
/// read or has no descriptor, and [`BackupDomainError::InvalidDescriptor`]
/// when the descriptor is not valid YAML.
pub fn declared_volumes(archive: &[u8]) -> Result<Vec<String>, BackupDomainError> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive))
        .map_err(|err| BackupDomainError::InvalidArchive(err.to_string()))?;
    let mut descriptor = String::new();
    zip.by_name(COMPOSE_FILE_NAME)
        .map_err(|err| BackupDomainError::InvalidArchive(format!("{COMPOSE_FILE_NAME}: {err}")))?
        .read_to_string(&mut descriptor)
        .map_err(|err| BackupDomainError::InvalidArchive(err.to_string()))?;

    let parsed: ComposeDescriptor = serde_yaml::from_str(&descriptor)
        .map_err(|err| BackupDomainError::InvalidDescriptor(err.to_string()))?;
    Ok(parsed.volumes.unwrap_or_default().into_keys().collect())
}
