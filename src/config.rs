//! Platform configuration.
//!
//! Configuration is read from a JSON document. Every field has a default, so
//! an empty object yields a working local setup:
//!
//! ```json
//! {
//!   "maintenance_agent_enabled": true,
//!   "maintenance_poll_interval_secs": 300,
//!   "retention": { "keep_daily": 7, "keep_weekly": 4, "keep_monthly": 12 },
//!   "restic": { "image": "restic:local", "repository_volume": "backups" }
//! }
//! ```

use crate::backup::domain::RetentionLimits;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Seconds between two maintenance due checks.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// File that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings of the backup and maintenance subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Whether the maintenance scheduler runs at all.
    pub maintenance_agent_enabled: bool,
    /// Seconds between two due checks of the scheduler.
    pub maintenance_poll_interval_secs: u64,
    /// Retention limits applied by the sweep.
    pub retention: RetentionLimits,
    /// Snapshot tool settings.
    pub restic: ResticConfig,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            maintenance_agent_enabled: true,
            maintenance_poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            retention: RetentionLimits::default(),
            restic: ResticConfig::default(),
        }
    }
}

impl PlatformConfig {
    /// Parses configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Reads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its content is not valid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: path.to_owned(),
            source,
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| read_error(std::io::Error::other("path must include a file name")))?;
        let parent = path
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let document = Dir::open_ambient_dir(parent, ambient_authority())
            .and_then(|dir| dir.read_to_string(file_name))
            .map_err(read_error)?;
        Self::from_json_str(&document)
    }

    /// Returns the interval between two due checks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.maintenance_poll_interval_secs)
    }
}

/// Settings for running the snapshot tool in a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResticConfig {
    /// Image the tool runs in.
    pub image: String,
    /// Directory holding `Dockerfile.restic`, used when the image is missing.
    pub dockerfile_dir: Utf8PathBuf,
    /// Container network the tool joins.
    pub network: String,
    /// Volume holding the local repository.
    pub repository_volume: String,
    /// Passphrase of the local repository.
    pub local_password: String,
    /// Host directory for archives passed to and from the tool.
    pub scratch_dir: Utf8PathBuf,
}

impl Default for ResticConfig {
    fn default() -> Self {
        Self {
            image: "restic:local".to_owned(),
            dockerfile_dir: Utf8PathBuf::from("assets/docker"),
            network: "hangar_restic".to_owned(),
            repository_volume: "backups".to_owned(),
            local_password: "password".to_owned(),
            scratch_dir: Utf8PathBuf::from("/tmp"),
        }
    }
}
