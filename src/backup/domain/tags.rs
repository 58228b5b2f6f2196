//! The five `key=value` tags that describe a snapshot.

use super::{BackupDescription, BackupDomainError};
use crate::app::domain::AppKey;
use chrono::{DateTime, SecondsFormat, Utc};

const MAINTAINER: &str = "maintainer";
const APP: &str = "app";
const VERSION: &str = "version";
const VERSION_CREATION_TIMESTAMP: &str = "version_creation_timestamp";
const DESCRIPTION: &str = "description";

/// Metadata stored alongside every snapshot.
///
/// Snapshot repositories only offer string tags, so everything needed to
/// rebuild a [`super::BackupRecord`] is flattened into five `key=value`
/// entries. Values may contain further `=` characters; only the first one
/// separates key from value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotTags {
    /// App the snapshot belongs to.
    pub app: AppKey,
    /// Installed version name.
    pub version_name: String,
    /// Publication timestamp of the installed version.
    pub version_created_at: DateTime<Utc>,
    /// Why the snapshot was taken.
    pub description: BackupDescription,
}

impl SnapshotTags {
    /// Renders the tags in repository order.
    #[must_use]
    pub fn to_tags(&self) -> Vec<String> {
        vec![
            format!("{MAINTAINER}={}", self.app.maintainer()),
            format!("{APP}={}", self.app.app_name()),
            format!("{VERSION}={}", self.version_name),
            format!(
                "{VERSION_CREATION_TIMESTAMP}={}",
                self.version_created_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            format!("{DESCRIPTION}={}", self.description),
        ]
    }

    /// Returns the tag filter that selects every snapshot of `app`.
    #[must_use]
    pub fn filter_for(app: &AppKey) -> Vec<String> {
        vec![
            format!("{MAINTAINER}={}", app.maintainer()),
            format!("{APP}={}", app.app_name()),
        ]
    }

    /// Rebuilds snapshot metadata from repository tags.
    ///
    /// Unknown tags are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BackupDomainError::MissingTag`] when one of the five tags is
    /// absent and [`BackupDomainError::InvalidTag`] or
    /// [`BackupDomainError::InvalidTimestamp`] when a value is malformed.
    pub fn parse(tags: &[String]) -> Result<Self, BackupDomainError> {
        let lookup = |key: &'static str| -> Result<&str, BackupDomainError> {
            tags.iter()
                .filter_map(|tag| tag.split_once('='))
                .find(|(candidate, _)| *candidate == key)
                .map(|(_, value)| value)
                .ok_or(BackupDomainError::MissingTag(key))
        };

        let app = AppKey::new(lookup(MAINTAINER)?, lookup(APP)?).map_err(|err| {
            BackupDomainError::InvalidTag {
                tag: APP,
                reason: err.to_string(),
            }
        })?;
        let raw_timestamp = lookup(VERSION_CREATION_TIMESTAMP)?;
        let version_created_at = DateTime::parse_from_rfc3339(raw_timestamp)
            .map_err(|_| BackupDomainError::InvalidTimestamp(raw_timestamp.to_owned()))?
            .with_timezone(&Utc);

        Ok(Self {
            app,
            version_name: lookup(VERSION)?.to_owned(),
            version_created_at,
            description: BackupDescription::from(lookup(DESCRIPTION)?),
        })
    }
}
