//! Identifier types for installed apps.

use super::AppDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Character that separates tag lists in snapshot stores.
pub(crate) const TAG_LIST_SEPARATOR: char = ',';

/// Rejects `value` when it contains [`TAG_LIST_SEPARATOR`].
pub(crate) fn reject_separator(
    field: &'static str,
    value: String,
) -> Result<String, AppDomainError> {
    if value.contains(TAG_LIST_SEPARATOR) {
        return Err(AppDomainError::Comma { field, value });
    }
    Ok(value)
}

/// Integer identifier of an installed app record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(i64);

impl AppId {
    /// Wraps a persisted app identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// The `(maintainer, app name)` pair that names an app independently of its
/// installation.
///
/// Backups are addressed by this key, so they outlive the app record they
/// were taken from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppKey {
    maintainer: String,
    app_name: String,
}

impl AppKey {
    /// Creates a validated app key.
    ///
    /// # Errors
    ///
    /// Returns [`AppDomainError`] when either part is empty after trimming or
    /// contains a comma.
    pub fn new(
        maintainer: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Result<Self, AppDomainError> {
        let maintainer_value = maintainer.into().trim().to_owned();
        if maintainer_value.is_empty() {
            return Err(AppDomainError::EmptyMaintainer);
        }
        let app_name_value = app_name.into().trim().to_owned();
        if app_name_value.is_empty() {
            return Err(AppDomainError::EmptyAppName);
        }
        Ok(Self {
            maintainer: reject_separator("maintainer", maintainer_value)?,
            app_name: reject_separator("app name", app_name_value)?,
        })
    }

    /// Returns the maintainer name.
    #[must_use]
    pub fn maintainer(&self) -> &str {
        &self.maintainer
    }

    /// Returns the app name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Returns the `maintainer_app` prefix used for the app's container
    /// network and volumes.
    #[must_use]
    pub fn resource_prefix(&self) -> String {
        format!("{}_{}", self.maintainer, self.app_name)
    }
}

impl fmt::Display for AppKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} / {}", self.maintainer, self.app_name)
    }
}
