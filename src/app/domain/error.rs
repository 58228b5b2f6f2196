//! Error types for app domain validation.

use thiserror::Error;

/// Errors returned while constructing app domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppDomainError {
    /// The maintainer name is empty after trimming.
    #[error("maintainer must not be empty")]
    EmptyMaintainer,

    /// The app name is empty after trimming.
    #[error("app name must not be empty")]
    EmptyAppName,

    /// The version name is empty after trimming.
    #[error("version name must not be empty")]
    EmptyVersionName,

    /// A name contains a comma, which snapshot tags cannot carry.
    #[error("{field} '{value}' must not contain ','")]
    Comma {
        /// Which name was rejected.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}
