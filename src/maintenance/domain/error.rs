//! Error types for maintenance domain validation.

use thiserror::Error;

/// Errors returned while constructing maintenance domain values.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MaintenanceDomainError {
    /// The preferred maintenance hour is outside `0..=23`.
    #[error("preferred maintenance hour must be between 0 and 23, got {0}")]
    HourOutOfRange(i32),
}
