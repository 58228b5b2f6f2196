//! Maintenance settings.

use super::MaintenanceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hour of the UTC day during which maintenance runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct MaintenanceHour(u8);

impl MaintenanceHour {
    /// Hour used until the operator picks another one.
    pub const DEFAULT: Self = Self(4);

    /// Validates an hour of the day.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceDomainError::HourOutOfRange`] unless the hour is
    /// within `0..=23`.
    pub fn new(hour: i32) -> Result<Self, MaintenanceDomainError> {
        u8::try_from(hour)
            .ok()
            .filter(|value| *value <= 23)
            .map(Self)
            .ok_or(MaintenanceDomainError::HourOutOfRange(hour))
    }

    /// Returns the hour.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for MaintenanceHour {
    type Error = MaintenanceDomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MaintenanceHour> for i32 {
    fn from(value: MaintenanceHour) -> Self {
        Self::from(value.0)
    }
}

impl fmt::Display for MaintenanceHour {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// What a maintenance cycle does and when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceSettings {
    /// Back up every app that was not updated during the cycle.
    #[serde(rename = "are_auto_backups_enabled")]
    pub auto_backups_enabled: bool,
    /// Update apps when the store has a newer version.
    #[serde(rename = "are_auto_updates_enabled")]
    pub auto_updates_enabled: bool,
    /// UTC hour of the maintenance window.
    #[serde(rename = "preferred_maintenance_hour")]
    pub preferred_hour: MaintenanceHour,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            auto_backups_enabled: true,
            auto_updates_enabled: true,
            preferred_hour: MaintenanceHour::DEFAULT,
        }
    }
}

/// Settings as submitted by an operator, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceSettingsUpdate {
    /// Requested automatic backup switch.
    pub are_auto_backups_enabled: bool,
    /// Requested automatic update switch.
    pub are_auto_updates_enabled: bool,
    /// Requested UTC hour.
    pub preferred_maintenance_hour: i32,
}

impl MaintenanceSettingsUpdate {
    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceDomainError::HourOutOfRange`] for an hour outside
    /// `0..=23`.
    pub fn validate(self) -> Result<MaintenanceSettings, MaintenanceDomainError> {
        Ok(MaintenanceSettings {
            auto_backups_enabled: self.are_auto_backups_enabled,
            auto_updates_enabled: self.are_auto_updates_enabled,
            preferred_hour: MaintenanceHour::new(self.preferred_maintenance_hour)?,
        })
    }
}

impl From<MaintenanceSettings> for MaintenanceSettingsUpdate {
    fn from(settings: MaintenanceSettings) -> Self {
        Self {
            are_auto_backups_enabled: settings.auto_backups_enabled,
            are_auto_updates_enabled: settings.auto_updates_enabled,
            preferred_maintenance_hour: settings.preferred_hour.into(),
        }
    }
}
