//! Reading and writing persisted maintenance settings.

use super::{MaintenanceError, MaintenanceResult};
use crate::maintenance::{
    domain::{MaintenanceHour, MaintenanceSettings, MaintenanceSettingsUpdate},
    ports::{ConfigKey, ConfigStore},
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;

const TRUE: &str = "true";

/// Maintenance settings and execution state over a [`ConfigStore`].
pub struct MaintenanceSettingsService<S>
where
    S: ConfigStore,
{
    store: Arc<S>,
}

impl<S> MaintenanceSettingsService<S>
where
    S: ConfigStore,
{
    /// Creates a service over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Writes default settings and an epoch last execution, unless settings
    /// were initialized before.
    ///
    /// Returns whether defaults were written.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceError::ConfigStore`] when the store fails.
    pub async fn ensure_defaults(&self) -> MaintenanceResult<bool> {
        if self.is_initialized().await? {
            return Ok(false);
        }
        self.record_execution(DateTime::<Utc>::UNIX_EPOCH).await?;
        self.write(MaintenanceSettings::default()).await?;
        tracing::info!("default maintenance settings written");
        Ok(true)
    }

    /// Reads the current settings.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceError::MissingSetting`] or
    /// [`MaintenanceError::InvalidSetting`] for absent or corrupt entries.
    pub async fn settings(&self) -> MaintenanceResult<MaintenanceSettings> {
        let auto_backups = self.required(ConfigKey::EnableAutoBackups).await?;
        let auto_updates = self.required(ConfigKey::EnableAutoUpdates).await?;
        let hour = self.required(ConfigKey::PreferredMaintenanceHour).await?;
        let preferred_hour = hour
            .trim()
            .parse::<i32>()
            .ok()
            .and_then(|value| MaintenanceHour::new(value).ok())
            .ok_or(MaintenanceError::InvalidSetting {
                key: ConfigKey::PreferredMaintenanceHour,
                value: hour,
            })?;
        Ok(MaintenanceSettings {
            auto_backups_enabled: auto_backups == TRUE,
            auto_updates_enabled: auto_updates == TRUE,
            preferred_hour,
        })
    }

    /// Validates and saves new settings.
    ///
    /// Nothing is written when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceError::Domain`] for an hour outside `0..=23`, or
    /// a store failure.
    pub async fn update(
        &self,
        request: MaintenanceSettingsUpdate,
    ) -> MaintenanceResult<MaintenanceSettings> {
        let settings = request.validate()?;
        self.write(settings).await?;
        tracing::info!(
            auto_backups = settings.auto_backups_enabled,
            auto_updates = settings.auto_updates_enabled,
            hour = %settings.preferred_hour,
            "maintenance settings saved"
        );
        Ok(settings)
    }

    /// Returns when the last cycle started, or the Unix epoch when none has.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceError::InvalidSetting`] for an unparsable
    /// timestamp, or a store failure.
    pub async fn last_execution(&self) -> MaintenanceResult<DateTime<Utc>> {
        let key = ConfigKey::LastMaintenanceCycleExecutionDate;
        let Some(stored) = self.store.get(key).await? else {
            return Ok(DateTime::<Utc>::UNIX_EPOCH);
        };
        DateTime::parse_from_rfc3339(stored.trim())
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(|_| MaintenanceError::InvalidSetting { key, value: stored })
    }

    /// Persists the start time of a cycle.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceError::ConfigStore`] when the store fails.
    pub async fn record_execution(&self, started_at: DateTime<Utc>) -> MaintenanceResult<()> {
        self.store
            .set(
                ConfigKey::LastMaintenanceCycleExecutionDate,
                &started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .await?;
        Ok(())
    }

    async fn write(&self, settings: MaintenanceSettings) -> MaintenanceResult<()> {
        self.store
            .set(
                ConfigKey::EnableAutoBackups,
                &settings.auto_backups_enabled.to_string(),
            )
            .await?;
        self.store
            .set(
                ConfigKey::EnableAutoUpdates,
                &settings.auto_updates_enabled.to_string(),
            )
            .await?;
        self.store
            .set(
                ConfigKey::PreferredMaintenanceHour,
                &settings.preferred_hour.to_string(),
            )
            .await?;
        if !self.is_initialized().await? {
            self.store
                .set(ConfigKey::AreMaintenanceSettingsInitialized, TRUE)
                .await?;
        }
        Ok(())
    }

    async fn is_initialized(&self) -> MaintenanceResult<bool> {
        Ok(self
            .store
            .get(ConfigKey::AreMaintenanceSettingsInitialized)
            .await?
            .is_some_and(|value| value == TRUE))
    }

    async fn required(&self, key: ConfigKey) -> MaintenanceResult<String> {
        self.store
            .get(key)
            .await?
            .ok_or(MaintenanceError::MissingSetting(key))
    }
}
