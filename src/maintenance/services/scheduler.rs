//! Background maintenance scheduler.

use super::{MaintenanceResult, MaintenanceSettingsService};
use crate::app::{
    domain::{AppKey, AppRecord},
    ports::AppRepository,
};
use crate::backup::{
    domain::{BackupDescription, RepositoryLocation},
    ports::{BackupManager, BackupManagerError},
};
use crate::config::PlatformConfig;
use crate::coordinator::OperationCoordinator;
use crate::maintenance::{
    domain::{MaintenanceSettings, is_maintenance_cycle_due},
    ports::ConfigStore,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Coordinator label of a maintenance cycle.
pub const MAINTENANCE_CYCLE_LABEL: &str = "maintenance cycle";

/// Shortest poll interval the background loop accepts.
const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Apps touched by one maintenance cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Apps moved to a newer version, each with a safety backup.
    pub updated: Vec<AppKey>,
    /// Apps that received an automatic backup.
    pub backed_up: Vec<AppKey>,
    /// Apps for which an update or backup failed.
    pub failed: Vec<AppKey>,
}

/// Result of one due check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No cycle is due.
    NotDue,
    /// A cycle was due but another operation held the coordinator.
    Skipped,
    /// A cycle ran.
    Completed(CycleReport),
}

/// Runs the daily maintenance cycle.
pub struct MaintenanceScheduler<M, S, C>
where
    M: BackupManager + ?Sized,
    S: ConfigStore,
    C: Clock + Send + Sync,
{
    manager: Arc<M>,
    settings: MaintenanceSettingsService<S>,
    apps: Arc<dyn AppRepository>,
    coordinator: Arc<OperationCoordinator>,
    clock: Arc<C>,
    enabled: bool,
    poll_interval: Duration,
}

impl<M, S, C> MaintenanceScheduler<M, S, C>
where
    M: BackupManager + ?Sized + 'static,
    S: ConfigStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a scheduler; `config` decides whether and how often it polls.
    #[must_use]
    pub const fn new(
        manager: Arc<M>,
        settings: MaintenanceSettingsService<S>,
        apps: Arc<dyn AppRepository>,
        coordinator: Arc<OperationCoordinator>,
        clock: Arc<C>,
        config: &PlatformConfig,
    ) -> Self {
        Self {
            manager,
            settings,
            apps,
            coordinator,
            clock,
            enabled: config.maintenance_agent_enabled,
            poll_interval: config.poll_interval(),
        }
    }

    /// Returns the settings service.
    #[must_use]
    pub const fn settings(&self) -> &MaintenanceSettingsService<S> {
        &self.settings
    }

    /// Writes default settings if needed, then spawns the polling loop when
    /// the maintenance agent is enabled.
    ///
    /// # Errors
    ///
    /// Returns the error from writing default settings.
    pub async fn start(self: Arc<Self>) -> MaintenanceResult<Option<JoinHandle<()>>> {
        self.settings.ensure_defaults().await?;
        Ok(self.spawn())
    }

    /// Spawns the polling loop, or returns `None` when the maintenance agent
    /// is disabled.
    #[must_use]
    pub fn spawn(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.enabled {
            tracing::info!("maintenance agent is disabled");
            return None;
        }
        let period = self.poll_interval.max(MIN_POLL_INTERVAL);
        tracing::info!(
            poll_secs = period.as_secs(),
            "starting maintenance agent for automatic updates and backups"
        );
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(err) = self.poll_once().await {
                    tracing::error!(error = %err, "maintenance due check failed");
                }
            }
        }))
    }

    /// Runs a cycle if one is due.
    ///
    /// The execution time is recorded before the coordinator is requested,
    /// so a due cycle that is skipped or fails is not retried the same UTC
    /// day.
    ///
    /// # Errors
    ///
    /// Returns settings, store or app listing failures.
    pub async fn poll_once(&self) -> MaintenanceResult<PollOutcome> {
        let settings = self.settings.settings().await?;
        let last_run = self.settings.last_execution().await?;
        let now = self.clock.utc();
        if !is_maintenance_cycle_due(now, last_run, settings.preferred_hour) {
            return Ok(PollOutcome::NotDue);
        }

        self.settings.record_execution(now).await?;
        let Ok(_held) = self.coordinator.try_acquire(MAINTENANCE_CYCLE_LABEL) else {
            tracing::warn!("maintenance cycle could not be started, another operation is running");
            return Ok(PollOutcome::Skipped);
        };
        Ok(PollOutcome::Completed(self.run_cycle(settings).await?))
    }

    /// Runs a cycle now, waiting for any operation in flight to finish.
    ///
    /// # Errors
    ///
    /// Returns settings, store or app listing failures.
    pub async fn trigger_cycle(&self) -> MaintenanceResult<CycleReport> {
        let _held = self.coordinator.acquire(MAINTENANCE_CYCLE_LABEL).await;
        let settings = self.settings.settings().await?;
        self.settings.record_execution(self.clock.utc()).await?;
        self.run_cycle(settings).await
    }

    async fn run_cycle(&self, settings: MaintenanceSettings) -> MaintenanceResult<CycleReport> {
        tracing::info!("maintenance cycle started");
        let mut report = CycleReport::default();
        for app in self.apps.list_all().await? {
            self.maintain(&app, settings, &mut report).await;
        }

        if let Err(err) = self.manager.run_retention_policy().await {
            tracing::error!(error = %err, "retention policy failed");
        }
        tracing::info!(
            updated = report.updated.len(),
            backed_up = report.backed_up.len(),
            failed = report.failed.len(),
            "maintenance cycle finished"
        );
        Ok(report)
    }

    async fn maintain(
        &self,
        app: &AppRecord,
        settings: MaintenanceSettings,
        report: &mut CycleReport,
    ) {
        let key = app.key();
        if settings.auto_updates_enabled && !app.is_platform_database() {
            let update_started = self.clock.utc();
            match self.manager.update_app_version(app.id()).await {
                Ok(()) => {
                    report.updated.push(key.clone());
                    return;
                }
                Err(
                    err @ (BackupManagerError::AlreadyUpToDate { .. }
                    | BackupManagerError::NoVersionsAvailable(_)),
                ) => {
                    tracing::info!(app = %key, "app was not updated: {err}");
                }
                Err(err) => {
                    tracing::warn!(app = %key, error = %err, "app was not updated");
                    report.failed.push(key.clone());
                    if self.has_auto_backup_since(key, update_started).await {
                        tracing::info!(app = %key, "safety backup taken before the failed update");
                        report.backed_up.push(key.clone());
                        return;
                    }
                }
            }
        }

        if settings.auto_backups_enabled {
            match self
                .manager
                .create_backup(app.id(), BackupDescription::Auto)
                .await
            {
                Ok(()) => report.backed_up.push(key.clone()),
                Err(err) => {
                    tracing::warn!(app = %key, error = %err, "app was not backed up");
                    if !report.failed.contains(key) {
                        report.failed.push(key.clone());
                    }
                }
            }
        }
    }

    async fn has_auto_backup_since(&self, key: &AppKey, since: DateTime<Utc>) -> bool {
        match self
            .manager
            .list_backups_of_app(key, RepositoryLocation::Local)
            .await
        {
            Ok(backups) => backups.iter().any(|backup| {
                backup.description == BackupDescription::Auto && backup.created_at >= since
            }),
            Err(err) => {
                tracing::warn!(app = %key, error = %err, "could not list backups");
                false
            }
        }
    }
}
