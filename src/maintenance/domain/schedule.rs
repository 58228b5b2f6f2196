//! Due check for the daily maintenance cycle.

use super::MaintenanceHour;
use chrono::{DateTime, Timelike, Utc};

/// Returns whether a maintenance cycle should run at `now`.
///
/// A cycle is due when none ran on the current UTC calendar day and `now`
/// falls within `[hour:00:00.000, hour+1:00:00.000)` UTC.
#[must_use]
pub fn is_maintenance_cycle_due(
    now: DateTime<Utc>,
    last_run: DateTime<Utc>,
    preferred_hour: MaintenanceHour,
) -> bool {
    now.date_naive() != last_run.date_naive() && now.hour() == u32::from(preferred_hour.value())
}
