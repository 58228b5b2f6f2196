//! Grandfather-father-son retention over one app's backups.

use super::BackupRecord;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How many daily, weekly and monthly representatives survive a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionLimits {
    /// Newest backup of each of the most recent distinct days.
    pub keep_daily: usize,
    /// Newest backup of each of the most recent distinct ISO weeks.
    pub keep_weekly: usize,
    /// Newest backup of each of the most recent distinct months.
    pub keep_monthly: usize,
}

impl Default for RetentionLimits {
    fn default() -> Self {
        Self {
            keep_daily: 7,
            keep_weekly: 4,
            keep_monthly: 12,
        }
    }
}

/// Greedy picker for one calendar granularity.
struct Bucket<F> {
    limit: usize,
    seen: HashSet<String>,
    key_of: F,
}

impl<F: Fn(&BackupRecord) -> String> Bucket<F> {
    fn new(limit: usize, key_of: F) -> Self {
        Self {
            limit,
            seen: HashSet::new(),
            key_of,
        }
    }

    /// Returns whether `backup` is kept as this bucket's representative.
    fn offer(&mut self, backup: &BackupRecord) -> bool {
        if self.seen.len() >= self.limit {
            return false;
        }
        self.seen.insert((self.key_of)(backup))
    }
}

/// Returns the backups that no retention bucket keeps.
///
/// Backups are walked newest first; each granularity keeps the first backup
/// it sees for a calendar unit until its limit is reached. A backup kept by
/// any granularity survives. Candidates are returned newest first and backups
/// with identical timestamps keep their input order. The description of a
/// backup is not considered here.
#[must_use]
pub fn candidates_for_deletion(
    backups: &[BackupRecord],
    limits: RetentionLimits,
) -> Vec<BackupRecord> {
    let mut ordered: Vec<&BackupRecord> = backups.iter().collect();
    ordered.sort_by(|left, right| right.created_at.cmp(&left.created_at));

    let mut daily = Bucket::new(limits.keep_daily, |backup: &BackupRecord| {
        backup.created_at.format("%Y-%m-%d").to_string()
    });
    let mut weekly = Bucket::new(limits.keep_weekly, |backup: &BackupRecord| {
        let week = backup.created_at.iso_week();
        format!("{:04}-{:02}", week.year(), week.week())
    });
    let mut monthly = Bucket::new(limits.keep_monthly, |backup: &BackupRecord| {
        backup.created_at.format("%Y-%m").to_string()
    });

    let mut retained = HashSet::new();
    for backup in &ordered {
        let kept_daily = daily.offer(backup);
        let kept_weekly = weekly.offer(backup);
        let kept_monthly = monthly.offer(backup);
        if kept_daily || kept_weekly || kept_monthly {
            retained.insert(backup.id.clone());
        }
    }

    ordered
        .into_iter()
        .filter(|backup| !retained.contains(&backup.id))
        .cloned()
        .collect()
}
