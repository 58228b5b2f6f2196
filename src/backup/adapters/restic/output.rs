//! Parsing of `restic snapshots --json` output.

use crate::backup::ports::{Snapshot, SnapshotStoreError};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    id: String,
    time: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Parses the JSON array printed by `restic snapshots --json`.
///
/// # Errors
///
/// Returns [`SnapshotStoreError::UnparsableOutput`] when the output is not a
/// snapshot array or a timestamp is not RFC 3339.
pub(super) fn parse_snapshots(output: &str) -> Result<Vec<Snapshot>, SnapshotStoreError> {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let raw: Vec<RawSnapshot> = serde_json::from_str(trimmed)
        .map_err(|err| SnapshotStoreError::UnparsableOutput(err.to_string()))?;
    raw.into_iter()
        .map(|snapshot| {
            let time = DateTime::parse_from_rfc3339(&snapshot.time)
                .map_err(|err| {
                    SnapshotStoreError::UnparsableOutput(format!(
                        "snapshot {} time '{}': {err}",
                        snapshot.id, snapshot.time
                    ))
                })?
                .with_timezone(&Utc);
            Ok(Snapshot {
                id: snapshot.id,
                time,
                tags: snapshot.tags.unwrap_or_default(),
            })
        })
        .collect()
}
