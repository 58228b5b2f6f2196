//! Domain model for backups and their retention.

mod descriptor;
mod error;
mod ids;
mod record;
mod retention;
mod tags;

pub use descriptor::{COMPOSE_FILE_NAME, declared_volumes};
pub use error::BackupDomainError;
pub use ids::BackupId;
pub use record::{BackupDescription, BackupRecord, RepositoryLocation, RestoredVersion};
pub use retention::{RetentionLimits, candidates_for_deletion};
pub use tags::SnapshotTags;
