//! Backup orchestration services.

mod manager;
mod operations;
mod platform;
mod retention;
mod update;

pub use manager::SnapshotBackupManager;
pub use operations::BackupOperations;
pub use platform::PlatformPorts;
pub use retention::sweep_retention;
pub use update::{latest_version, update_app_version};
