//! Backup, retention and update-safety core.
//!
//! Backups are immutable snapshots tagged with the app they were taken from
//! and stored in a local repository and, when enabled, a remote one. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`], including the retention engine
//! - Port contracts in [`ports`], including the [`ports::BackupManager`]
//!   capability set
//! - Adapter implementations in [`adapters`]: the in-memory fake manager,
//!   in-memory snapshot and container doubles, and the restic and docker
//!   tool adapters
//! - Orchestration services in [`services`]: the snapshot-backed manager,
//!   the update workflow, the retention sweep and the guarded entry points

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
