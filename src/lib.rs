//! Hangar: backup, retention and maintenance automation for self-hosted apps.
//!
//! This crate provides the backup lifecycle of installed apps: tagged
//! snapshots in a local and an optional remote repository, restore, a
//! daily/weekly/monthly retention policy, updates guarded by a safety backup,
//! and a scheduler that runs all of it once a day.
//!
//! # Architecture
//!
//! Hangar follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (snapshot and container
//!   tools, in-memory doubles)
//!
//! # Modules
//!
//! - [`app`]: Installed app records and their collaborators
//! - [`backup`]: Backup lifecycle, retention and the update workflow
//! - [`maintenance`]: Maintenance settings and the daily scheduler
//! - [`coordinator`]: Process-wide exclusivity for app-mutating operations
//! - [`config`]: Platform configuration
//! - [`shell`]: Shell command execution for tool adapters

pub mod app;
pub mod backup;
pub mod config;
pub mod coordinator;
pub mod maintenance;
pub mod shell;

#[cfg(test)]
mod test_support;
