//! Snapshot store driving `restic` inside a container.
//!
//! Every operation runs a throwaway container from the configured image with
//! the local repository volume mounted at `/backups`. Remote repositories are
//! reached through an `rclone` SFTP remote named `myssh`; its configuration
//! and the SSH `known_hosts` file live in named volumes so that they persist
//! between invocations. Each operation first initializes the addressed
//! repository if `restic check` fails.

mod invocation;
mod output;
mod store;

pub use store::ResticSnapshotStore;
