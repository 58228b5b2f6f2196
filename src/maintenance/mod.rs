//! Scheduled maintenance: automatic updates, automatic backups and the
//! retention sweep.
//!
//! Once per UTC day, inside the preferred maintenance hour, a cycle updates
//! every app with a newer store version, backs up the rest and then applies
//! the retention policy. Settings and the last execution time live in a
//! key/value [`ports::ConfigStore`].
//!
//! - Domain types in [`domain`], including the due check
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The settings service and the scheduler in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
