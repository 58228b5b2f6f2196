//! Installed app records and the collaborators that act on them.
//!
//! The backup and maintenance features never own app state. They read and
//! write it through the ports defined here:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Shared orchestration helpers in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
