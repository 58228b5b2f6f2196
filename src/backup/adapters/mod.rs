//! Adapter implementations for backup ports.

pub mod docker;
pub mod memory;
pub mod restic;
