//! Adapter implementations for app ports.

pub mod memory;
