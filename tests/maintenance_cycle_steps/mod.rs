//! Step definitions for maintenance cycle scenarios.

#[path = "../in_memory/helpers.rs"]
#[expect(dead_code, reason = "scenarios use a subset of the shared helpers")]
pub mod helpers;

pub mod world;

mod given;
mod then;
mod when;
