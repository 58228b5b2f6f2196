//! Orchestration helpers shared by features that rewrite app records.

mod upsert;

pub use upsert::{replace_app, upsert_app};
