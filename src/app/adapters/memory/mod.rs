//! In-memory app adapters for tests and local deterministic flows.

mod lifecycle;
mod repository;
mod store;

pub use lifecycle::{InMemoryAppLifecycle, InMemoryPlatformDatabase, LifecycleEvent};
pub use repository::InMemoryAppRepository;
pub use store::InMemoryAppStore;
