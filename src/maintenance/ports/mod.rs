//! Port contracts for persisted maintenance state.

mod config_store;

pub use config_store::{ConfigKey, ConfigStore, ConfigStoreError, ConfigStoreResult};
