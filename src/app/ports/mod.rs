//! Port contracts for app persistence, lifecycle and the app store.

mod lifecycle;
mod repository;
mod store;

pub use lifecycle::{AppLifecycle, AppLifecycleError, AppLifecycleResult, PlatformDatabase};
#[cfg(test)]
pub use repository::MockAppRepository;
pub use repository::{AppRepository, AppRepositoryError, AppRepositoryResult};
pub use store::{AppStoreClient, AppStoreError, AppStoreResult, DownloadedVersion, StoreVersion};
