//! Domain model for installed apps.

mod error;
mod ids;
mod record;

pub use error::AppDomainError;
pub use ids::{AppId, AppKey};
pub use record::{AppRecord, AppVersion, NewApp, PLATFORM_DATABASE_APP, PLATFORM_DATABASE_MAINTAINER};
