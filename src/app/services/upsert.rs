//! Insert-or-update helpers for app records.

use crate::app::{
    domain::{AppId, NewApp},
    ports::{AppRepository, AppRepositoryResult},
};

/// Installs `app`, or swaps the version of the app already installed under
/// the same key.
///
/// The identifier of an existing app is preserved.
///
/// # Errors
///
/// Returns repository errors from lookup, update or insertion.
pub async fn upsert_app<R>(apps: &R, app: &NewApp) -> AppRepositoryResult<AppId>
where
    R: AppRepository + ?Sized,
{
    match apps.find_by_key(&app.key).await? {
        Some(existing) => {
            apps.update_version(existing.id(), &app.version).await?;
            Ok(existing.id())
        }
        None => apps.create(app).await,
    }
}

/// Deletes any app installed under the same key, then inserts `app` as a
/// fresh record.
///
/// # Errors
///
/// Returns repository errors from lookup, deletion or insertion.
pub async fn replace_app<R>(apps: &R, app: &NewApp) -> AppRepositoryResult<AppId>
where
    R: AppRepository + ?Sized,
{
    if let Some(existing) = apps.find_by_key(&app.key).await? {
        apps.delete(existing.id()).await?;
    }
    apps.create(app).await
}
