//! Then steps for maintenance cycle BDD scenarios.

use super::helpers::key;
use super::world::{MaintenanceWorld, run_async};
use eyre::WrapErr;
use hangar::app::ports::AppRepository;
use hangar::backup::domain::BackupDescription;
use hangar::maintenance::services::PollOutcome;
use rstest_bdd_macros::then;

fn outcome(world: &MaintenanceWorld) -> Result<&PollOutcome, eyre::Report> {
    world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("the scheduler has not polled"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("poll failed: {err}"))
}

#[then("the cycle completes")]
fn cycle_completes(world: &mut MaintenanceWorld) -> Result<(), eyre::Report> {
    match outcome(world)? {
        PollOutcome::Completed(report) if report.failed.is_empty() => Ok(()),
        other => Err(eyre::eyre!("expected a clean cycle, got {other:?}")),
    }
}

#[then("the cycle is skipped")]
fn cycle_is_skipped(world: &mut MaintenanceWorld) -> Result<(), eyre::Report> {
    match outcome(world)? {
        PollOutcome::Skipped => Ok(()),
        other => Err(eyre::eyre!("expected a skipped cycle, got {other:?}")),
    }
}

#[then("no cycle is due")]
fn no_cycle_is_due(world: &mut MaintenanceWorld) -> Result<(), eyre::Report> {
    match outcome(world)? {
        PollOutcome::NotDue => Ok(()),
        other => Err(eyre::eyre!("expected no due cycle, got {other:?}")),
    }
}

#[then(r#"the number of automatic backups of "{maintainer}" "{name}" is {count:usize}"#)]
fn automatic_backup_count(
    world: &mut MaintenanceWorld,
    maintainer: String,
    name: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let found = run_async(world.harness.local_backups(&key(&maintainer, &name)))
        .into_iter()
        .filter(|backup| backup.description == BackupDescription::Auto)
        .count();
    if found != count {
        return Err(eyre::eyre!(
            "expected {count} automatic backups of {maintainer} / {name}, found {found}"
        ));
    }
    Ok(())
}

#[then(r#"app "{maintainer}" "{name}" is at version "{version_name}""#)]
fn app_is_at_version(
    world: &mut MaintenanceWorld,
    maintainer: String,
    name: String,
    version_name: String,
) -> Result<(), eyre::Report> {
    let app = run_async(world.harness.apps.find_by_key(&key(&maintainer, &name)))
        .wrap_err("look up app")?
        .ok_or_else(|| eyre::eyre!("app {maintainer} / {name} is not installed"))?;
    if app.version().name() != version_name {
        return Err(eyre::eyre!(
            "expected version {version_name}, found {}",
            app.version().name()
        ));
    }
    Ok(())
}
