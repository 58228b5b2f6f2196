//! Given steps for maintenance cycle BDD scenarios.

use super::helpers::{at, key, version};
use super::world::{MaintenanceWorld, run_async};
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use hangar::maintenance::domain::MaintenanceSettingsUpdate;
use rstest_bdd_macros::given;

#[given(r#"an installed app "{maintainer}" "{name}" at version "{version_name}""#)]
fn installed_app(
    world: &mut MaintenanceWorld,
    maintainer: String,
    name: String,
    version_name: String,
) {
    let _app_id = run_async(world.harness.install(
        &maintainer,
        &name,
        &version_name,
        at(2024, 1, 1, 0),
    ));
}

#[given(r#"the store publishes version "{version_name}" of "{maintainer}" "{name}""#)]
fn store_publishes(
    world: &mut MaintenanceWorld,
    version_name: String,
    maintainer: String,
    name: String,
) -> Result<(), eyre::Report> {
    world
        .harness
        .store
        .publish(
            format!("{maintainer}-{name}-{version_name}"),
            key(&maintainer, &name),
            version(&version_name, at(2024, 2, 1, 0)),
        )
        .wrap_err("publish store version")
}

#[given("the preferred maintenance hour is {hour:i32}")]
fn preferred_hour(world: &mut MaintenanceWorld, hour: i32) -> Result<(), eyre::Report> {
    run_async(world.scheduler.settings().update(MaintenanceSettingsUpdate {
        are_auto_backups_enabled: true,
        are_auto_updates_enabled: true,
        preferred_maintenance_hour: hour,
    }))
    .wrap_err("save maintenance settings")?;
    Ok(())
}

#[given(r#"the time is "{timestamp}""#)]
fn the_time_is(world: &mut MaintenanceWorld, timestamp: String) -> Result<(), eyre::Report> {
    let now = DateTime::parse_from_rfc3339(&timestamp)
        .wrap_err("parse scenario timestamp")?
        .with_timezone(&Utc);
    world.harness.clock.set(now);
    Ok(())
}

#[given(r#"another operation "{label}" is running"#)]
fn another_operation_running(
    world: &mut MaintenanceWorld,
    label: String,
) -> Result<(), eyre::Report> {
    world
        .harness
        .coordinator
        .try_lock(&label)
        .wrap_err("hold the operation coordinator")
}
