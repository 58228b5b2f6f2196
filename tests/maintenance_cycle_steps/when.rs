//! When steps for maintenance cycle BDD scenarios.

use super::world::{MaintenanceWorld, run_async};
use rstest_bdd_macros::when;

#[when("the maintenance scheduler polls")]
fn scheduler_polls(world: &mut MaintenanceWorld) {
    world.last_outcome = Some(run_async(world.scheduler.poll_once()));
}

#[when("the running operation finishes")]
fn running_operation_finishes(world: &mut MaintenanceWorld) {
    world.harness.coordinator.unlock();
}
