//! When steps for reconcile BDD scenarios.

use super::world::ReconcileWorld;
use chrono::Utc;
use rstest_bdd_macros::when;
use tfo_orchestrator::{
    pipeline::domain::{StageEvent, StageState, TaskType},
    resource::domain::{Generation, TerraformResource},
};

#[when("the resource is reconciled")]
fn resource_reconciled(world: &mut ReconcileWorld) -> Result<(), eyre::Report> {
    world.reconcile()?;
    Ok(())
}

#[when("the generation is bumped to {generation:i64}")]
fn generation_bumped(world: &mut ReconcileWorld, generation: i64) -> Result<(), eyre::Report> {
    let current = world.resource()?.clone();
    world.replace_resource(
        TerraformResource::new(
            current.key().clone(),
            Generation::new(generation),
            current.spec().clone(),
        )
        .with_deletion_requested(current.deletion_requested()),
    );
    Ok(())
}

#[when(r#"task "{task}" reports "{state}""#)]
fn task_reports(world: &mut ReconcileWorld, task: String, state: String) -> Result<(), eyre::Report> {
    let event = StageEvent::new(
        TaskType::try_from(task.as_str())?,
        StageState::try_from(state.as_str())?,
        Utc::now(),
    );
    world.report(&event)
}

#[when(r#"task "{task}" fails with reason "{reason}""#)]
fn task_fails(world: &mut ReconcileWorld, task: String, reason: String) -> Result<(), eyre::Report> {
    let event = StageEvent::new(
        TaskType::try_from(task.as_str())?,
        StageState::Failed,
        Utc::now(),
    )
    .with_reason(reason);
    world.report(&event)
}
