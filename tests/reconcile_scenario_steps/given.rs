//! Given steps for reconcile BDD scenarios.

use super::world::{BACKEND, ReconcileWorld};
use chrono::Utc;
use rstest_bdd_macros::given;
use tfo_orchestrator::{
    pipeline::domain::{StageEvent, StageState, TaskType},
    resource::domain::{Generation, Module, ResourceKey, TerraformResource, TerraformSpec},
};

#[given(r#"a terraform resource "{name}" in namespace "{namespace}" at generation {generation:i64}"#)]
fn terraform_resource(
    world: &mut ReconcileWorld,
    name: String,
    namespace: String,
    generation: i64,
) -> Result<(), eyre::Report> {
    let key = ResourceKey::new(namespace, name)?;
    let spec = TerraformSpec::new(
        Module::from_source(format!("https://github.com/acme/{}.git", key.name())),
        "1.5.7",
        BACKEND,
    );
    world.replace_resource(TerraformResource::new(key, Generation::new(generation), spec));
    Ok(())
}

#[given("deletion of the resource is ignored")]
fn deletion_ignored(world: &mut ReconcileWorld) -> Result<(), eyre::Report> {
    let current = world.resource()?.clone();
    let mut spec = current.spec().clone();
    spec.ignore_delete = true;
    world.replace_resource(
        TerraformResource::new(current.key().clone(), current.generation(), spec)
            .with_deletion_requested(current.deletion_requested()),
    );
    Ok(())
}

#[given("deletion has been requested")]
fn deletion_requested(world: &mut ReconcileWorld) -> Result<(), eyre::Report> {
    let current = world.resource()?.clone();
    world.replace_resource(current.with_deletion_requested(true));
    Ok(())
}

#[given("the apply pipeline has completed")]
fn apply_pipeline_completed(world: &mut ReconcileWorld) -> Result<(), eyre::Report> {
    world.drive(None)
}

#[given(r#"the pipeline has run up to task "{task}""#)]
fn pipeline_run_up_to(world: &mut ReconcileWorld, task: String) -> Result<(), eyre::Report> {
    let task_type = TaskType::try_from(task.as_str())?;
    world.drive(Some(task_type))
}

#[given(r#"task "{task}" has reported "{state}""#)]
fn task_has_reported(
    world: &mut ReconcileWorld,
    task: String,
    state: String,
) -> Result<(), eyre::Report> {
    let event = StageEvent::new(
        TaskType::try_from(task.as_str())?,
        StageState::try_from(state.as_str())?,
        Utc::now(),
    );
    world.report(&event)
}

#[given(r#"task "{task}" has failed with reason "{reason}""#)]
fn task_has_failed(
    world: &mut ReconcileWorld,
    task: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let event = StageEvent::new(
        TaskType::try_from(task.as_str())?,
        StageState::Failed,
        Utc::now(),
    )
    .with_reason(reason);
    world.report(&event)
}
