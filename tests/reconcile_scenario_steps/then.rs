//! Then steps for reconcile BDD scenarios.

use super::world::ReconcileWorld;
use rstest_bdd_macros::then;
use tfo_orchestrator::{
    pipeline::domain::{Lifecycle, Phase, StageState, TaskType},
    reconcile::domain::Action,
    resource::domain::Generation,
};

#[then(r#"task "{task}" is launched for generation {generation:i64}"#)]
fn task_launched(
    world: &ReconcileWorld,
    task: String,
    generation: i64,
) -> Result<(), eyre::Report> {
    let expected_task = TaskType::try_from(task.as_str())?;
    let Some(Action::Launch { task_type, config }) = world.last_action.as_ref() else {
        return Err(eyre::eyre!(
            "expected a launch, got {:?}",
            world.last_action.as_ref().map(Action::name)
        ));
    };
    eyre::ensure!(
        *task_type == expected_task,
        "expected {expected_task} to launch, got {task_type}"
    );
    eyre::ensure!(
        config.generation == Generation::new(generation),
        "expected generation {generation}, got {}",
        config.generation
    );
    eyre::ensure!(
        world.executor.launches()?.len() > world.launches_before,
        "executor saw no launch"
    );
    Ok(())
}

#[then("no task is launched")]
fn no_task_launched(world: &ReconcileWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        !matches!(world.last_action, Some(Action::Launch { .. })),
        "unexpected launch action"
    );
    eyre::ensure!(
        world.executor.launches()?.len() == world.launches_before,
        "executor saw an unexpected launch"
    );
    Ok(())
}

#[then(r#"the action is "{name}""#)]
fn action_is(world: &ReconcileWorld, name: String) -> Result<(), eyre::Report> {
    let action = world
        .last_action
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no reconcile pass has run"))?;
    eyre::ensure!(
        action.name() == name,
        "expected action {name}, got {}",
        action.name()
    );
    Ok(())
}

#[then(r#"the phase is "{phase}""#)]
fn phase_is(world: &ReconcileWorld, phase: String) -> Result<(), eyre::Report> {
    let expected = Phase::try_from(phase.as_str())?;
    let actual = world.status()?.phase();
    eyre::ensure!(actual == expected, "expected phase {expected}, got {actual}");
    Ok(())
}

#[then(r#"the current stage is "{task}" in state "{state}""#)]
fn current_stage_is(
    world: &ReconcileWorld,
    task: String,
    state: String,
) -> Result<(), eyre::Report> {
    let expected_task = TaskType::try_from(task.as_str())?;
    let expected_state = StageState::try_from(state.as_str())?;
    let status = world.status()?;
    let stage = status
        .stage()
        .ok_or_else(|| eyre::eyre!("status has no current stage"))?;
    eyre::ensure!(
        stage.task_type() == expected_task && stage.state() == expected_state,
        "expected {expected_task} {expected_state}, got {} {}",
        stage.task_type(),
        stage.state()
    );
    Ok(())
}

#[then("the last completed generation is {generation:i64}")]
fn last_completed_generation_is(
    world: &ReconcileWorld,
    generation: i64,
) -> Result<(), eyre::Report> {
    let actual = world.status()?.last_completed_generation();
    eyre::ensure!(
        actual == Generation::new(generation),
        "expected generation {generation}, got {actual}"
    );
    Ok(())
}

#[then("no delete task has been launched")]
fn no_delete_task_launched(world: &ReconcileWorld) -> Result<(), eyre::Report> {
    let delete_launches = world
        .executor
        .launches()?
        .into_iter()
        .filter(|launch| launch.config.task_type.lifecycle() == Lifecycle::Delete)
        .count();
    eyre::ensure!(delete_launches == 0, "{delete_launches} delete tasks launched");
    Ok(())
}
