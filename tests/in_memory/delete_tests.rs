//! In-memory integration tests for deletion.

use super::helpers::{Harness, drive, harness, key, report, resource, spec, status};
use rstest::rstest;
use tfo_orchestrator::{
    pipeline::domain::{Lifecycle, Phase, StageState, TaskType},
    reconcile::domain::Action,
    resource::domain::{Generation, TerraformResource},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_pipeline_runs_after_apply(harness: Harness) -> eyre::Result<()> {
    drive(&harness, &resource(1)?, None).await?;
    let deleting = resource(1)?.with_deletion_requested(true);

    let (launched, settled) = drive(&harness, &deleting, None).await?;

    eyre::ensure!(
        launched == Lifecycle::Delete.sequence().to_vec(),
        "unexpected delete order: {launched:?}"
    );
    eyre::ensure!(
        settled
            == Some(Action::MarkComplete {
                lifecycle: Lifecycle::Delete,
                generation: Generation::new(1),
            })
    );
    let deleted = status(&harness).await?;
    eyre::ensure!(deleted.phase() == Phase::Deleted);
    eyre::ensure!(deleted.last_completed_generation() == Generation::new(1));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletion_interrupts_an_interruptible_task(harness: Harness) -> eyre::Result<()> {
    drive(&harness, &resource(1)?, Some(TaskType::Plan)).await?;
    report(&harness, TaskType::Plan, StageState::InProgress).await?;

    let deleting = resource(1)?.with_deletion_requested(true);
    let action = harness.service.reconcile(&deleting).await?;

    eyre::ensure!(
        matches!(
            action,
            Action::Launch {
                task_type: TaskType::SetupDelete,
                ..
            }
        ),
        "expected setup-delete launch, got {}",
        action.name()
    );
    eyre::ensure!(status(&harness).await?.phase() == Phase::InitializingDelete);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletion_waits_for_a_running_apply(harness: Harness) -> eyre::Result<()> {
    drive(&harness, &resource(1)?, Some(TaskType::Apply)).await?;
    report(&harness, TaskType::Apply, StageState::InProgress).await?;

    let deleting = resource(1)?.with_deletion_requested(true);
    eyre::ensure!(harness.service.reconcile(&deleting).await? == Action::NoOp);

    report(&harness, TaskType::Apply, StageState::Complete).await?;
    let action = harness.service.reconcile(&deleting).await?;
    eyre::ensure!(matches!(
        action,
        Action::Launch {
            task_type: TaskType::SetupDelete,
            ..
        }
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ignored_delete_skips_the_delete_pipeline(harness: Harness) -> eyre::Result<()> {
    let mut ignoring = spec();
    ignoring.ignore_delete = true;
    let current = TerraformResource::new(key()?, Generation::new(1), ignoring);
    drive(&harness, &current, None).await?;
    let launches_before = harness.executor.launches()?.len();

    let action = harness
        .service
        .reconcile(&current.with_deletion_requested(true))
        .await?;

    eyre::ensure!(action == Action::RemoveFinalizer);
    eyre::ensure!(harness.executor.launches()?.len() == launches_before);
    eyre::ensure!(harness.service.status(&key()?).await?.is_none());
    Ok(())
}
