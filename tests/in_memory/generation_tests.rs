//! In-memory integration tests for spec changes and failures.

use super::helpers::{Harness, drive, harness, key, report, resource, status};
use chrono::Utc;
use rstest::rstest;
use tfo_orchestrator::{
    pipeline::domain::{Phase, StageEvent, StageState, TaskType},
    reconcile::domain::Action,
    resource::domain::Generation,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn spec_change_restarts_an_interruptible_pipeline(harness: Harness) -> eyre::Result<()> {
    drive(&harness, &resource(1)?, Some(TaskType::Plan)).await?;
    report(&harness, TaskType::Plan, StageState::InProgress).await?;

    let action = harness.service.reconcile(&resource(2)?).await?;

    let Action::Launch { task_type, config } = action else {
        return Err(eyre::eyre!("expected a launch, got {}", action.name()));
    };
    eyre::ensure!(task_type == TaskType::Setup);
    eyre::ensure!(config.generation == Generation::new(2));
    eyre::ensure!(config.pod_name.ends_with("-v2-setup"), "{}", config.pod_name);
    let restarted = status(&harness).await?;
    eyre::ensure!(restarted.phase() == Phase::Initializing);
    eyre::ensure!(restarted.last_completed_generation() == Generation::ZERO);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn spec_change_waits_for_a_running_apply(harness: Harness) -> eyre::Result<()> {
    drive(&harness, &resource(1)?, Some(TaskType::Apply)).await?;
    report(&harness, TaskType::Apply, StageState::InProgress).await?;

    eyre::ensure!(harness.service.reconcile(&resource(2)?).await? == Action::NoOp);
    let waiting = status(&harness).await?;
    eyre::ensure!(
        waiting
            .stage()
            .is_some_and(|stage| stage.task_type() == TaskType::Apply
                && stage.state() == StageState::InProgress)
    );

    report(&harness, TaskType::Apply, StageState::Complete).await?;
    let (launched, settled) = drive(&harness, &resource(2)?, None).await?;
    eyre::ensure!(launched.first() == Some(&TaskType::Setup));
    eyre::ensure!(matches!(settled, Some(Action::MarkComplete { .. })));
    eyre::ensure!(status(&harness).await?.last_completed_generation() == Generation::new(2));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_task_halts_until_the_generation_changes(harness: Harness) -> eyre::Result<()> {
    drive(&harness, &resource(1)?, Some(TaskType::Apply)).await?;
    harness
        .service
        .observe(
            &key()?,
            &StageEvent::new(TaskType::Apply, StageState::Failed, Utc::now())
                .with_reason("apply error"),
        )
        .await?;
    let launches_before = harness.executor.launches()?.len();

    for _ in 0..2 {
        let action = harness.service.reconcile(&resource(1)?).await?;
        eyre::ensure!(
            action
                == Action::MarkFailed {
                    task_type: TaskType::Apply,
                    reason: "apply error".to_owned(),
                }
        );
    }
    eyre::ensure!(harness.executor.launches()?.len() == launches_before);
    let failed = status(&harness).await?;
    eyre::ensure!(failed.phase() == Phase::Running);

    let action = harness.service.reconcile(&resource(2)?).await?;
    eyre::ensure!(matches!(
        action,
        Action::Launch {
            task_type: TaskType::Setup,
            ..
        }
    ));
    eyre::ensure!(harness.executor.launches()?.len() == launches_before + 1);
    Ok(())
}
