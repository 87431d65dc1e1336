//! In-memory integration tests for the apply pipeline.

use super::helpers::{Harness, drive, harness, key, report, resource, status};
use chrono::Utc;
use rstest::rstest;
use std::collections::BTreeSet;
use tfo_orchestrator::{
    pipeline::domain::{Lifecycle, Phase, StageEvent, StageState, StatusTransition, TaskType},
    reconcile::domain::Action,
    resource::domain::Generation,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn apply_pipeline_runs_every_task_in_order(harness: Harness) -> eyre::Result<()> {
    let (launched, settled) = drive(&harness, &resource(1)?, None).await?;

    eyre::ensure!(
        launched == Lifecycle::Apply.sequence().to_vec(),
        "unexpected launch order: {launched:?}"
    );
    eyre::ensure!(
        settled
            == Some(Action::MarkComplete {
                lifecycle: Lifecycle::Apply,
                generation: Generation::new(1),
            }),
        "unexpected final action: {settled:?}"
    );
    let finished = status(&harness).await?;
    eyre::ensure!(finished.phase() == Phase::Completed);
    eyre::ensure!(finished.last_completed_generation() == Generation::new(1));
    eyre::ensure!(finished.stages().len() == 10);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn launched_pods_are_unique_and_labelled(harness: Harness) -> eyre::Result<()> {
    drive(&harness, &resource(1)?, None).await?;

    let launches = harness.executor.launches()?;
    let pod_names: BTreeSet<_> = launches
        .iter()
        .map(|launch| launch.config.pod_name.clone())
        .collect();
    eyre::ensure!(pod_names.len() == launches.len(), "pod names collide");
    for launch in &launches {
        eyre::ensure!(launch.key == key()?);
        eyre::ensure!(
            launch
                .config
                .labels
                .get("tf.galleybytes.com/generation")
                .map(String::as_str)
                == Some("1")
        );
    }
    let plan = launches
        .iter()
        .find(|launch| launch.config.task_type == TaskType::Plan)
        .ok_or_else(|| eyre::eyre!("plan was never launched"))?;
    eyre::ensure!(plan.config.image.ends_with(":1.6.0"), "{}", plan.config.image);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finished_pipeline_stays_finished(harness: Harness) -> eyre::Result<()> {
    let current = resource(1)?;
    drive(&harness, &current, None).await?;
    let finished = status(&harness).await?;

    let again = harness.service.reconcile(&current).await?;
    eyre::ensure!(matches!(again, Action::MarkComplete { .. }));

    let duplicate = harness
        .service
        .observe(
            &key()?,
            &StageEvent::new(
                TaskType::PostApply,
                StageState::Complete,
                Utc::now(),
            ),
        )
        .await?;
    eyre::ensure!(
        !duplicate.is_mutation(),
        "duplicate completion changed status: {duplicate:?}"
    );
    eyre::ensure!(status(&harness).await? == finished);
    eyre::ensure!(harness.executor.launches()?.len() == 10);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn running_report_sets_start_time(harness: Harness) -> eyre::Result<()> {
    let (launched, _) = drive(&harness, &resource(1)?, Some(TaskType::Setup)).await?;
    eyre::ensure!(launched == vec![TaskType::Setup]);

    let launched_stage = status(&harness).await?;
    eyre::ensure!(
        launched_stage
            .stage()
            .is_some_and(|stage| stage.start_time().is_none())
    );

    report(&harness, TaskType::Setup, StageState::InProgress).await?;
    let running = status(&harness).await?;
    let stage = running
        .stage()
        .ok_or_else(|| eyre::eyre!("no current stage"))?;
    eyre::ensure!(stage.state() == StageState::InProgress);
    eyre::ensure!(stage.start_time().is_some());
    eyre::ensure!(stage.stop_time().is_none());

    let transition = harness
        .service
        .observe(
            &key()?,
            &StageEvent::new(
                TaskType::Setup,
                StageState::Complete,
                Utc::now(),
            ),
        )
        .await?;
    eyre::ensure!(matches!(transition, StatusTransition::Completed { .. }));
    eyre::ensure!(
        status(&harness)
            .await?
            .stage()
            .is_some_and(|stage| stage.stop_time().is_some())
    );
    Ok(())
}
