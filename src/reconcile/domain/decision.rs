//! The pure decision at the heart of every reconcile pass.

use super::{Action, ReconcileError, TaskConfig};
use crate::config::OrchestratorConfig;
use crate::pipeline::domain::{DesiredState, PipelineStep, Stage, StagePipeline, TerraformStatus};
use crate::resource::domain::TerraformResource;
use tracing::debug;

/// Chooses the next action for `resource` given its observed `status`.
///
/// An active non-interruptible stage always yields [`Action::NoOp`], even
/// when the generation changed or deletion was requested. Deletion of a
/// resource with `ignoreDelete` set yields [`Action::RemoveFinalizer`]
/// without entering the delete pipeline.
///
/// # Errors
///
/// Returns [`ReconcileError`] when the task selected to run cannot be
/// configured from the spec.
pub fn decide(
    resource: &TerraformResource,
    status: &TerraformStatus,
    config: &OrchestratorConfig,
) -> Result<Action, ReconcileError> {
    let current = status.stage();
    if let Some(stage) = current
        && stage.blocks_preemption()
    {
        debug!(
            resource = %resource.key(),
            task = %stage.task_type(),
            generation = %stage.generation(),
            "non-interruptible stage active; deferring"
        );
        return Ok(Action::NoOp);
    }

    if resource.deletion_requested() && resource.spec().ignore_delete {
        return Ok(Action::RemoveFinalizer);
    }

    let desired = DesiredState {
        generation: resource.generation(),
        deletion_requested: resource.deletion_requested(),
    };
    match StagePipeline::next(current, desired) {
        PipelineStep::Run(task_type) => {
            resource
                .spec()
                .validate()
                .map_err(|source| ReconcileError::InvalidSpec { task_type, source })?;
            let task_config = TaskConfig::assemble(resource, status, task_type, config)?;
            Ok(Action::Launch {
                task_type,
                config: Box::new(task_config),
            })
        }
        PipelineStep::InFlight(_) => Ok(Action::NoOp),
        PipelineStep::Exhausted(lifecycle) => Ok(Action::MarkComplete {
            lifecycle,
            generation: current.map_or(resource.generation(), Stage::generation),
        }),
        PipelineStep::Halted(task_type) => Ok(Action::MarkFailed {
            task_type,
            reason: current
                .map(|stage| stage.reason().to_owned())
                .unwrap_or_default(),
        }),
    }
}
