//! Next-task selection across the apply and delete sequences.

use super::{Generation, Lifecycle, Stage, StageState, TaskType};

/// The parts of the desired resource the pipeline cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesiredState {
    /// Generation of the desired spec.
    pub generation: Generation,
    /// Whether the resource is being deleted.
    pub deletion_requested: bool,
}

impl DesiredState {
    /// Creates desired state for an apply pass.
    #[must_use]
    pub const fn apply(generation: Generation) -> Self {
        Self {
            generation,
            deletion_requested: false,
        }
    }

    /// Creates desired state for a deletion pass.
    #[must_use]
    pub const fn delete(generation: Generation) -> Self {
        Self {
            generation,
            deletion_requested: true,
        }
    }
}

/// Outcome of asking the pipeline what should happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    /// Launch this task.
    Run(TaskType),
    /// This task is still running; nothing new to launch.
    InFlight(TaskType),
    /// Every task of the lifecycle completed for the current generation.
    Exhausted(Lifecycle),
    /// This task failed; the generation is terminal.
    Halted(TaskType),
}

/// The canonical ordered apply and delete task sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct StagePipeline;

impl StagePipeline {
    /// Returns the lifecycle that should be driven for `desired`.
    ///
    /// Once a resource has started its delete path it never returns to the
    /// apply path.
    #[must_use]
    pub fn active_lifecycle(current: Option<&Stage>, desired: DesiredState) -> Lifecycle {
        let already_deleting =
            current.is_some_and(|stage| stage.task_type().lifecycle() == Lifecycle::Delete);
        if desired.deletion_requested || already_deleting {
            Lifecycle::Delete
        } else {
            Lifecycle::Apply
        }
    }

    /// Computes the next step given the current stage and desired state.
    ///
    /// A missing stage, a stage from the other lifecycle, or a stage from an
    /// older generation restarts the active lifecycle from its setup task.
    /// Preemption rules for non-interruptible stages are enforced by the
    /// caller before asking for the next step.
    #[must_use]
    pub fn next(current: Option<&Stage>, desired: DesiredState) -> PipelineStep {
        let lifecycle = Self::active_lifecycle(current, desired);
        let Some(stage) = current else {
            return PipelineStep::Run(lifecycle.first());
        };

        let task = stage.task_type();
        let stale = stage.generation() < desired.generation;
        if task.lifecycle() != lifecycle || stale {
            return PipelineStep::Run(lifecycle.first());
        }

        match stage.state() {
            StageState::Complete => {
                task.successor()
                    .map_or(PipelineStep::Exhausted(lifecycle), PipelineStep::Run)
            }
            StageState::Failed => PipelineStep::Halted(task),
            StageState::Initializing | StageState::InProgress | StageState::Unknown => {
                PipelineStep::InFlight(task)
            }
        }
    }
}
