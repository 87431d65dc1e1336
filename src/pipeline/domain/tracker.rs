//! Single writer for [`TerraformStatus`].
//!
//! Every status mutation goes through [`StageTracker`], which keeps the
//! history append-only and the phase consistent with the current stage.

use super::{
    ExportStatus, Generation, Lifecycle, Phase, Stage, StageState, StageTrackerError, TaskType,
    TerraformStatus,
};
use crate::resource::domain::OutputPolicy;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A task state change reported by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageEvent {
    /// Task the report refers to.
    pub task_type: TaskType,
    /// Reported state.
    pub state: StageState,
    /// Free-text reason accompanying the report.
    pub reason: String,
    /// When the executor observed the change.
    pub timestamp: DateTime<Utc>,
}

impl StageEvent {
    /// Creates an event with an empty reason.
    #[must_use]
    pub const fn new(task_type: TaskType, state: StageState, timestamp: DateTime<Utc>) -> Self {
        Self {
            task_type,
            state,
            reason: String::new(),
            timestamp,
        }
    }

    /// Sets the reason text.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

/// What a tracker operation did to the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// A new stage was appended and made current.
    Launched(TaskType),
    /// The current stage moved to a non-terminal state.
    Updated(StageState),
    /// The current stage completed.
    Completed {
        /// Task that completed.
        task_type: TaskType,
        /// Whether it was the last task of its lifecycle.
        lifecycle_finished: bool,
    },
    /// The current stage failed.
    Failed(TaskType),
    /// Phase and last completed generation were brought up to date.
    Finalized(Lifecycle),
    /// Module outputs were written.
    OutputsRecorded,
    /// Export status changed.
    ExportUpdated,
    /// Nothing changed.
    Unchanged,
    /// The input was inconsistent with the status and was dropped.
    Discarded,
}

impl StatusTransition {
    /// Returns whether the status must be persisted.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        !matches!(self, Self::Unchanged | Self::Discarded)
    }
}

/// Owns a [`TerraformStatus`] while it is being advanced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTracker {
    status: TerraformStatus,
}

impl StageTracker {
    /// Takes ownership of a status for mutation.
    #[must_use]
    pub const fn new(status: TerraformStatus) -> Self {
        Self { status }
    }

    /// Returns the tracked status.
    #[must_use]
    pub const fn status(&self) -> &TerraformStatus {
        &self.status
    }

    /// Releases the tracked status.
    #[must_use]
    pub fn into_status(self) -> TerraformStatus {
        self.status
    }

    /// Appends a freshly launched stage and makes it current.
    ///
    /// # Errors
    ///
    /// Returns [`StageTrackerError::NonInterruptibleActive`] while an apply
    /// stage is still running, [`StageTrackerError::DuplicateStage`] when the
    /// `(generation, task)` pair was already recorded, and
    /// [`StageTrackerError::GenerationRegression`] when `generation` is older
    /// than the newest recorded stage.
    pub fn record_launch(
        &mut self,
        task_type: TaskType,
        generation: Generation,
    ) -> Result<StatusTransition, StageTrackerError> {
        self.append(Stage::launched(task_type, generation))?;
        Ok(StatusTransition::Launched(task_type))
    }

    /// Records a stage that failed before its task could be launched.
    ///
    /// Used for desired-state validation failures so that the generation
    /// stays terminal and the reason is visible in the status.
    ///
    /// # Errors
    ///
    /// Same as [`Self::record_launch`].
    pub fn reject(
        &mut self,
        task_type: TaskType,
        generation: Generation,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<StatusTransition, StageTrackerError> {
        let mut stage = Stage::launched(task_type, generation);
        stage.set_state(StageState::Failed, reason);
        stage.mark_stopped(at);
        self.append(stage)?;
        Ok(StatusTransition::Failed(task_type))
    }

    /// Applies an executor observation to the current stage.
    ///
    /// Re-observing the state a terminal stage already holds is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StageTrackerError::StageOutOfOrder`] when the event does
    /// not refer to the current stage and [`StageTrackerError::TerminalStage`]
    /// when it tries to change a completed or failed stage.
    pub fn observe(&mut self, event: &StageEvent) -> Result<StatusTransition, StageTrackerError> {
        let Some(current) = self.status.stage.as_mut() else {
            return Err(StageTrackerError::StageOutOfOrder {
                expected: None,
                observed: event.task_type,
            });
        };
        if current.task_type() != event.task_type {
            return Err(StageTrackerError::StageOutOfOrder {
                expected: Some(current.task_type()),
                observed: event.task_type,
            });
        }
        if current.is_terminal() {
            if current.state() == event.state {
                return Ok(StatusTransition::Unchanged);
            }
            return Err(StageTrackerError::TerminalStage {
                task_type: current.task_type(),
                state: current.state(),
                observed: event.state,
            });
        }
        if current.state() == event.state && current.reason() == event.reason {
            return Ok(StatusTransition::Unchanged);
        }

        let generation = current.generation();
        let transition = apply_event(current, event);
        if let StatusTransition::Completed {
            task_type,
            lifecycle_finished: true,
        } = transition
        {
            self.finish(task_type.lifecycle(), generation);
        }
        self.status.sync_history();
        Ok(transition)
    }

    /// Brings phase and last completed generation in line with a completed
    /// final stage. Safe to call repeatedly.
    #[must_use]
    pub fn mark_complete(&mut self) -> StatusTransition {
        let Some(stage) = self.status.stage.as_ref() else {
            return StatusTransition::Unchanged;
        };
        let task = stage.task_type();
        if !task.is_last() || stage.state() != StageState::Complete {
            return StatusTransition::Unchanged;
        }
        let lifecycle = task.lifecycle();
        let generation = stage.generation();
        if self.status.phase == Phase::finished(lifecycle)
            && self.status.last_completed_generation >= generation
        {
            return StatusTransition::Unchanged;
        }
        self.finish(lifecycle, generation);
        StatusTransition::Finalized(lifecycle)
    }

    /// Publishes module outputs according to the resource's output policy.
    #[must_use]
    pub fn record_outputs(
        &mut self,
        outputs: &BTreeMap<String, String>,
        policy: &OutputPolicy,
    ) -> StatusTransition {
        if !policy.writes_to_status() {
            return StatusTransition::Unchanged;
        }
        let filtered = policy.filter(outputs);
        if filtered == self.status.outputs {
            return StatusTransition::Unchanged;
        }
        self.status.outputs = filtered;
        StatusTransition::OutputsRecorded
    }

    /// Updates the export status.
    #[must_use]
    pub fn set_export_status(&mut self, exported: ExportStatus) -> StatusTransition {
        if self.status.exported == Some(exported) {
            return StatusTransition::Unchanged;
        }
        self.status.exported = Some(exported);
        StatusTransition::ExportUpdated
    }

    fn append(&mut self, stage: Stage) -> Result<(), StageTrackerError> {
        let task_type = stage.task_type();
        let generation = stage.generation();

        if let Some(current) = self.status.stage.as_ref()
            && current.blocks_preemption()
        {
            return Err(StageTrackerError::NonInterruptibleActive {
                active: current.task_type(),
                requested: task_type,
            });
        }
        if self.status.find_stage(generation, task_type).is_some() {
            return Err(StageTrackerError::DuplicateStage {
                generation,
                task_type,
            });
        }
        if let Some(latest) = self.status.stages.last()
            && latest.generation() > generation
        {
            return Err(StageTrackerError::GenerationRegression {
                latest: latest.generation(),
                attempted: generation,
            });
        }

        let lifecycle = task_type.lifecycle();
        self.status.phase = if task_type.is_setup() {
            Phase::starting(lifecycle)
        } else {
            Phase::running(lifecycle)
        };
        self.status.stages.push(stage.clone());
        self.status.stage = Some(stage);
        Ok(())
    }

    fn finish(&mut self, lifecycle: Lifecycle, generation: Generation) {
        self.status.phase = Phase::finished(lifecycle);
        if generation > self.status.last_completed_generation {
            self.status.last_completed_generation = generation;
        }
    }
}

fn apply_event(stage: &mut Stage, event: &StageEvent) -> StatusTransition {
    let task_type = stage.task_type();
    match event.state {
        StageState::Initializing => {
            if stage.state() != StageState::Initializing {
                return StatusTransition::Unchanged;
            }
            stage.set_state(StageState::Initializing, &event.reason);
            StatusTransition::Updated(StageState::Initializing)
        }
        StageState::InProgress => {
            stage.set_state(StageState::InProgress, &event.reason);
            stage.mark_started(event.timestamp);
            StatusTransition::Updated(StageState::InProgress)
        }
        StageState::Unknown => {
            stage.set_state(StageState::Unknown, &event.reason);
            StatusTransition::Updated(StageState::Unknown)
        }
        StageState::Complete => {
            stage.set_state(StageState::Complete, &event.reason);
            stage.mark_stopped(event.timestamp);
            StatusTransition::Completed {
                task_type,
                lifecycle_finished: task_type.is_last(),
            }
        }
        StageState::Failed => {
            stage.set_state(StageState::Failed, &event.reason);
            stage.mark_stopped(event.timestamp);
            StatusTransition::Failed(task_type)
        }
    }
}
