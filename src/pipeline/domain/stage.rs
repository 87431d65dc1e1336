//! Stage records: one attempt to run a task type for a generation.

use super::{Generation, ParseStageStateError, TaskType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observed state of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageState {
    /// The task pod has been requested but has not started.
    Initializing,
    /// The task pod is running.
    InProgress,
    /// The task finished successfully.
    Complete,
    /// The task finished unsuccessfully.
    Failed,
    /// The executor could not determine the task state.
    Unknown,
}

impl StageState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::InProgress => "in-progress",
            Self::Complete => "complete",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }

    /// Returns whether the state can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for StageState {
    type Error = ParseStageStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "initializing" => Ok(Self::Initializing),
            "in-progress" => Ok(Self::InProgress),
            "complete" => Ok(Self::Complete),
            "failed" => Ok(Self::Failed),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ParseStageStateError(value.to_owned())),
        }
    }
}

/// One recorded attempt to run a task type for a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    generation: Generation,
    state: StageState,
    #[serde(rename = "podType")]
    task_type: TaskType,
    interruptible: bool,
    reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stop_time: Option<DateTime<Utc>>,
}

impl Stage {
    /// Creates a freshly launched stage.
    ///
    /// Interruptibility is derived from the task type.
    #[must_use]
    pub const fn launched(task_type: TaskType, generation: Generation) -> Self {
        Self {
            generation,
            state: StageState::Initializing,
            task_type,
            interruptible: task_type.is_interruptible(),
            reason: String::new(),
            start_time: None,
            stop_time: None,
        }
    }

    /// Returns the generation this stage belongs to.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> StageState {
        self.state
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns whether a newer generation may preempt this stage.
    #[must_use]
    pub const fn is_interruptible(&self) -> bool {
        self.interruptible
    }

    /// Returns the last reported reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns when the task was first seen running.
    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Returns when the task reached a terminal state.
    #[must_use]
    pub const fn stop_time(&self) -> Option<DateTime<Utc>> {
        self.stop_time
    }

    /// Returns whether the stage has reached complete or failed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Returns whether the stage blocks preemption right now.
    #[must_use]
    pub const fn blocks_preemption(&self) -> bool {
        !self.interruptible && !self.is_terminal()
    }

    pub(super) fn set_state(&mut self, state: StageState, reason: &str) {
        self.state = state;
        reason.clone_into(&mut self.reason);
    }

    pub(super) fn mark_started(&mut self, at: DateTime<Utc>) {
        if self.start_time.is_none() {
            self.start_time = Some(at);
        }
    }

    pub(super) fn mark_stopped(&mut self, at: DateTime<Utc>) {
        self.stop_time = Some(at);
    }
}
