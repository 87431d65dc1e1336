//! Error types for stage sequencing and status tracking.

use super::{Generation, StageState, TaskType};
use thiserror::Error;

/// Errors returned when a status mutation would break its invariants.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum StageTrackerError {
    /// The observed task is not the one currently tracked.
    #[error("observed task {observed} out of order (current stage: {})", display_expected(.expected))]
    StageOutOfOrder {
        /// Task of the current stage, if any.
        expected: Option<TaskType>,
        /// Task named by the observation.
        observed: TaskType,
    },

    /// The current stage already reached a terminal state.
    #[error("stage {task_type} is already {state} and cannot become {observed}")]
    TerminalStage {
        /// Task of the current stage.
        task_type: TaskType,
        /// Terminal state already recorded.
        state: StageState,
        /// State named by the observation.
        observed: StageState,
    },

    /// A stage for the same generation and task already exists.
    #[error("stage {task_type} already recorded for generation {generation}")]
    DuplicateStage {
        /// Generation of the rejected stage.
        generation: Generation,
        /// Task of the rejected stage.
        task_type: TaskType,
    },

    /// The stage belongs to a generation older than the newest recorded one.
    #[error("generation {attempted} is older than recorded generation {latest}")]
    GenerationRegression {
        /// Newest recorded generation.
        latest: Generation,
        /// Generation of the rejected stage.
        attempted: Generation,
    },

    /// A non-interruptible stage is still running.
    #[error("cannot start {requested} while non-interruptible stage {active} is running")]
    NonInterruptibleActive {
        /// Running non-interruptible task.
        active: TaskType,
        /// Task that was requested.
        requested: TaskType,
    },
}

fn display_expected(expected: &Option<TaskType>) -> &'static str {
    expected.map_or("none", TaskType::as_str)
}

/// Error returned while parsing task types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task type: {0}")]
pub struct ParseTaskTypeError(pub String);

/// Error returned while parsing stage states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown stage state: {0}")]
pub struct ParseStageStateError(pub String);

/// Error returned while parsing status phases.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status phase: {0}")]
pub struct ParsePhaseError(pub String);
