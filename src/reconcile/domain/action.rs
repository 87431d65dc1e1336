//! The single action chosen by a reconcile pass.

use super::TaskConfig;
use crate::pipeline::domain::{Lifecycle, TaskType};
use crate::resource::domain::Generation;

/// What the control loop does next for a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Wait for the current task or for a spec change.
    NoOp,
    /// Launch a task pod.
    Launch {
        /// Task to launch.
        task_type: TaskType,
        /// Fully resolved pod configuration.
        config: Box<TaskConfig>,
    },
    /// The lifecycle finished; finalize the status.
    MarkComplete {
        /// Finished lifecycle.
        lifecycle: Lifecycle,
        /// Generation that finished.
        generation: Generation,
    },
    /// The current generation failed and waits for a spec change.
    MarkFailed {
        /// Failed task.
        task_type: TaskType,
        /// Failure reason from the stage.
        reason: String,
    },
    /// Deletion skips the delete pipeline; release the finalizer.
    RemoveFinalizer,
}

impl Action {
    /// Returns a short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NoOp => "no-op",
            Self::Launch { .. } => "launch",
            Self::MarkComplete { .. } => "mark-complete",
            Self::MarkFailed { .. } => "mark-failed",
            Self::RemoveFinalizer => "remove-finalizer",
        }
    }
}
