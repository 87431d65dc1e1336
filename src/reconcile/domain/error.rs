//! Error types for the reconcile decision.

use crate::pipeline::domain::TaskType;
use crate::resource::domain::ResourceDomainError;
use crate::source::domain::SourceError;
use thiserror::Error;

/// Reasons a task could not be configured for launch.
///
/// Both variants carry the task that was about to run so the failure can be
/// recorded against it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The desired spec failed validation.
    #[error("invalid spec for {task_type}: {source}")]
    InvalidSpec {
        /// Task that was about to run.
        task_type: TaskType,
        /// Validation failure.
        source: ResourceDomainError,
    },

    /// A module, script or download source is unusable.
    #[error("invalid source for {task_type}: {source}")]
    InvalidSource {
        /// Task that was about to run.
        task_type: TaskType,
        /// Resolution failure.
        source: SourceError,
    },
}

impl ReconcileError {
    /// Returns the task the failure is recorded against.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        match self {
            Self::InvalidSpec { task_type, .. } | Self::InvalidSource { task_type, .. } => {
                *task_type
            }
        }
    }

    /// Returns the underlying failure text, used as the stage reason.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidSpec { source, .. } => source.to_string(),
            Self::InvalidSource { source, .. } => source.to_string(),
        }
    }
}
