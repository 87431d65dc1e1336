//! Coarse lifecycle phase and export status.

use super::{Lifecycle, ParsePhaseError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle intent of the resource as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// The apply pipeline is starting.
    #[default]
    Initializing,
    /// Apply-path tasks are running.
    Running,
    /// The apply pipeline finished for the last completed generation.
    Completed,
    /// The delete pipeline is starting.
    InitializingDelete,
    /// Delete-path tasks are running.
    Deleting,
    /// The delete pipeline finished.
    Deleted,
}

impl Phase {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::InitializingDelete => "initializing-delete",
            Self::Deleting => "deleting",
            Self::Deleted => "deleted",
        }
    }

    /// Phase entered when the first task of `lifecycle` launches.
    #[must_use]
    pub const fn starting(lifecycle: Lifecycle) -> Self {
        match lifecycle {
            Lifecycle::Apply => Self::Initializing,
            Lifecycle::Delete => Self::InitializingDelete,
        }
    }

    /// Phase held while later tasks of `lifecycle` run.
    #[must_use]
    pub const fn running(lifecycle: Lifecycle) -> Self {
        match lifecycle {
            Lifecycle::Apply => Self::Running,
            Lifecycle::Delete => Self::Deleting,
        }
    }

    /// Phase entered when the last task of `lifecycle` completes.
    #[must_use]
    pub const fn finished(lifecycle: Lifecycle) -> Self {
        match lifecycle {
            Lifecycle::Apply => Self::Completed,
            Lifecycle::Delete => Self::Deleted,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Phase {
    type Error = ParsePhaseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "initializing" => Ok(Self::Initializing),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "initializing-delete" => Ok(Self::InitializingDelete),
            "deleting" => Ok(Self::Deleting),
            "deleted" => Ok(Self::Deleted),
            _ => Err(ParsePhaseError(value.to_owned())),
        }
    }
}

/// Progress of exporting the module's variables to an SCM repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportStatus {
    /// Export finished.
    #[serde(rename = "true")]
    Exported,
    /// Export is not configured or was not attempted.
    #[serde(rename = "false")]
    NotExported,
    /// Export is running.
    InProgress,
    /// Export failed.
    Failed,
    /// Export is waiting for the pipeline.
    Pending,
    /// Export task is being created.
    Creating,
}

impl ExportStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exported => "true",
            Self::NotExported => "false",
            Self::InProgress => "in-progress",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::Creating => "creating",
        }
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
