//! Which finished task pods to keep around.

use super::Generation;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Cleanup policy for task pods, derived from the resource spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PodRetention {
    /// Keep only pods of the current generation, finished or not.
    KeepLatestOnly,
    /// Keep every pod.
    KeepCompleted,
    /// Remove pods once they finish.
    #[default]
    RemoveCompleted,
}

impl PodRetention {
    /// Resolves the policy from the two spec flags.
    ///
    /// `keep_latest_pods_only` overrides `keep_completed_pods`; setting both
    /// is accepted and logged.
    #[must_use]
    pub fn from_flags(keep_latest_pods_only: bool, keep_completed_pods: bool) -> Self {
        match (keep_latest_pods_only, keep_completed_pods) {
            (true, true) => {
                warn!(
                    "keepLatestPodsOnly and keepCompletedPods are both set; keeping latest pods only"
                );
                Self::KeepLatestOnly
            }
            (true, false) => Self::KeepLatestOnly,
            (false, true) => Self::KeepCompleted,
            (false, false) => Self::RemoveCompleted,
        }
    }

    /// Returns whether a pod should be kept.
    #[must_use]
    pub fn retains(
        self,
        pod_generation: Generation,
        pod_finished: bool,
        current_generation: Generation,
    ) -> bool {
        match self {
            Self::KeepLatestOnly => pod_generation == current_generation,
            Self::KeepCompleted => true,
            Self::RemoveCompleted => !pod_finished,
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KeepLatestOnly => "keep-latest-only",
            Self::KeepCompleted => "keep-completed",
            Self::RemoveCompleted => "remove-completed",
        }
    }
}

impl fmt::Display for PodRetention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
