//! Observed status of a Terraform resource.

use super::{ExportStatus, Generation, Phase, Stage, TaskType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Stable identity for every pod and helper resource of one installation.
///
/// The random suffix keeps a quickly deleted and recreated resource from
/// adopting pods of its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PodNamePrefix(String);

impl PodNamePrefix {
    /// Longest resource-name portion kept in the prefix.
    pub const MAX_NAME_CHARS: usize = 220;

    const SUFFIX_CHARS: usize = 8;

    /// Generates a new prefix for the named resource.
    #[must_use]
    pub fn generate(resource_name: &str) -> Self {
        let name: String = resource_name
            .trim()
            .chars()
            .take(Self::MAX_NAME_CHARS)
            .collect();
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(Self::SUFFIX_CHARS)
            .collect();
        Self(format!("{name}-{suffix}"))
    }

    /// Reconstructs a prefix from persisted status.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the prefix as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the deterministic pod name for a task of a generation.
    #[must_use]
    pub fn pod_name(&self, task_type: TaskType, generation: Generation) -> String {
        format!("{}-v{generation}-{task_type}", self.0)
    }
}

impl fmt::Display for PodNamePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observed state of a Terraform resource.
///
/// Only [`super::StageTracker`] mutates a status; everything else reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerraformStatus {
    pub(super) pod_name_prefix: PodNamePrefix,
    pub(super) phase: Phase,
    pub(super) last_completed_generation: Generation,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(super) outputs: BTreeMap<String, String>,
    #[serde(default)]
    pub(super) stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) stage: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) exported: Option<ExportStatus>,
}

impl TerraformStatus {
    /// Creates an empty status for a resource that has never run a task.
    #[must_use]
    pub const fn new(pod_name_prefix: PodNamePrefix) -> Self {
        Self {
            pod_name_prefix,
            phase: Phase::Initializing,
            last_completed_generation: Generation::ZERO,
            outputs: BTreeMap::new(),
            stages: Vec::new(),
            stage: None,
            exported: None,
        }
    }

    /// Returns the pod-name prefix.
    #[must_use]
    pub const fn pod_name_prefix(&self) -> &PodNamePrefix {
        &self.pod_name_prefix
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the generation whose pipeline last ran to completion.
    #[must_use]
    pub const fn last_completed_generation(&self) -> Generation {
        self.last_completed_generation
    }

    /// Returns the published module outputs.
    #[must_use]
    pub const fn outputs(&self) -> &BTreeMap<String, String> {
        &self.outputs
    }

    /// Returns the stage history in launch order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Returns the current stage, if any task has been launched.
    #[must_use]
    pub const fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    /// Returns the export status, if export has been tracked.
    #[must_use]
    pub const fn exported(&self) -> Option<ExportStatus> {
        self.exported
    }

    /// Finds the recorded stage for a generation and task type.
    #[must_use]
    pub fn find_stage(&self, generation: Generation, task_type: TaskType) -> Option<&Stage> {
        self.stages
            .iter()
            .find(|stage| stage.generation() == generation && stage.task_type() == task_type)
    }

    /// Copies the current stage over the newest history record.
    pub(super) fn sync_history(&mut self) {
        if let (Some(current), Some(latest)) = (self.stage.as_ref(), self.stages.last_mut()) {
            latest.clone_from(current);
        }
    }
}
