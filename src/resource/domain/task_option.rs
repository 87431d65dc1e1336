//! Per-task overrides, images and setup options.

use super::{ResourceDownload, StageScript};
use crate::pipeline::domain::{ParseTaskTypeError, TaskClass, TaskType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Selects the task types a [`TaskOption`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TaskSelector {
    /// Every task type (`*`).
    All,
    /// One task type.
    Only(TaskType),
}

impl TaskSelector {
    /// Returns whether the selector matches `task_type`.
    #[must_use]
    pub fn matches(self, task_type: TaskType) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == task_type,
        }
    }
}

impl fmt::Display for TaskSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("*"),
            Self::Only(task_type) => f.write_str(task_type.as_str()),
        }
    }
}

impl TryFrom<String> for TaskSelector {
    type Error = ParseTaskTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim() == "*" {
            return Ok(Self::All);
        }
        TaskType::try_from(value.as_str()).map(Self::Only)
    }
}

impl From<TaskSelector> for String {
    fn from(value: TaskSelector) -> Self {
        value.to_string()
    }
}

/// An environment variable for task pods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    /// Variable name.
    pub name: String,
    /// Literal value.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    /// Kubernetes `valueFrom` source, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<Value>,
}

impl EnvVar {
    /// Creates a literal variable.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            value_from: None,
        }
    }
}

/// Configuration injected into the pods of selected task types.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOption {
    /// Task types the option applies to.
    #[serde(rename = "runTypes")]
    pub task_types: Vec<TaskSelector>,
    /// RBAC rules granted to the task service account (opaque).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_rules: Vec<Value>,
    /// Extra pod labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Extra pod annotations.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// Kubernetes `envFrom` sources (opaque).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_from: Vec<Value>,
    /// Environment variables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    /// Kubernetes resource requirements (opaque).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Value>,
    /// Script override for the selected tasks.
    #[serde(default, skip_serializing_if = "StageScript::is_empty")]
    pub script: StageScript,
}

impl TaskOption {
    /// Creates an option for the given selectors.
    #[must_use]
    pub fn for_tasks(task_types: impl IntoIterator<Item = TaskSelector>) -> Self {
        Self {
            task_types: task_types.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Returns whether the option applies to `task_type`.
    #[must_use]
    pub fn applies_to(&self, task_type: TaskType) -> bool {
        self.task_types
            .iter()
            .any(|selector| selector.matches(task_type))
    }

    /// Adds a pod label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Adds an environment variable.
    #[must_use]
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push(EnvVar::new(name, value));
        self
    }

    /// Sets the script override.
    #[must_use]
    pub fn with_script(mut self, script: StageScript) -> Self {
        self.script = script;
        self
    }
}

/// Kubernetes image pull policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImagePullPolicy {
    /// Always pull.
    Always,
    /// Never pull.
    Never,
    /// Pull when the image is missing on the node.
    #[default]
    IfNotPresent,
}

impl ImagePullPolicy {
    /// Returns the Kubernetes string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "Always",
            Self::Never => "Never",
            Self::IfNotPresent => "IfNotPresent",
        }
    }
}

/// Image for one task class; any tag on `image` is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Image repository.
    pub image: String,
    /// Pull policy; the operator default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<ImagePullPolicy>,
}

/// Per-class image overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Images {
    /// Image for init/plan/apply tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform: Option<ImageConfig>,
    /// Image for pre/post script tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<ImageConfig>,
    /// Image for setup tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<ImageConfig>,
}

impl Images {
    /// Returns the override for a task class.
    #[must_use]
    pub const fn for_class(&self, class: TaskClass) -> Option<&ImageConfig> {
        match class {
            TaskClass::Terraform => self.terraform.as_ref(),
            TaskClass::Script => self.script.as_ref(),
            TaskClass::Setup => self.setup.as_ref(),
        }
    }
}

/// Options that only affect setup tasks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    /// Extra resources fetched into the module directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_downloads: Vec<ResourceDownload>,
    /// Clear previous run data from the volume before fetching.
    #[serde(default)]
    pub cleanup_disk: bool,
}
