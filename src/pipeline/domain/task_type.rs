//! Task types and the two fixed lifecycle sequences.

use super::ParseTaskTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two pipelines a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lifecycle {
    /// Create or update the infrastructure described by the module.
    Apply,
    /// Tear the infrastructure down before the resource is removed.
    Delete,
}

impl Lifecycle {
    /// Returns the ordered task sequence for this lifecycle.
    #[must_use]
    pub const fn sequence(self) -> &'static [TaskType; 10] {
        match self {
            Self::Apply => &APPLY_SEQUENCE,
            Self::Delete => &DELETE_SEQUENCE,
        }
    }

    /// Returns the first task of this lifecycle.
    #[must_use]
    pub const fn first(self) -> TaskType {
        match self {
            Self::Apply => TaskType::Setup,
            Self::Delete => TaskType::SetupDelete,
        }
    }

    /// Returns the final task of this lifecycle.
    #[must_use]
    pub const fn last(self) -> TaskType {
        match self {
            Self::Apply => TaskType::PostApply,
            Self::Delete => TaskType::PostApplyDelete,
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container image family used to execute a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskClass {
    /// Fetches the module and downloads into the shared volume.
    Setup,
    /// Runs the Terraform CLI.
    Terraform,
    /// Runs a user-provided script around the Terraform steps.
    Script,
}

impl TaskClass {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Terraform => "terraform",
            Self::Script => "script",
        }
    }
}

impl fmt::Display for TaskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named step of the apply or delete pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TaskType {
    /// Prepares the run volume and fetches the module.
    Setup,
    /// Script before `terraform init`.
    PreInit,
    /// `terraform init`.
    Init,
    /// Script after `terraform init`.
    PostInit,
    /// Script before `terraform plan`.
    PrePlan,
    /// `terraform plan`.
    Plan,
    /// Script after `terraform plan`.
    PostPlan,
    /// Script before `terraform apply`.
    PreApply,
    /// `terraform apply`.
    Apply,
    /// Script after `terraform apply`.
    PostApply,
    /// Delete-path setup.
    SetupDelete,
    /// Delete-path script before init.
    PreInitDelete,
    /// Delete-path `terraform init`.
    InitDelete,
    /// Delete-path script after init.
    PostInitDelete,
    /// Delete-path script before plan.
    PrePlanDelete,
    /// `terraform plan -destroy`.
    PlanDelete,
    /// Delete-path script after plan.
    PostPlanDelete,
    /// Delete-path script before apply.
    PreApplyDelete,
    /// `terraform apply` of the destroy plan.
    ApplyDelete,
    /// Delete-path script after apply.
    PostApplyDelete,
}

const APPLY_SEQUENCE: [TaskType; 10] = [
    TaskType::Setup,
    TaskType::PreInit,
    TaskType::Init,
    TaskType::PostInit,
    TaskType::PrePlan,
    TaskType::Plan,
    TaskType::PostPlan,
    TaskType::PreApply,
    TaskType::Apply,
    TaskType::PostApply,
];

const DELETE_SEQUENCE: [TaskType; 10] = [
    TaskType::SetupDelete,
    TaskType::PreInitDelete,
    TaskType::InitDelete,
    TaskType::PostInitDelete,
    TaskType::PrePlanDelete,
    TaskType::PlanDelete,
    TaskType::PostPlanDelete,
    TaskType::PreApplyDelete,
    TaskType::ApplyDelete,
    TaskType::PostApplyDelete,
];

impl TaskType {
    /// Every task type, apply path first.
    pub const ALL: [Self; 20] = [
        Self::Setup,
        Self::PreInit,
        Self::Init,
        Self::PostInit,
        Self::PrePlan,
        Self::Plan,
        Self::PostPlan,
        Self::PreApply,
        Self::Apply,
        Self::PostApply,
        Self::SetupDelete,
        Self::PreInitDelete,
        Self::InitDelete,
        Self::PostInitDelete,
        Self::PrePlanDelete,
        Self::PlanDelete,
        Self::PostPlanDelete,
        Self::PreApplyDelete,
        Self::ApplyDelete,
        Self::PostApplyDelete,
    ];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::PreInit => "preinit",
            Self::Init => "init",
            Self::PostInit => "postinit",
            Self::PrePlan => "preplan",
            Self::Plan => "plan",
            Self::PostPlan => "postplan",
            Self::PreApply => "preapply",
            Self::Apply => "apply",
            Self::PostApply => "postapply",
            Self::SetupDelete => "setup-delete",
            Self::PreInitDelete => "preinit-delete",
            Self::InitDelete => "init-delete",
            Self::PostInitDelete => "postinit-delete",
            Self::PrePlanDelete => "preplan-delete",
            Self::PlanDelete => "plan-delete",
            Self::PostPlanDelete => "postplan-delete",
            Self::PreApplyDelete => "preapply-delete",
            Self::ApplyDelete => "apply-delete",
            Self::PostApplyDelete => "postapply-delete",
        }
    }

    /// Returns the lifecycle this task belongs to.
    #[must_use]
    pub const fn lifecycle(self) -> Lifecycle {
        match self {
            Self::Setup
            | Self::PreInit
            | Self::Init
            | Self::PostInit
            | Self::PrePlan
            | Self::Plan
            | Self::PostPlan
            | Self::PreApply
            | Self::Apply
            | Self::PostApply => Lifecycle::Apply,
            Self::SetupDelete
            | Self::PreInitDelete
            | Self::InitDelete
            | Self::PostInitDelete
            | Self::PrePlanDelete
            | Self::PlanDelete
            | Self::PostPlanDelete
            | Self::PreApplyDelete
            | Self::ApplyDelete
            | Self::PostApplyDelete => Lifecycle::Delete,
        }
    }

    /// Returns the zero-based position within the task's lifecycle.
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Setup | Self::SetupDelete => 0,
            Self::PreInit | Self::PreInitDelete => 1,
            Self::Init | Self::InitDelete => 2,
            Self::PostInit | Self::PostInitDelete => 3,
            Self::PrePlan | Self::PrePlanDelete => 4,
            Self::Plan | Self::PlanDelete => 5,
            Self::PostPlan | Self::PostPlanDelete => 6,
            Self::PreApply | Self::PreApplyDelete => 7,
            Self::Apply | Self::ApplyDelete => 8,
            Self::PostApply | Self::PostApplyDelete => 9,
        }
    }

    /// Returns the task that follows this one, or `None` at the end of the
    /// lifecycle.
    #[must_use]
    pub fn successor(self) -> Option<Self> {
        self.lifecycle()
            .sequence()
            .get(self.position() + 1)
            .copied()
    }

    /// Returns whether this is the first task of its lifecycle.
    #[must_use]
    pub const fn is_setup(self) -> bool {
        matches!(self, Self::Setup | Self::SetupDelete)
    }

    /// Returns whether this is the final task of its lifecycle.
    #[must_use]
    pub const fn is_last(self) -> bool {
        matches!(self, Self::PostApply | Self::PostApplyDelete)
    }

    /// Returns whether a newer generation may preempt this task.
    ///
    /// Apply steps mutate real infrastructure and must run to completion.
    #[must_use]
    pub const fn is_interruptible(self) -> bool {
        !matches!(self, Self::Apply | Self::ApplyDelete)
    }

    /// Returns the image family that executes this task.
    #[must_use]
    pub const fn class(self) -> TaskClass {
        match self {
            Self::Setup | Self::SetupDelete => TaskClass::Setup,
            Self::Init
            | Self::Plan
            | Self::Apply
            | Self::InitDelete
            | Self::PlanDelete
            | Self::ApplyDelete => TaskClass::Terraform,
            Self::PreInit
            | Self::PostInit
            | Self::PrePlan
            | Self::PostPlan
            | Self::PreApply
            | Self::PostApply
            | Self::PreInitDelete
            | Self::PostInitDelete
            | Self::PrePlanDelete
            | Self::PostPlanDelete
            | Self::PreApplyDelete
            | Self::PostApplyDelete => TaskClass::Script,
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskType {
    type Error = ParseTaskTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|task| task.as_str() == normalized)
            .ok_or_else(|| ParseTaskTypeError(value.to_owned()))
    }
}

impl TryFrom<String> for TaskType {
    type Error = ParseTaskTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<TaskType> for String {
    fn from(value: TaskType) -> Self {
        value.as_str().to_owned()
    }
}
