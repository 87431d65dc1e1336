//! The desired-state resource read by every reconcile pass.

use super::{
    Credentials, Generation, Images, Module, OutputPolicy, PodRetention, ProxyOpts,
    ResourceDomainError, ResourceKey, ScmAuthMethod, Setup, TaskOption,
};
use crate::pipeline::domain::TaskType;
use serde::{Deserialize, Serialize};

/// Declarative description of a Terraform module run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerraformSpec {
    /// Remove pods from older generations.
    #[serde(default)]
    pub keep_latest_pods_only: bool,
    /// Keep pods after they finish.
    #[serde(default)]
    pub keep_completed_pods: bool,
    /// Secret receiving module outputs.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub outputs_secret: String,
    /// Outputs to publish; all when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs_to_include: Vec<String>,
    /// Outputs never to publish.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs_to_omit: Vec<String>,
    /// Copy outputs into the resource status.
    #[serde(default)]
    pub write_outputs_to_status: bool,
    /// Size of the run volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume_size: Option<String>,
    /// Service account for task pods.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_account: String,
    /// Provider credentials.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<Credentials>,
    /// Skip the delete pipeline when the resource is deleted.
    #[serde(default)]
    pub ignore_delete: bool,
    /// SSH tunnel for private SCM hosts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_tunnel: Option<ProxyOpts>,
    /// Per-host SCM authentication.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scm_auth_methods: Vec<ScmAuthMethod>,
    /// Image overrides per task class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Images>,
    /// Setup task options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Setup>,
    /// The module to run.
    pub terraform_module: Module,
    /// Terraform version, used as the terraform image tag.
    #[serde(default)]
    pub terraform_version: String,
    /// Backend block written verbatim into the module.
    #[serde(default)]
    pub backend: String,
    /// Per-task overrides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub task_options: Vec<TaskOption>,
}

impl TerraformSpec {
    /// Creates a spec with the three mandatory fields.
    #[must_use]
    pub fn new(
        terraform_module: Module,
        terraform_version: impl Into<String>,
        backend: impl Into<String>,
    ) -> Self {
        Self {
            terraform_module,
            terraform_version: terraform_version.into(),
            backend: backend.into(),
            ..Self::default()
        }
    }

    /// Checks the mandatory fields.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceDomainError::MissingTerraformVersion`] or
    /// [`ResourceDomainError::MissingBackend`] for blank fields, and
    /// [`ResourceDomainError::InvalidBackend`] when `backend` does not look
    /// like a backend block.
    pub fn validate(&self) -> Result<(), ResourceDomainError> {
        if self.terraform_version.trim().is_empty() {
            return Err(ResourceDomainError::MissingTerraformVersion);
        }
        let backend = self.backend.trim();
        if backend.is_empty() {
            return Err(ResourceDomainError::MissingBackend);
        }
        if !backend.contains("backend") {
            return Err(ResourceDomainError::InvalidBackend(
                "no backend block found".to_owned(),
            ));
        }
        if !braces_balanced(backend) {
            return Err(ResourceDomainError::InvalidBackend(
                "unbalanced braces".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns the pod cleanup policy.
    #[must_use]
    pub fn pod_retention(&self) -> PodRetention {
        PodRetention::from_flags(self.keep_latest_pods_only, self.keep_completed_pods)
    }

    /// Returns the output publication policy.
    #[must_use]
    pub fn output_policy(&self) -> OutputPolicy {
        let policy = OutputPolicy::new()
            .including(self.outputs_to_include.iter().cloned())
            .omitting(self.outputs_to_omit.iter().cloned())
            .writing_to_status(self.write_outputs_to_status);
        if self.outputs_secret.trim().is_empty() {
            policy
        } else {
            policy.with_secret(self.outputs_secret.trim())
        }
    }

    /// Returns the task options applying to `task_type`, in declaration
    /// order.
    pub fn task_options_for(&self, task_type: TaskType) -> impl Iterator<Item = &TaskOption> {
        self.task_options
            .iter()
            .filter(move |option| option.applies_to(task_type))
    }
}

fn braces_balanced(text: &str) -> bool {
    let mut depth: usize = 0;
    for ch in text.chars() {
        match ch {
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(remaining) => depth = remaining,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// A Terraform resource as observed by the control loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerraformResource {
    key: ResourceKey,
    generation: Generation,
    #[serde(default)]
    deletion_requested: bool,
    spec: TerraformSpec,
}

impl TerraformResource {
    /// Creates a resource that is not being deleted.
    #[must_use]
    pub const fn new(key: ResourceKey, generation: Generation, spec: TerraformSpec) -> Self {
        Self {
            key,
            generation,
            deletion_requested: false,
            spec,
        }
    }

    /// Sets the deletion flag.
    #[must_use]
    pub const fn with_deletion_requested(mut self, requested: bool) -> Self {
        self.deletion_requested = requested;
        self
    }

    /// Returns the resource key.
    #[must_use]
    pub const fn key(&self) -> &ResourceKey {
        &self.key
    }

    /// Returns the spec generation.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns whether deletion has been requested.
    #[must_use]
    pub const fn deletion_requested(&self) -> bool {
        self.deletion_requested
    }

    /// Returns the desired spec.
    #[must_use]
    pub const fn spec(&self) -> &TerraformSpec {
        &self.spec
    }
}
