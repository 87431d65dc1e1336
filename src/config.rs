//! Operator-wide defaults applied when a resource leaves a setting unset.

use crate::pipeline::domain::TaskClass;
use crate::resource::domain::ImagePullPolicy;

/// Operator defaults used while assembling task configuration.
///
/// # Examples
///
/// ```
/// use tfo_orchestrator::config::OrchestratorConfig;
///
/// let config = OrchestratorConfig::default().with_root_path("/data");
/// assert_eq!(config.root_path, "/data");
/// assert_eq!(config.default_volume_size, "2Gi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Image for setup tasks.
    pub setup_image: String,
    /// Image for pre/post script tasks.
    pub script_image: String,
    /// Image for init/plan/apply tasks; its tag becomes the Terraform
    /// version.
    pub terraform_image: String,
    /// Tag applied to setup and script images.
    pub task_image_tag: String,
    /// Pull policy when the resource sets none.
    pub image_pull_policy: ImagePullPolicy,
    /// Mount point of the run volume inside task pods.
    pub root_path: String,
    /// Volume size when the resource sets none.
    pub default_volume_size: String,
    /// Prefix for labels written on task pods.
    pub label_prefix: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            setup_image: "ghcr.io/galleybytes/terraform-operator-setup".to_owned(),
            script_image: "ghcr.io/galleybytes/terraform-operator-script".to_owned(),
            terraform_image: "ghcr.io/galleybytes/terraform-operator-tftaskv1.1.0".to_owned(),
            task_image_tag: "1.1.0".to_owned(),
            image_pull_policy: ImagePullPolicy::IfNotPresent,
            root_path: "/home/tfo-runner".to_owned(),
            default_volume_size: "2Gi".to_owned(),
            label_prefix: "tf.galleybytes.com".to_owned(),
        }
    }
}

impl OrchestratorConfig {
    /// Returns the default image for a task class.
    #[must_use]
    pub fn image_for(&self, class: TaskClass) -> &str {
        match class {
            TaskClass::Setup => &self.setup_image,
            TaskClass::Script => &self.script_image,
            TaskClass::Terraform => &self.terraform_image,
        }
    }

    /// Returns `<label_prefix>/<name>`.
    #[must_use]
    pub fn label(&self, name: &str) -> String {
        format!("{}/{name}", self.label_prefix)
    }

    /// Overrides the image for a task class.
    #[must_use]
    pub fn with_image(mut self, class: TaskClass, image: impl Into<String>) -> Self {
        let value = image.into();
        match class {
            TaskClass::Setup => self.setup_image = value,
            TaskClass::Script => self.script_image = value,
            TaskClass::Terraform => self.terraform_image = value,
        }
        self
    }

    /// Overrides the tag used for setup and script images.
    #[must_use]
    pub fn with_task_image_tag(mut self, tag: impl Into<String>) -> Self {
        self.task_image_tag = tag.into();
        self
    }

    /// Overrides the default pull policy.
    #[must_use]
    pub const fn with_image_pull_policy(mut self, policy: ImagePullPolicy) -> Self {
        self.image_pull_policy = policy;
        self
    }

    /// Overrides the run volume mount point.
    #[must_use]
    pub fn with_root_path(mut self, root_path: impl Into<String>) -> Self {
        self.root_path = root_path.into();
        self
    }

    /// Overrides the default volume size.
    #[must_use]
    pub fn with_default_volume_size(mut self, size: impl Into<String>) -> Self {
        self.default_volume_size = size.into();
        self
    }

    /// Overrides the label prefix.
    #[must_use]
    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }
}
