//! Assembly of the configuration handed to the executor for one task pod.

use super::ReconcileError;
use crate::config::OrchestratorConfig;
use crate::pipeline::domain::{TaskClass, TaskType, TerraformStatus};
use crate::resource::domain::{
    EnvVar, Generation, ImagePullPolicy, PodRetention, ProxyOpts, SpecFingerprint,
    TerraformResource,
};
use crate::source::domain::{
    ConcreteSource, InjectionSet, ResolvedDownload, RunLayout, resolve_downloads,
    resolve_module, resolve_script,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Everything the executor needs to run one task pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskConfig {
    /// Task to run.
    pub task_type: TaskType,
    /// Generation the task runs for.
    pub generation: Generation,
    /// Pod name.
    pub pod_name: String,
    /// Pod labels.
    pub labels: BTreeMap<String, String>,
    /// Pod annotations.
    pub annotations: BTreeMap<String, String>,
    /// Container image with tag.
    pub image: String,
    /// Image pull policy.
    pub image_pull_policy: ImagePullPolicy,
    /// Module to fetch; set for setup tasks only.
    pub module: Option<ConcreteSource>,
    /// Script to execute instead of the image default.
    pub script: Option<ConcreteSource>,
    /// Extra resources to fetch; set for setup tasks only.
    pub downloads: Vec<ResolvedDownload>,
    /// Paths passed to Terraform with `-var-file`.
    pub var_files: Vec<String>,
    /// Clear the volume before fetching; setup tasks only.
    pub cleanup_disk: bool,
    /// Backend block.
    pub backend: String,
    /// Terraform version.
    pub terraform_version: String,
    /// Credential injections.
    pub injections: InjectionSet,
    /// Environment variables; names are unique.
    pub env: Vec<EnvVar>,
    /// Kubernetes `envFrom` sources.
    pub env_from: Vec<Value>,
    /// RBAC rules for the task service account.
    pub policy_rules: Vec<Value>,
    /// Kubernetes resource requirements.
    pub resources: Option<Value>,
    /// Service account name.
    pub service_account: String,
    /// Annotations for the service account.
    pub service_account_annotations: BTreeMap<String, String>,
    /// Run volume size.
    pub volume_size: String,
    /// SSH tunnel for private SCM hosts.
    pub ssh_tunnel: Option<ProxyOpts>,
    /// Secret receiving module outputs.
    pub outputs_secret: Option<String>,
    /// Pod cleanup policy.
    pub retention: PodRetention,
}

impl TaskConfig {
    /// Builds the configuration for `task_type` at the resource's current
    /// generation.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidSpec`] when the spec cannot be
    /// fingerprinted and [`ReconcileError::InvalidSource`] when a module,
    /// script or download source is unusable.
    pub fn assemble(
        resource: &TerraformResource,
        status: &TerraformStatus,
        task_type: TaskType,
        config: &OrchestratorConfig,
    ) -> Result<Self, ReconcileError> {
        let spec = resource.spec();
        let generation = resource.generation();
        let layout = RunLayout::new(&config.root_path, generation);
        let invalid_source = |source| ReconcileError::InvalidSource { task_type, source };

        let module = resolve_module(&spec.terraform_module, &layout).map_err(invalid_source)?;
        let setup = spec.setup.clone().unwrap_or_default();
        let downloads =
            resolve_downloads(&setup.resource_downloads, &layout).map_err(invalid_source)?;
        let scripts = spec
            .task_options_for(task_type)
            .map(|option| resolve_script(&option.script, task_type, &layout))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid_source)?;
        let script = scripts.into_iter().flatten().next_back();
        let fingerprint = SpecFingerprint::of(spec)
            .map_err(|source| ReconcileError::InvalidSpec { task_type, source })?;

        let namespace = resource.key().namespace();
        let injections = InjectionSet::materialize(&spec.credentials, namespace)
            .with_scm_auth(&spec.scm_auth_methods, namespace)
            .with_ssh_tunnel(spec.ssh_tunnel.as_ref(), namespace);

        let class = task_type.class();
        let image_override = spec.images.as_ref().and_then(|images| images.for_class(class));
        let base_image = image_override
            .map(|image| image.image.trim())
            .filter(|image| !image.is_empty())
            .unwrap_or_else(|| config.image_for(class));
        let tag = match class {
            TaskClass::Terraform => spec.terraform_version.trim(),
            TaskClass::Setup | TaskClass::Script => config.task_image_tag.trim(),
        };
        let image_pull_policy = image_override
            .and_then(|image| image.image_pull_policy)
            .unwrap_or(config.image_pull_policy);

        let is_setup = task_type.is_setup();
        let var_files = if class == TaskClass::Terraform {
            downloads
                .iter()
                .filter(|download| download.var_file)
                .map(|download| download.source.path.clone())
                .collect()
        } else {
            Vec::new()
        };

        let mut labels = BTreeMap::new();
        let mut annotations = BTreeMap::new();
        let mut env = standard_env(resource, task_type, &layout, script.as_ref(), config);
        let mut env_from = Vec::new();
        let mut policy_rules = Vec::new();
        let mut resources = None;
        for option in spec.task_options_for(task_type) {
            labels.extend(option.labels.clone());
            annotations.extend(option.annotations.clone());
            for var in &option.env {
                set_env(&mut env, var.clone());
            }
            env_from.extend(option.env_from.iter().cloned());
            policy_rules.extend(option.policy_rules.iter().cloned());
            if option.resources.is_some() {
                resources.clone_from(&option.resources);
            }
        }
        let prefix = status.pod_name_prefix();
        labels.insert(config.label("resourceName"), resource.key().name().to_owned());
        labels.insert(config.label("podPrefix"), prefix.as_str().to_owned());
        labels.insert(config.label("generation"), generation.to_string());
        labels.insert(config.label("task"), task_type.to_string());
        annotations.extend(injections.pod_annotations());
        annotations.insert(config.label("spec-fingerprint"), fingerprint.to_string());

        let service_account = match spec.service_account.trim() {
            "" => format!("tf-{}", resource.key().name()),
            name => name.to_owned(),
        };
        let volume_size = spec
            .persistent_volume_size
            .as_deref()
            .map(str::trim)
            .filter(|size| !size.is_empty())
            .unwrap_or(&config.default_volume_size)
            .to_owned();

        Ok(Self {
            task_type,
            generation,
            pod_name: prefix.pod_name(task_type, generation),
            labels,
            annotations,
            image: format!("{}:{tag}", strip_tag(base_image)),
            image_pull_policy,
            module: is_setup.then_some(module),
            script,
            downloads: if is_setup { downloads } else { Vec::new() },
            var_files,
            cleanup_disk: is_setup && setup.cleanup_disk,
            backend: spec.backend.clone(),
            terraform_version: spec.terraform_version.trim().to_owned(),
            service_account_annotations: injections.service_account_annotations(),
            injections,
            env,
            env_from,
            policy_rules,
            resources,
            service_account,
            volume_size,
            ssh_tunnel: spec.ssh_tunnel.clone(),
            outputs_secret: spec.output_policy().secret_name().map(str::to_owned),
            retention: spec.pod_retention(),
        })
    }

    /// Returns the value of an environment variable.
    #[must_use]
    pub fn env_value(&self, name: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|var| var.name == name)
            .map(|var| var.value.as_str())
    }
}

fn standard_env(
    resource: &TerraformResource,
    task_type: TaskType,
    layout: &RunLayout,
    script: Option<&ConcreteSource>,
    config: &OrchestratorConfig,
) -> Vec<EnvVar> {
    let mut env = vec![
        EnvVar::new("TFO_TASK", task_type.as_str()),
        EnvVar::new("TFO_GENERATION", resource.generation().to_string()),
        EnvVar::new("TFO_RESOURCE", resource.key().name()),
        EnvVar::new("TFO_NAMESPACE", resource.key().namespace()),
        EnvVar::new("TFO_ROOT_PATH", config.root_path.trim_end_matches('/')),
        EnvVar::new("TFO_GENERATION_PATH", layout.generation_dir()),
        EnvVar::new("TFO_MAIN_MODULE", layout.main_module_dir()),
        EnvVar::new(
            "TFO_TERRAFORM_VERSION",
            resource.spec().terraform_version.trim(),
        ),
    ];
    if let Some(source) = script {
        env.push(EnvVar::new("TFO_SCRIPT", source.path.as_str()));
    }
    env
}

fn set_env(env: &mut Vec<EnvVar>, var: EnvVar) {
    if let Some(existing) = env.iter_mut().find(|current| current.name == var.name) {
        *existing = var;
        return;
    }
    env.push(var);
}

/// Drops any tag or digest from an image reference, keeping registry ports.
fn strip_tag(image: &str) -> &str {
    let untagged = image.split_once('@').map_or(image, |(name, _)| name);
    let name_start = untagged.rfind('/').map_or(0, |index| index + 1);
    match untagged.rfind(':') {
        Some(colon) if colon >= name_start => untagged.get(..colon).unwrap_or(untagged),
        _ => untagged,
    }
}
