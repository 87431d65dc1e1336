//! Domain model for the desired-state Terraform resource.

mod credentials;
mod error;
mod fingerprint;
mod ids;
mod module;
mod outputs;
mod retention;
mod spec;
mod task_option;

pub use credentials::{
    AwsCredentials, Credentials, GitHttps, GitScm, GitSsh, ProxyOpts, ScmAuthMethod,
    SecretNameRef, SshKeySecretRef, TokenSecretRef,
};
pub use error::ResourceDomainError;
pub use fingerprint::SpecFingerprint;
pub use ids::{Generation, ResourceKey};
pub use module::{ConfigMapSelector, Module, ResourceDownload, StageScript};
pub use outputs::OutputPolicy;
pub use retention::PodRetention;
pub use spec::{TerraformResource, TerraformSpec};
pub use task_option::{
    EnvVar, ImageConfig, ImagePullPolicy, Images, Setup, TaskOption, TaskSelector,
};
