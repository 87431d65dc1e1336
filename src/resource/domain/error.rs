//! Error types for desired-state validation.

use thiserror::Error;

/// Errors returned while validating a Terraform resource.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResourceDomainError {
    /// The resource namespace is blank.
    #[error("resource namespace must not be empty")]
    EmptyNamespace,

    /// The resource name is blank.
    #[error("resource name must not be empty")]
    EmptyResourceName,

    /// `terraformVersion` is blank.
    #[error("terraformVersion is required")]
    MissingTerraformVersion,

    /// `backend` is blank.
    #[error("backend is required")]
    MissingBackend,

    /// `backend` is not a Terraform backend block.
    #[error("backend is not a valid terraform backend block: {0}")]
    InvalidBackend(String),

    /// The spec could not be serialized for fingerprinting.
    #[error("cannot fingerprint spec: {0}")]
    Fingerprint(String),
}
