//! Identity and generation types for Terraform resources.

use super::ResourceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic version of a resource's desired spec.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(i64);

impl Generation {
    /// Generation of a status that has never completed a pipeline.
    pub const ZERO: Self = Self(0);

    /// Wraps a raw generation number.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw generation number.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Namespaced identity of a Terraform resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey {
    namespace: String,
    name: String,
}

impl ResourceKey {
    /// Creates a validated resource key.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceDomainError::EmptyResourceName`] or
    /// [`ResourceDomainError::EmptyNamespace`] when either part is blank.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ResourceDomainError> {
        let raw_namespace = namespace.into();
        let raw_name = name.into();
        let trimmed_namespace = raw_namespace.trim();
        let trimmed_name = raw_name.trim();
        if trimmed_namespace.is_empty() {
            return Err(ResourceDomainError::EmptyNamespace);
        }
        if trimmed_name.is_empty() {
            return Err(ResourceDomainError::EmptyResourceName);
        }
        Ok(Self {
            namespace: trimmed_namespace.to_owned(),
            name: trimmed_name.to_owned(),
        })
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
