//! Stable digest of a desired spec.

use super::{ResourceDomainError, TerraformSpec};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Digest of a [`TerraformSpec`], written to task pod annotations so that a
/// pod can be matched to the spec it was launched for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecFingerprint(String);

impl SpecFingerprint {
    /// Hashes the canonical JSON form of `spec`.
    ///
    /// Object keys are emitted in sorted order, so field order in the input
    /// does not affect the digest.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceDomainError::Fingerprint`] when the spec cannot be
    /// serialized.
    pub fn of(spec: &TerraformSpec) -> Result<Self, ResourceDomainError> {
        let value = serde_json::to_value(spec)
            .map_err(|err| ResourceDomainError::Fingerprint(err.to_string()))?;
        let canonical = serde_json::to_string(&value)
            .map_err(|err| ResourceDomainError::Fingerprint(err.to_string()))?;
        let digest = Sha256::digest(canonical.as_bytes());
        let prefix = digest.get(..16).unwrap_or(digest.as_slice());
        Ok(Self(format!("sha256:{}", hex::encode(prefix))))
    }

    /// Returns the digest string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpecFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
