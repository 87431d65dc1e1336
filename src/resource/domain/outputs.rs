//! Filtering of module outputs before they are published.

use std::collections::BTreeMap;

/// How module outputs are published.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputPolicy {
    secret_name: Option<String>,
    include: Vec<String>,
    omit: Vec<String>,
    write_to_status: bool,
}

impl OutputPolicy {
    /// Creates a policy that publishes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes outputs to the given secret.
    #[must_use]
    pub fn with_secret(mut self, secret_name: impl Into<String>) -> Self {
        self.secret_name = Some(secret_name.into());
        self
    }

    /// Restricts publication to the listed outputs.
    #[must_use]
    pub fn including(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.include = names.into_iter().collect();
        self
    }

    /// Drops the listed outputs.
    #[must_use]
    pub fn omitting(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.omit = names.into_iter().collect();
        self
    }

    /// Also writes outputs to the resource status.
    #[must_use]
    pub const fn writing_to_status(mut self, enabled: bool) -> Self {
        self.write_to_status = enabled;
        self
    }

    /// Returns the outputs secret name, if configured.
    #[must_use]
    pub fn secret_name(&self) -> Option<&str> {
        self.secret_name.as_deref()
    }

    /// Returns whether outputs are written to the status.
    #[must_use]
    pub const fn writes_to_status(&self) -> bool {
        self.write_to_status
    }

    /// Applies the include list, then the omit list.
    #[must_use]
    pub fn filter(&self, outputs: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        outputs
            .iter()
            .filter(|(name, _)| self.include.is_empty() || self.include.contains(name))
            .filter(|(name, _)| !self.omit.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}
