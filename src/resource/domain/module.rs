//! Module, script and download source declarations.

use serde::{Deserialize, Serialize};

/// Selects a config map, and optionally one key of it, in the resource's
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigMapSelector {
    /// Config map name.
    pub name: String,
    /// Key holding the content; the whole map is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ConfigMapSelector {
    /// Creates a selector for a whole config map.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
        }
    }

    /// Narrows the selector to one key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Where the Terraform module comes from.
///
/// Precedence when several fields are set: `inline`, then
/// `config_map_selector`, then `source`/`version`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Terraform module source address (git, registry, http).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Registry version; requires `source`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Config map holding the module files.
    #[serde(
        default,
        rename = "configMapSeclector",
        alias = "configMapSelector",
        skip_serializing_if = "Option::is_none"
    )]
    pub config_map_selector: Option<ConfigMapSelector>,
    /// Entire module written inline.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub inline: String,
}

impl Module {
    /// Creates a module fetched from a source address.
    #[must_use]
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Creates a module written inline.
    #[must_use]
    pub fn inline(content: impl Into<String>) -> Self {
        Self {
            inline: content.into(),
            ..Self::default()
        }
    }

    /// Creates a module read from a config map.
    #[must_use]
    pub fn from_config_map(selector: ConfigMapSelector) -> Self {
        Self {
            config_map_selector: Some(selector),
            ..Self::default()
        }
    }

    /// Sets the registry version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// Where a task's executable script comes from.
///
/// Precedence when several fields are set: `inline`, then
/// `config_map_selector`, then `source`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageScript {
    /// HTTP address the task fetches and executes.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Config map holding the script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_selector: Option<ConfigMapSelector>,
    /// Script written inline.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub inline: String,
}

impl StageScript {
    /// Creates an inline script.
    #[must_use]
    pub fn inline(content: impl Into<String>) -> Self {
        Self {
            inline: content.into(),
            ..Self::default()
        }
    }

    /// Creates a script fetched over the network.
    #[must_use]
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Returns whether no alternative is populated.
    ///
    /// Inline text counts even when it is only whitespace; the source
    /// address and config map name are trimmed first.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inline.is_empty()
            && self.source.trim().is_empty()
            && self
                .config_map_selector
                .as_ref()
                .is_none_or(|selector| selector.name.trim().is_empty())
    }
}

/// An extra resource fetched into the module directory by the setup task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDownload {
    /// Address to fetch (`git::ssh://`, `https://`, ...).
    pub address: String,
    /// Destination relative to the main module directory.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Pass the downloaded file to Terraform with `-var-file`.
    #[serde(default)]
    pub use_as_var: bool,
}

impl ResourceDownload {
    /// Creates a download into the main module directory.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Sets the destination path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Marks the download as a Terraform variables file.
    #[must_use]
    pub fn as_var_file(mut self) -> Self {
        self.use_as_var = true;
        self
    }
}
