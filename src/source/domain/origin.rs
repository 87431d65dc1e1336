//! Resolved source descriptors and the on-volume layout they are placed in.

use crate::pipeline::domain::TaskType;
use crate::resource::domain::Generation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a source declaration feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// The Terraform module.
    Module,
    /// A task script.
    Script,
    /// An extra resource fetched by setup.
    Download,
}

impl SourceKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Script => "script",
            Self::Download => "download",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where resolved content comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SourceOrigin {
    /// Content written in the resource itself.
    Inline {
        /// The content.
        content: String,
    },
    /// Content held in a config map in the resource namespace.
    ConfigMap {
        /// Config map name.
        name: String,
        /// Key holding the content; the whole map when absent.
        key: Option<String>,
    },
    /// Content fetched by the task from an address.
    Remote {
        /// Fetch address.
        address: String,
        /// Registry version, if any.
        version: Option<String>,
    },
}

/// A source together with the path the task reads it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcreteSource {
    /// Where the content comes from.
    pub origin: SourceOrigin,
    /// Mount or fetch destination on the run volume.
    pub path: String,
}

/// Paths on the run volume for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    root: String,
    generation: Generation,
}

impl RunLayout {
    /// Creates the layout rooted at `root` (trailing slashes are ignored).
    #[must_use]
    pub fn new(root: &str, generation: Generation) -> Self {
        Self {
            root: root.trim_end_matches('/').to_owned(),
            generation,
        }
    }

    /// Returns the directory holding this generation's files.
    #[must_use]
    pub fn generation_dir(&self) -> String {
        format!("{}/generations/{}", self.root, self.generation)
    }

    /// Returns the main module directory.
    #[must_use]
    pub fn main_module_dir(&self) -> String {
        format!("{}/main", self.generation_dir())
    }

    /// Returns where the script for `task_type` is mounted.
    #[must_use]
    pub fn script_path(&self, task_type: TaskType) -> String {
        format!("{}/{}.sh", self.generation_dir(), task_type)
    }

    /// Returns where a download with the relative `path` lands.
    #[must_use]
    pub fn download_path(&self, path: &str) -> String {
        let relative = path.trim_start_matches("./").trim_matches('/');
        if relative.is_empty() {
            self.main_module_dir()
        } else {
            format!("{}/{relative}", self.main_module_dir())
        }
    }
}
