//! First-populated-alternative resolution for modules, scripts and
//! downloads.

use super::{ConcreteSource, RunLayout, SourceError, SourceKind, SourceOrigin};
use crate::pipeline::domain::TaskType;
use crate::resource::domain::{ConfigMapSelector, Module, ResourceDownload, StageScript};

/// A declaration offering up to three ways of providing content.
///
/// Alternatives are consulted in order: inline text, config map, remote
/// address.
pub trait SourceAlternatives {
    /// What the declaration feeds.
    const KIND: SourceKind;

    /// Inline content; empty when unset.
    fn inline(&self) -> &str;

    /// Config map reference, if any.
    fn config_map(&self) -> Option<&ConfigMapSelector>;

    /// Remote fetch address; empty when unset.
    fn address(&self) -> &str;

    /// Registry version qualifying the address; empty when unset.
    fn version(&self) -> &str {
        ""
    }
}

impl SourceAlternatives for Module {
    const KIND: SourceKind = SourceKind::Module;

    fn inline(&self) -> &str {
        &self.inline
    }

    fn config_map(&self) -> Option<&ConfigMapSelector> {
        self.config_map_selector.as_ref()
    }

    fn address(&self) -> &str {
        &self.source
    }

    fn version(&self) -> &str {
        &self.version
    }
}

impl SourceAlternatives for StageScript {
    const KIND: SourceKind = SourceKind::Script;

    fn inline(&self) -> &str {
        &self.inline
    }

    fn config_map(&self) -> Option<&ConfigMapSelector> {
        self.config_map_selector.as_ref()
    }

    fn address(&self) -> &str {
        &self.source
    }
}

impl SourceAlternatives for ResourceDownload {
    const KIND: SourceKind = SourceKind::Download;

    fn inline(&self) -> &str {
        ""
    }

    fn config_map(&self) -> Option<&ConfigMapSelector> {
        None
    }

    fn address(&self) -> &str {
        &self.address
    }
}

/// Picks the first populated alternative of `declaration`.
///
/// Inline content counts when it is non-empty, whitespace included. A
/// config map counts when its trimmed name is non-empty; a nameless
/// selector is ignored even if it names a key. Returns `Ok(None)` when
/// nothing is populated.
///
/// # Errors
///
/// Returns [`SourceError::InvalidSourceCombination`] when a version is set
/// without an address.
pub fn resolve<S: SourceAlternatives>(declaration: &S) -> Result<Option<SourceOrigin>, SourceError> {
    let inline = declaration.inline();
    if !inline.is_empty() {
        return Ok(Some(SourceOrigin::Inline {
            content: inline.to_owned(),
        }));
    }

    if let Some(selector) = declaration.config_map()
        && !selector.name.trim().is_empty()
    {
        return Ok(Some(SourceOrigin::ConfigMap {
            name: selector.name.trim().to_owned(),
            key: selector
                .key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_owned),
        }));
    }

    let address = declaration.address().trim();
    let version = declaration.version().trim();
    if address.is_empty() {
        if version.is_empty() {
            return Ok(None);
        }
        return Err(SourceError::InvalidSourceCombination {
            kind: S::KIND,
            reason: format!("version {version} given without a source address"),
        });
    }
    Ok(Some(SourceOrigin::Remote {
        address: address.to_owned(),
        version: (!version.is_empty()).then(|| version.to_owned()),
    }))
}

/// Resolves the Terraform module into the main module directory.
///
/// # Errors
///
/// Returns [`SourceError::EmptyModuleSource`] when no alternative is set,
/// plus any error from [`resolve`].
pub fn resolve_module(module: &Module, layout: &RunLayout) -> Result<ConcreteSource, SourceError> {
    let origin = resolve(module)?.ok_or(SourceError::EmptyModuleSource)?;
    Ok(ConcreteSource {
        origin,
        path: layout.main_module_dir(),
    })
}

/// Resolves a task script; `None` when the script declares nothing.
///
/// # Errors
///
/// Returns any error from [`resolve`].
pub fn resolve_script(
    script: &StageScript,
    task_type: TaskType,
    layout: &RunLayout,
) -> Result<Option<ConcreteSource>, SourceError> {
    Ok(resolve(script)?.map(|origin| ConcreteSource {
        origin,
        path: layout.script_path(task_type),
    }))
}

/// A setup download with its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    /// Address and destination.
    pub source: ConcreteSource,
    /// Whether Terraform reads the file with `-var-file`.
    pub var_file: bool,
}

/// Resolves every setup download in declaration order.
///
/// # Errors
///
/// Returns [`SourceError::EmptyDownloadAddress`] for a blank address and
/// [`SourceError::VarFileIsDirectory`] for a var-file entry whose address or
/// path ends in `/`.
pub fn resolve_downloads(
    downloads: &[ResourceDownload],
    layout: &RunLayout,
) -> Result<Vec<ResolvedDownload>, SourceError> {
    downloads
        .iter()
        .map(|download| {
            let origin = resolve(download)?.ok_or(SourceError::EmptyDownloadAddress)?;
            if download.use_as_var
                && (download.address.trim().ends_with('/') || download.path.trim().ends_with('/'))
            {
                return Err(SourceError::VarFileIsDirectory {
                    address: download.address.trim().to_owned(),
                });
            }
            Ok(ResolvedDownload {
                source: ConcreteSource {
                    origin,
                    path: layout.download_path(download.path.trim()),
                },
                var_file: download.use_as_var,
            })
        })
        .collect()
}
