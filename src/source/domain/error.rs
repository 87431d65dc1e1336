//! Error types for source resolution.

use super::SourceKind;
use thiserror::Error;

/// Errors returned while resolving a module, script or download source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The populated fields do not describe a usable source.
    #[error("invalid {kind} source: {reason}")]
    InvalidSourceCombination {
        /// What was being resolved.
        kind: SourceKind,
        /// Why the combination is rejected.
        reason: String,
    },

    /// No module source alternative is populated.
    #[error("terraformModule must set one of inline, configMapSeclector or source")]
    EmptyModuleSource,

    /// A var-file download points at a directory.
    #[error("resource download {address} is used as a var file but is a directory")]
    VarFileIsDirectory {
        /// Address of the offending download.
        address: String,
    },

    /// A resource download has no address.
    #[error("resource download address must not be empty")]
    EmptyDownloadAddress,
}
