//! Pure source and credential resolution.

mod credential;
mod error;
mod origin;
mod resolver;

pub use credential::{
    IRSA_ANNOTATION, InjectionDirective, InjectionKey, InjectionSet, KIAM_ANNOTATION,
    SecretLocation,
};
pub use error::SourceError;
pub use origin::{ConcreteSource, RunLayout, SourceKind, SourceOrigin};
pub use resolver::{
    ResolvedDownload, SourceAlternatives, resolve, resolve_downloads, resolve_module,
    resolve_script,
};
