//! Source resolution and credential planning for task pods.
//!
//! Both halves are pure: they turn declarations from the resource spec into
//! descriptors the executor acts on, without touching the network, the disk
//! or the cluster secret store.
//!
//! - Module, script and download sources in [`domain::resolve`]
//! - Credential injection directives in [`domain::InjectionSet`]

pub mod domain;

#[cfg(test)]
mod tests;
