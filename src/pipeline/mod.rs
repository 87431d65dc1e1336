//! Stage pipeline and status tracking for Terraform task pods.
//!
//! A Terraform resource is driven through an ordered list of task types,
//! one pod per task. This module decides which task comes next and owns
//! every mutation of the observed status:
//!
//! - Task types, stages and status in [`domain`]
//! - Next-task selection in [`domain::StagePipeline`]
//! - Status mutation in [`domain::StageTracker`]

pub mod domain;

#[cfg(test)]
mod tests;
