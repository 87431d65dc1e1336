//! Desired-state input for the orchestrator.
//!
//! A [`domain::TerraformResource`] carries the module source, backend,
//! credentials and per-task overrides for one Terraform run. The orchestrator
//! only reads it; progress lives in the pipeline status.

pub mod domain;

#[cfg(test)]
mod tests;
