//! Reconciliation of a Terraform resource against its observed status.
//!
//! One reconcile pass loads the status, decides on a single action and
//! applies it through the executor and the stage tracker. Task reports are
//! fed back through the same service. The module follows hexagonal
//! architecture:
//!
//! - Actions, task configuration and the decision function in [`domain`]
//! - Status store and task executor contracts in [`ports`]
//! - In-memory adapters in [`adapters`]
//! - The reconcile service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
