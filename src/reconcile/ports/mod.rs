//! Port contracts for reconciliation.
//!
//! Ports define infrastructure-agnostic interfaces used by the reconcile
//! service.

pub mod executor;
pub mod status_store;

pub use executor::{TaskExecutor, TaskExecutorError, TaskExecutorResult, TaskHandle};
pub use status_store::{StatusStore, StatusStoreError, StatusStoreResult};
