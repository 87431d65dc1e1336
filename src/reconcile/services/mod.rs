//! Application services for reconciliation.

mod reconcile;

pub use reconcile::{ReconcileService, ReconcileServiceError, ReconcileServiceResult};
