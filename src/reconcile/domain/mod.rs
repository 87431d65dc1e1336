//! Domain model for reconcile decisions.

mod action;
mod decision;
mod error;
mod task_config;

pub use action::Action;
pub use decision::decide;
pub use error::ReconcileError;
pub use task_config::TaskConfig;
