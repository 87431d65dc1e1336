//! Adapter implementations of the reconcile ports.

pub mod memory;
