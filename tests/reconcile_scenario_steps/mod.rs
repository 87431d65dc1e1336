//! Step definitions for reconcile behaviour scenarios.

mod given;
mod then;
mod when;
pub mod world;
