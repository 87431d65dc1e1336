//! Orchestration core for running Terraform modules as ordered task pods.
//!
//! A Terraform resource is applied (and later destroyed) by a fixed sequence
//! of tasks, each run in its own pod. This crate decides which task runs
//! next, what configuration it receives and how task reports advance the
//! resource status. Pod scheduling, CRD storage and secret resolution stay
//! outside the crate behind ports.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`resource`]: Desired-state resource model and validation
//! - [`source`]: Module/script source resolution and credential planning
//! - [`pipeline`]: Task ordering and status tracking
//! - [`reconcile`]: Reconcile decisions, ports, adapters and service
//! - [`config`]: Operator defaults

pub mod config;
pub mod pipeline;
pub mod reconcile;
pub mod resource;
pub mod source;
