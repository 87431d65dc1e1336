//! In-memory adapters for tests and embedding.

mod executor;
mod status_store;

pub use executor::{InMemoryTaskExecutor, LaunchRecord, RetainedPod};
pub use status_store::InMemoryStatusStore;
