//! Status store port for persisting observed resource status.

use crate::pipeline::domain::TerraformStatus;
use crate::resource::domain::ResourceKey;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for status store operations.
pub type StatusStoreResult<T> = Result<T, StatusStoreError>;

/// Status persistence contract.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Loads the status of a resource.
    ///
    /// Returns `None` when no status has been saved yet.
    async fn load(&self, key: &ResourceKey) -> StatusStoreResult<Option<TerraformStatus>>;

    /// Saves the status of a resource, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StatusStoreError::Persistence`] when the store fails.
    async fn save(&self, key: &ResourceKey, status: &TerraformStatus) -> StatusStoreResult<()>;

    /// Removes the status of a resource. Removing a missing status is not an
    /// error.
    async fn remove(&self, key: &ResourceKey) -> StatusStoreResult<()>;
}

/// Errors returned by status store implementations.
#[derive(Debug, Clone, Error)]
pub enum StatusStoreError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StatusStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
