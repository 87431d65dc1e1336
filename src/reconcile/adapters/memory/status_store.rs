//! In-memory status store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::pipeline::domain::TerraformStatus;
use crate::reconcile::ports::{StatusStore, StatusStoreError, StatusStoreResult};
use crate::resource::domain::ResourceKey;

/// Thread-safe in-memory status store keyed by resource.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatusStore {
    state: Arc<RwLock<HashMap<ResourceKey, TerraformStatus>>>,
}

impl InMemoryStatusStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn load(&self, key: &ResourceKey) -> StatusStoreResult<Option<TerraformStatus>> {
        let state = self.state.read().map_err(|err| {
            StatusStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(key).cloned())
    }

    async fn save(&self, key: &ResourceKey, status: &TerraformStatus) -> StatusStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            StatusStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.insert(key.clone(), status.clone());
        Ok(())
    }

    async fn remove(&self, key: &ResourceKey) -> StatusStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            StatusStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.remove(key);
        Ok(())
    }
}
