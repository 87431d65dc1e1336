//! In-memory executor that records launches instead of creating pods.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use crate::reconcile::domain::TaskConfig;
use crate::reconcile::ports::{TaskExecutor, TaskExecutorError, TaskExecutorResult, TaskHandle};
use crate::resource::domain::{Generation, ResourceKey};
use crate::source::domain::SecretLocation;

/// A launch accepted by [`InMemoryTaskExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRecord {
    /// Resource the task belongs to.
    pub key: ResourceKey,
    /// Configuration the task was launched with.
    pub config: TaskConfig,
}

/// A task pod that has not been cleaned up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedPod {
    /// Resource the pod belongs to.
    pub key: ResourceKey,
    /// Pod name.
    pub pod_name: String,
    /// Generation the pod ran for.
    pub generation: Generation,
}

/// Thread-safe executor that records every accepted launch.
///
/// When a secret registry is configured, launches referencing an unknown
/// secret fail with [`TaskExecutorError::MissingSecretReference`].
///
/// Tasks run one at a time per resource, so every earlier pod of a resource
/// is finished when the next one launches. Those pods are cleaned up
/// according to the launched task's [`PodRetention`].
///
/// [`PodRetention`]: crate::resource::domain::PodRetention
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskExecutor {
    state: Arc<RwLock<ExecutorState>>,
}

#[derive(Debug, Default)]
struct ExecutorState {
    known_secrets: Option<BTreeSet<SecretLocation>>,
    launches: Vec<LaunchRecord>,
    pods: Vec<RetainedPod>,
}

impl InMemoryTaskExecutor {
    /// Creates an executor that accepts every secret reference.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor that only resolves the given secrets.
    #[must_use]
    pub fn with_known_secrets(secrets: impl IntoIterator<Item = SecretLocation>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ExecutorState {
                known_secrets: Some(secrets.into_iter().collect()),
                launches: Vec::new(),
                pods: Vec::new(),
            })),
        }
    }

    /// Returns every accepted launch in order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskExecutorError::Runtime`] when the state lock is
    /// poisoned.
    pub fn launches(&self) -> TaskExecutorResult<Vec<LaunchRecord>> {
        let state = self.state.read().map_err(|err| {
            TaskExecutorError::runtime(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.launches.clone())
    }

    /// Returns the pods of `key` that survived cleanup, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskExecutorError::Runtime`] when the state lock is
    /// poisoned.
    pub fn retained_pods(&self, key: &ResourceKey) -> TaskExecutorResult<Vec<RetainedPod>> {
        let state = self.state.read().map_err(|err| {
            TaskExecutorError::runtime(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .pods
            .iter()
            .filter(|pod| pod.key == *key)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaskExecutor for InMemoryTaskExecutor {
    async fn launch(
        &self,
        key: &ResourceKey,
        config: &TaskConfig,
    ) -> TaskExecutorResult<TaskHandle> {
        let mut state = self.state.write().map_err(|err| {
            TaskExecutorError::runtime(std::io::Error::other(err.to_string()))
        })?;
        if let Some(known) = state.known_secrets.as_ref()
            && let Some(missing) = config
                .injections
                .secret_references()
                .into_iter()
                .find(|secret| !known.contains(secret))
        {
            return Err(TaskExecutorError::MissingSecretReference {
                namespace: missing.namespace,
                name: missing.name,
            });
        }
        state.pods.retain(|pod| {
            pod.key != *key
                || config
                    .retention
                    .retains(pod.generation, true, config.generation)
        });
        state.pods.push(RetainedPod {
            key: key.clone(),
            pod_name: config.pod_name.clone(),
            generation: config.generation,
        });
        state.launches.push(LaunchRecord {
            key: key.clone(),
            config: config.clone(),
        });
        Ok(TaskHandle::new(config.pod_name.clone()))
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
