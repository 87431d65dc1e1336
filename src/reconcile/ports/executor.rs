//! Executor port for launching task pods.

use crate::reconcile::domain::TaskConfig;
use crate::resource::domain::ResourceKey;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for executor operations.
pub type TaskExecutorResult<T> = Result<T, TaskExecutorError>;

/// Handle to a launched task pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pod_name: String,
}

impl TaskHandle {
    /// Creates a handle for the named pod.
    #[must_use]
    pub fn new(pod_name: impl Into<String>) -> Self {
        Self {
            pod_name: pod_name.into(),
        }
    }

    /// Returns the pod name.
    #[must_use]
    pub fn pod_name(&self) -> &str {
        &self.pod_name
    }
}

/// Task pod execution contract.
///
/// State changes of launched pods are reported back separately as
/// [`crate::pipeline::domain::StageEvent`]s.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Launches the pod described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskExecutorError::MissingSecretReference`] when a secret
    /// named in the configuration does not exist, and
    /// [`TaskExecutorError::Runtime`] for transient failures.
    async fn launch(&self, key: &ResourceKey, config: &TaskConfig)
    -> TaskExecutorResult<TaskHandle>;
}

/// Errors returned by executor implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskExecutorError {
    /// A referenced secret could not be resolved.
    #[error("secret {namespace}/{name} not found")]
    MissingSecretReference {
        /// Secret namespace.
        namespace: String,
        /// Secret name.
        name: String,
    },

    /// Transient executor failure; the launch may be retried.
    #[error("executor error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskExecutorError {
    /// Wraps a runtime error.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
