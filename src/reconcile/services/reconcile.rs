//! Service layer driving one resource through its task pipeline.

use crate::config::OrchestratorConfig;
use crate::pipeline::domain::{
    ExportStatus, PodNamePrefix, StageEvent, StageState, StageTracker, StageTrackerError,
    StatusTransition, TerraformStatus,
};
use crate::reconcile::{
    domain::{Action, decide},
    ports::{StatusStore, StatusStoreError, TaskExecutor, TaskExecutorError},
};
use crate::resource::domain::{ResourceKey, TerraformResource};
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Service-level errors for reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileServiceError {
    /// The tracker rejected a status mutation.
    #[error(transparent)]
    Tracker(#[from] StageTrackerError),
    /// The status store failed.
    #[error(transparent)]
    Store(#[from] StatusStoreError),
    /// The executor failed transiently; status was left untouched.
    #[error(transparent)]
    Executor(#[from] TaskExecutorError),
    /// No status exists for the resource.
    #[error("no status recorded for {0}")]
    StatusNotFound(ResourceKey),
}

/// Result type for reconcile service operations.
pub type ReconcileServiceResult<T> = Result<T, ReconcileServiceError>;

/// Reconciliation service for Terraform resources.
///
/// Callers must not run two passes for the same resource concurrently.
#[derive(Clone)]
pub struct ReconcileService<S, E, C>
where
    S: StatusStore,
    E: TaskExecutor,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    executor: Arc<E>,
    clock: Arc<C>,
    config: OrchestratorConfig,
}

impl<S, E, C> ReconcileService<S, E, C>
where
    S: StatusStore,
    E: TaskExecutor,
    C: Clock + Send + Sync,
{
    /// Creates a new reconcile service.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        executor: Arc<E>,
        clock: Arc<C>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            executor,
            clock,
            config,
        }
    }

    /// Runs one reconcile pass and returns the action taken.
    ///
    /// Spec and source problems are recorded as a failed stage and reported
    /// as [`Action::MarkFailed`]. A missing secret reported by the executor
    /// fails the launched stage the same way.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileServiceError::Executor`] for transient executor
    /// failures, leaving the status unchanged, and store or tracker errors
    /// otherwise.
    pub async fn reconcile(&self, resource: &TerraformResource) -> ReconcileServiceResult<Action> {
        let key = resource.key();
        let status = self.load_or_init(resource).await?;
        let action = match decide(resource, &status, &self.config) {
            Ok(action) => action,
            Err(err) => {
                let task_type = err.task_type();
                let reason = err.reason();
                warn!(
                    resource = %key,
                    task = %task_type,
                    generation = %resource.generation(),
                    error = %err,
                    "rejecting generation"
                );
                let mut tracker = StageTracker::new(status);
                tracker.reject(task_type, resource.generation(), &reason, self.clock.utc())?;
                self.store.save(key, tracker.status()).await?;
                return Ok(Action::MarkFailed { task_type, reason });
            }
        };

        match &action {
            Action::NoOp => {
                debug!(resource = %key, "nothing to do");
            }
            Action::Launch { task_type, config } => {
                let mut tracker = StageTracker::new(status);
                tracker.record_launch(*task_type, resource.generation())?;
                match self.executor.launch(key, config).await {
                    Ok(handle) => {
                        info!(
                            resource = %key,
                            task = %task_type,
                            generation = %resource.generation(),
                            pod = handle.pod_name(),
                            "task launched"
                        );
                    }
                    Err(err @ TaskExecutorError::MissingSecretReference { .. }) => {
                        warn!(
                            resource = %key,
                            task = %task_type,
                            generation = %resource.generation(),
                            error = %err,
                            "task cannot start"
                        );
                        let event = StageEvent::new(*task_type, StageState::Failed, self.clock.utc())
                            .with_reason(err.to_string());
                        tracker.observe(&event)?;
                    }
                    Err(err) => return Err(err.into()),
                }
                self.store.save(key, tracker.status()).await?;
            }
            Action::MarkComplete {
                lifecycle,
                generation,
            } => {
                let mut tracker = StageTracker::new(status);
                if tracker.mark_complete().is_mutation() {
                    self.store.save(key, tracker.status()).await?;
                    info!(
                        resource = %key,
                        lifecycle = %lifecycle,
                        generation = %generation,
                        "lifecycle complete"
                    );
                }
            }
            Action::MarkFailed { task_type, reason } => {
                debug!(
                    resource = %key,
                    task = %task_type,
                    reason = %reason,
                    "generation failed; waiting for a spec change"
                );
            }
            Action::RemoveFinalizer => {
                self.store.remove(key).await?;
                info!(resource = %key, "deletion ignored; releasing finalizer");
            }
        }
        Ok(action)
    }

    /// Applies a task report to the stored status.
    ///
    /// Reports that do not match the current stage, or try to change a
    /// finished stage, are logged and discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileServiceError::StatusNotFound`] when the resource
    /// has no status, or a store error.
    pub async fn observe(
        &self,
        key: &ResourceKey,
        event: &StageEvent,
    ) -> ReconcileServiceResult<StatusTransition> {
        let mut tracker = StageTracker::new(self.load_existing(key).await?);
        let transition = match tracker.observe(event) {
            Ok(transition) => transition,
            Err(
                err @ (StageTrackerError::StageOutOfOrder { .. }
                | StageTrackerError::TerminalStage { .. }),
            ) => {
                warn!(
                    resource = %key,
                    task = %event.task_type,
                    state = %event.state,
                    error = %err,
                    "discarding task report"
                );
                return Ok(StatusTransition::Discarded);
            }
            Err(err) => return Err(err.into()),
        };
        if transition.is_mutation() {
            self.store.save(key, tracker.status()).await?;
            debug!(
                resource = %key,
                task = %event.task_type,
                state = %event.state,
                "stage updated"
            );
        }
        Ok(transition)
    }

    /// Records module outputs according to the resource's output policy.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileServiceError::StatusNotFound`] when the resource
    /// has no status, or a store error.
    pub async fn publish_outputs(
        &self,
        resource: &TerraformResource,
        outputs: &BTreeMap<String, String>,
    ) -> ReconcileServiceResult<StatusTransition> {
        let key = resource.key();
        let mut tracker = StageTracker::new(self.load_existing(key).await?);
        let transition = tracker.record_outputs(outputs, &resource.spec().output_policy());
        if transition.is_mutation() {
            self.store.save(key, tracker.status()).await?;
        }
        Ok(transition)
    }

    /// Records the export status.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileServiceError::StatusNotFound`] when the resource
    /// has no status, or a store error.
    pub async fn record_export_status(
        &self,
        key: &ResourceKey,
        exported: ExportStatus,
    ) -> ReconcileServiceResult<StatusTransition> {
        let mut tracker = StageTracker::new(self.load_existing(key).await?);
        let transition = tracker.set_export_status(exported);
        if transition.is_mutation() {
            self.store.save(key, tracker.status()).await?;
        }
        Ok(transition)
    }

    /// Returns the stored status of a resource.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileServiceError::Store`] when the store fails.
    pub async fn status(&self, key: &ResourceKey) -> ReconcileServiceResult<Option<TerraformStatus>> {
        Ok(self.store.load(key).await?)
    }

    async fn load_existing(&self, key: &ResourceKey) -> ReconcileServiceResult<TerraformStatus> {
        self.store
            .load(key)
            .await?
            .ok_or_else(|| ReconcileServiceError::StatusNotFound(key.clone()))
    }

    async fn load_or_init(
        &self,
        resource: &TerraformResource,
    ) -> ReconcileServiceResult<TerraformStatus> {
        let existing = self.store.load(resource.key()).await?;
        Ok(existing.unwrap_or_else(|| {
            TerraformStatus::new(PodNamePrefix::generate(resource.key().name()))
        }))
    }
}
