//! Shared world state for reconcile BDD scenarios.

use std::sync::Arc;

use chrono::Utc;
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;
use tfo_orchestrator::{
    config::OrchestratorConfig,
    pipeline::domain::{StageEvent, StageState, TaskType, TerraformStatus},
    reconcile::{
        adapters::memory::{InMemoryStatusStore, InMemoryTaskExecutor},
        domain::Action,
        services::ReconcileService,
    },
    resource::domain::TerraformResource,
};

/// Service type used by the BDD world.
pub type TestReconcileService =
    ReconcileService<InMemoryStatusStore, InMemoryTaskExecutor, DefaultClock>;

/// Backend block used by scenario resources.
pub const BACKEND: &str = r#"terraform { backend "kubernetes" { secret_suffix = "bdd" } }"#;

/// Scenario world for reconcile behaviour tests.
pub struct ReconcileWorld {
    pub service: TestReconcileService,
    pub executor: Arc<InMemoryTaskExecutor>,
    pub resource: Option<TerraformResource>,
    pub last_action: Option<Action>,
    pub launches_before: usize,
}

impl ReconcileWorld {
    /// Creates a world over fresh in-memory adapters.
    #[must_use]
    pub fn new() -> Self {
        let executor = Arc::new(InMemoryTaskExecutor::new());
        let service = ReconcileService::new(
            Arc::new(InMemoryStatusStore::new()),
            Arc::clone(&executor),
            Arc::new(DefaultClock),
            OrchestratorConfig::default(),
        );

        Self {
            service,
            executor,
            resource: None,
            last_action: None,
            launches_before: 0,
        }
    }

    /// Returns the scenario resource.
    ///
    /// # Errors
    ///
    /// Returns an error if no resource has been declared.
    pub fn resource(&self) -> Result<&TerraformResource, eyre::Report> {
        self.resource
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing resource in scenario world"))
    }

    /// Replaces the scenario resource.
    pub fn replace_resource(&mut self, resource: TerraformResource) {
        self.resource = Some(resource);
    }

    /// Runs one reconcile pass and records its action.
    ///
    /// # Errors
    ///
    /// Returns an error if the service fails.
    pub fn reconcile(&mut self) -> Result<Action, eyre::Report> {
        let resource = self.resource()?.clone();
        self.launches_before = self.executor.launches()?.len();
        let action = run_async(self.service.reconcile(&resource))
            .wrap_err("reconcile scenario resource")?;
        self.last_action = Some(action.clone());
        Ok(action)
    }

    /// Reports a task state change for the scenario resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the service fails.
    pub fn report(&self, event: &StageEvent) -> Result<(), eyre::Report> {
        let key = self.resource()?.key().clone();
        run_async(self.service.observe(&key, event)).wrap_err("observe task report")?;
        Ok(())
    }

    /// Reconciles and completes launched tasks until `stop_at` is launched
    /// or the pass returns something other than a launch.
    ///
    /// # Errors
    ///
    /// Returns an error if the service fails or the pipeline does not
    /// settle.
    pub fn drive(&mut self, stop_at: Option<TaskType>) -> Result<(), eyre::Report> {
        for _ in 0..32 {
            let Action::Launch { task_type, .. } = self.reconcile()? else {
                return Ok(());
            };
            if stop_at == Some(task_type) {
                return Ok(());
            }
            self.report(&StageEvent::new(task_type, StageState::Complete, Utc::now()))?;
        }
        Err(eyre::eyre!("pipeline did not settle"))
    }

    /// Loads the stored status of the scenario resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the service fails or no status exists.
    pub fn status(&self) -> Result<TerraformStatus, eyre::Report> {
        let key = self.resource()?.key().clone();
        run_async(self.service.status(&key))
            .wrap_err("load scenario status")?
            .ok_or_else(|| eyre::eyre!("no status stored for scenario resource"))
    }
}

impl Default for ReconcileWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReconcileWorld {
    ReconcileWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
