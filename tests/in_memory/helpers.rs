//! Shared helpers for in-memory reconcile tests.

use std::sync::Arc;

use chrono::Utc;
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
    resource::domain::{Generation, Module, ResourceKey, TerraformResource, TerraformSpec},
};

/// Service type used by in-memory reconcile tests.
pub type TestService = ReconcileService<InMemoryStatusStore, InMemoryTaskExecutor, DefaultClock>;

/// Service plus handles on its adapters.
pub struct Harness {
    /// Service under test.
    pub service: TestService,
    /// Executor recording launches.
    pub executor: Arc<InMemoryTaskExecutor>,
}

/// Provides a service over fresh in-memory adapters.
#[fixture]
pub fn harness() -> Harness {
    let executor = Arc::new(InMemoryTaskExecutor::new());
    Harness {
        service: ReconcileService::new(
            Arc::new(InMemoryStatusStore::new()),
            Arc::clone(&executor),
            Arc::new(DefaultClock),
            OrchestratorConfig::default(),
        ),
        executor,
    }
}

/// Backend block used by every test resource.
pub const BACKEND: &str = r#"terraform { backend "kubernetes" { secret_suffix = "network" } }"#;

/// Returns the key of the test resource.
///
/// # Errors
///
/// Returns an error if the key is rejected.
pub fn key() -> eyre::Result<ResourceKey> {
    Ok(ResourceKey::new("platform", "network")?)
}

/// Returns a valid spec for the test resource.
#[must_use]
pub fn spec() -> TerraformSpec {
    TerraformSpec::new(
        Module::from_source("git::https://github.com/acme/network.git?ref=v2"),
        "1.6.0",
        BACKEND,
    )
}

/// Returns the test resource at `generation`.
///
/// # Errors
///
/// Returns an error if the key is rejected.
pub fn resource(generation: i64) -> eyre::Result<TerraformResource> {
    Ok(TerraformResource::new(
        key()?,
        Generation::new(generation),
        spec(),
    ))
}

/// Reports a task state change.
///
/// # Errors
///
/// Returns an error if the service fails.
pub async fn report(
    harness: &Harness,
    task_type: TaskType,
    state: StageState,
) -> eyre::Result<()> {
    harness
        .service
        .observe(&key()?, &StageEvent::new(task_type, state, Utc::now()))
        .await?;
    Ok(())
}

/// Reconciles and completes launched tasks until `stop_at` is launched or
/// the pass returns something other than a launch.
///
/// Returns the launched tasks in order and the last non-launch action, if
/// any.
///
/// # Errors
///
/// Returns an error if the service fails or the pipeline does not settle.
pub async fn drive(
    harness: &Harness,
    resource: &TerraformResource,
    stop_at: Option<TaskType>,
) -> eyre::Result<(Vec<TaskType>, Option<Action>)> {
    let mut launched = Vec::new();
    for _ in 0..32 {
        let action = harness.service.reconcile(resource).await?;
        let Action::Launch { task_type, .. } = action else {
            return Ok((launched, Some(action)));
        };
        launched.push(task_type);
        if stop_at == Some(task_type) {
            return Ok((launched, None));
        }
        report(harness, task_type, StageState::InProgress).await?;
        report(harness, task_type, StageState::Complete).await?;
    }
    Err(eyre::eyre!("pipeline did not settle"))
}

/// Loads the stored status.
///
/// # Errors
///
/// Returns an error if the service fails or no status exists.
pub async fn status(harness: &Harness) -> eyre::Result<TerraformStatus> {
    harness
        .service
        .status(&key()?)
        .await?
        .ok_or_else(|| eyre::eyre!("no status stored"))
}
