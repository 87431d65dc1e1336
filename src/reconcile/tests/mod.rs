//! Unit tests for reconcile decisions and the reconcile service.


use crate::pipeline::domain::{
    Lifecycle, PodNamePrefix, StageEvent, StageState, StageTracker, TaskType, TerraformStatus,
};
use crate::resource::domain::{Generation, Module, ResourceKey, TerraformResource, TerraformSpec};
use chrono::Utc;

pub(super) const BACKEND: &str = r#"terraform { backend "kubernetes" { secret_suffix = "vpc" } }"#;

pub(super) fn key() -> ResourceKey {
    ResourceKey::new("infra", "vpc").expect("valid resource key")
}

pub(super) fn spec() -> TerraformSpec {
    TerraformSpec::new(
        Module::from_source("https://github.com/acme/vpc.git"),
        "1.5.7",
        BACKEND,
    )
}

pub(super) fn resource(generation: i64) -> TerraformResource {
    TerraformResource::new(key(), Generation::new(generation), spec())
}

pub(super) fn empty_status() -> TerraformStatus {
    TerraformStatus::new(PodNamePrefix::from_persisted("vpc-0a1b2c3d"))
}

/// Builds a status whose current stage is `task` in `state`, with every
/// earlier task of the lifecycle completed for `generation`.
pub(super) fn status_at(task: TaskType, state: StageState, raw_generation: i64) -> TerraformStatus {
    let generation = Generation::new(raw_generation);
    let mut tracker = StageTracker::new(empty_status());
    let lifecycle: Lifecycle = task.lifecycle();
    for earlier in lifecycle.sequence().iter().take(task.position()) {
        tracker
            .record_launch(*earlier, generation)
            .expect("launch earlier task");
        tracker
            .observe(&StageEvent::new(*earlier, StageState::Complete, Utc::now()))
            .expect("complete earlier task");
    }
    tracker
        .record_launch(task, generation)
        .expect("launch current task");
    if state != StageState::Initializing {
        tracker
            .observe(
                &StageEvent::new(task, state, Utc::now()).with_reason(format!("{task} {state}")),
            )
            .expect("observe current task");
    }
    tracker.into_status()
}
