//! Unit tests for stage sequencing and status tracking.


use crate::pipeline::domain::{
    PodNamePrefix, Stage, StageEvent, StageState, StageTracker, TaskType, TerraformStatus,
};
use crate::resource::domain::Generation;
use chrono::Utc;

/// Builds a stage in `state` by driving a fresh tracker.
pub(super) fn stage_in(task_type: TaskType, generation: i64, state: StageState) -> Stage {
    let mut tracker = StageTracker::new(TerraformStatus::new(PodNamePrefix::from_persisted(
        "demo-0a1b2c3d",
    )));
    tracker
        .record_launch(task_type, Generation::new(generation))
        .expect("launch on empty status");
    if state != StageState::Initializing {
        tracker
            .observe(&StageEvent::new(task_type, state, Utc::now()))
            .expect("observe launched stage");
    }
    tracker
        .status()
        .stage()
        .cloned()
        .expect("stage is current after launch")
}
