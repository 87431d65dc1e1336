//! Domain model for stage sequencing and status tracking.
//!
//! Task types form two fixed, totally ordered sequences. A stage records one
//! attempt to run a task for a generation, and the status aggregates the
//! stage history with the coarse lifecycle phase.

mod error;
mod phase;
mod sequence;
mod stage;
mod status;
mod task_type;
mod tracker;

use crate::resource::domain::Generation;

pub use error::{ParsePhaseError, ParseStageStateError, ParseTaskTypeError, StageTrackerError};
pub use phase::{ExportStatus, Phase};
pub use sequence::{DesiredState, PipelineStep, StagePipeline};
pub use stage::{Stage, StageState};
pub use status::{PodNamePrefix, TerraformStatus};
pub use task_type::{Lifecycle, TaskClass, TaskType};
pub use tracker::{StageEvent, StageTracker, StatusTransition};
