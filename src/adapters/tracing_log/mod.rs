// Tracing log adapter - Stage transitions as structured log events

use tracing::{debug, info, warn};

use crate::domain::model::ClipStage;
use crate::ports::StageObserver;

/// Stage observer writing to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStageObserver;

impl TracingStageObserver {
    /// Create new tracing stage observer
    pub fn new() -> Self {
        Self
    }
}

impl StageObserver for TracingStageObserver {
    fn on_stage(&self, index: usize, stage: &ClipStage) {
        match stage {
            ClipStage::Finalized => info!(clip = index, stage = %stage, "Clip finished"),
            ClipStage::Failed(reason) => warn!(clip = index, "Clip failed: {}", reason),
            _ => debug!(clip = index, stage = %stage, "Stage transition"),
        }
    }
}
