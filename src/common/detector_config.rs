use serde::{Deserialize, Serialize};
use crate::common::{Acceleration, ModelVariant, RunningMode};

/// Tuning and placement options for the detector adapter. These are the
/// values the pipeline persists across pause/resume so a recreated detector
/// comes back with the same behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub score_threshold: f32,
    pub max_results: u32,
    pub model_variant: ModelVariant,
    pub acceleration: Acceleration,
    pub running_mode: RunningMode,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            score_threshold: Self::DEFAULT_SCORE_THRESHOLD,
            max_results: Self::DEFAULT_MAX_RESULTS,
            model_variant: ModelVariant::default(),
            acceleration: Acceleration::default(),
            running_mode: RunningMode::default(),
        }
    }
}

impl DetectorConfig {
    pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;
    pub const DEFAULT_MAX_RESULTS: u32 = 3;

    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_model_variant(mut self, variant: ModelVariant) -> Self {
        self.model_variant = variant;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Acceleration) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_running_mode(mut self, running_mode: RunningMode) -> Self {
        self.running_mode = running_mode;
        self
    }

    pub fn summary(&self) -> String {
        format!("Model Variant: {}\n\
        Acceleration: {}\n\
        Running Mode: {}\n\
        Score Threshold: {}\n\
        Max Results: {}",
                self.model_variant, self.acceleration, self.running_mode,
                self.score_threshold, self.max_results)
    }
}
