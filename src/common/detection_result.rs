use serde::{Deserialize, Serialize};
use crate::common::{Detection, Rotation};

/// Output of one inference pass. Carries the capture metadata the overlay
/// needs to map boxes into view space: the source frame's dimensions, the
/// rotation the camera applied, and the submission timestamp.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub detections: Vec<Detection>,
    pub frame_width: u32,
    pub frame_height: u32,
    pub rotation: Rotation,
    pub timestamp_micros: i64,
    pub inference_time_ms: u64,
}

impl DetectionResult {
    pub fn new(
        detections: Vec<Detection>,
        frame_width: u32,
        frame_height: u32,
        rotation: Rotation,
        timestamp_micros: i64,
    ) -> Self {
        Self {
            detections,
            frame_width,
            frame_height,
            rotation,
            timestamp_micros,
            inference_time_ms: 0,
        }
    }

    pub fn with_inference_time(mut self, inference_time_ms: u64) -> Self {
        self.inference_time_ms = inference_time_ms;
        self
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Source dimensions with the capture rotation applied: a sideways turn
    /// swaps width and height.
    pub fn rotated_dimensions(&self) -> (u32, u32) {
        if self.rotation.swaps_dimensions() {
            (self.frame_height, self.frame_width)
        } else {
            (self.frame_width, self.frame_height)
        }
    }
}
