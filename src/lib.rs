//! Live-camera object detection with a rotation-aware view overlay.
//!
//! Frames flow from a camera source through a keep-only-latest pipeline into
//! an on-device detector running on its own worker thread; results are
//! mapped into view space for drawing and tap hit-testing, and a tapped
//! label can be translated and spoken. The camera, vision model, and audio
//! output sit behind traits so hosts bring their own backends.

mod utils;
pub mod audio;
pub mod common;
pub mod detect;
pub mod errors;
pub mod overlay;
pub mod pipeline;
pub mod session;
pub mod translate;

use std::time::Instant;

use crate::common::{CameraFrame, DetectionResult, DetectorConfig, RunningMode};
use crate::detect::{ModelLoader, ObjectDetector};
use crate::errors::DetectorError;

/// Builds an Image-mode detector for one-shot use, applying the same
/// acceleration fallback as the live pipeline.
pub fn init_detector(
    loader: &dyn ModelLoader,
    config: DetectorConfig,
) -> Result<ObjectDetector, DetectorError> {
    log::info!("init_detector\n{}", config.summary());
    ObjectDetector::setup(loader, config.with_running_mode(RunningMode::Image), None)
}

/// Runs one frame through an Image-mode detector and logs the wall time.
pub fn run_detection(
    detector: &mut ObjectDetector,
    frame: &CameraFrame,
) -> Result<DetectionResult, DetectorError> {
    let now = Instant::now();

    let result = detector.detect(frame)?;

    log::info!(
        "Processing time: {:?} ({} detections)",
        now.elapsed(),
        result.len()
    );
    Ok(result)
}
