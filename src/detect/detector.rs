use std::time::Instant;

use crossbeam_channel::Sender;
use image::imageops::FilterType;
use image::RgbaImage;

use crate::common::{
    Acceleration, BoundingBox, CameraFrame, Detection, DetectionResult, DetectorConfig,
    RunningMode,
};
use crate::detect::{ModelLoader, VisionModel};
use crate::errors::{DetectorError, LifecycleMisuse, ModelLoadError};
use crate::utils;

/// Everything the detector pushes over its live-stream channel.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorEvent {
    Result(DetectionResult),
    Error(DetectorError),
}

/// Adapter that owns one vision model and the rules around it: acceleration
/// fallback at setup, preprocess/postprocess per frame, timestamp discipline
/// in live-stream mode, and a close that late completions survive.
pub struct ObjectDetector {
    model: Option<Box<dyn VisionModel>>,
    config: DetectorConfig,
    acceleration: Acceleration,
    listener: Option<Sender<DetectorEvent>>,
    last_timestamp_micros: Option<i64>,
}

impl ObjectDetector {
    /// Builds the detector. A live-stream detector must be given the channel
    /// its results will be pushed on. When the requested acceleration is not
    /// supported on this device, setup retries once on CPU and the returned
    /// handle is still usable.
    pub fn setup(
        loader: &dyn ModelLoader,
        config: DetectorConfig,
        listener: Option<Sender<DetectorEvent>>,
    ) -> Result<Self, DetectorError> {
        if config.running_mode == RunningMode::LiveStream && listener.is_none() {
            return Err(LifecycleMisuse::MissingResultChannel.into());
        }

        let (model, acceleration) = Self::load_model(loader, &config)?;
        log::info!(
            "Detector ready: {} ({}) on {}",
            model.name(),
            config.model_variant,
            acceleration
        );

        Ok(Self {
            model: Some(model),
            config,
            acceleration,
            listener,
            last_timestamp_micros: None,
        })
    }

    fn load_model(
        loader: &dyn ModelLoader,
        config: &DetectorConfig,
    ) -> Result<(Box<dyn VisionModel>, Acceleration), ModelLoadError> {
        match loader.load(config.model_variant, config.acceleration) {
            Ok(model) => Ok((model, config.acceleration)),
            Err(err @ ModelLoadError::UnsupportedAcceleration { .. })
                if config.acceleration != Acceleration::Cpu =>
            {
                log::warn!("{err}, Using cpu");
                let model = loader.load(config.model_variant, Acceleration::Cpu)?;
                Ok((model, Acceleration::Cpu))
            }
            Err(err) => Err(err),
        }
    }

    /// Runs one frame synchronously. Image mode only.
    pub fn detect(&mut self, frame: &CameraFrame) -> Result<DetectionResult, DetectorError> {
        if self.config.running_mode != RunningMode::Image {
            return Err(LifecycleMisuse::WrongRunningMode {
                operation: "detect",
                required: RunningMode::Image,
                configured: self.config.running_mode,
            }
            .into());
        }
        if self.is_closed() {
            return Err(LifecycleMisuse::SubmitAfterClose.into());
        }
        self.run_inference(frame)
    }

    /// Submits one live-stream frame. Every outcome, result or failure, is
    /// delivered over the channel given at setup. The call blocks the
    /// invoking worker for the duration of inference; keeping to a single
    /// submitter with monotonically increasing timestamps is the caller's
    /// side of the contract, and violations are reported as misuse.
    pub fn detect_async(&mut self, frame: &CameraFrame) {
        if self.config.running_mode != RunningMode::LiveStream {
            self.emit(DetectorEvent::Error(
                LifecycleMisuse::WrongRunningMode {
                    operation: "detect_async",
                    required: RunningMode::LiveStream,
                    configured: self.config.running_mode,
                }
                .into(),
            ));
            return;
        }
        if self.is_closed() {
            self.emit(DetectorEvent::Error(LifecycleMisuse::SubmitAfterClose.into()));
            return;
        }
        if let Some(last_micros) = self.last_timestamp_micros {
            if frame.timestamp_micros <= last_micros {
                self.emit(DetectorEvent::Error(
                    LifecycleMisuse::NonMonotonicTimestamp {
                        last_micros,
                        timestamp_micros: frame.timestamp_micros,
                    }
                    .into(),
                ));
                return;
            }
        }
        self.last_timestamp_micros = Some(frame.timestamp_micros);

        match self.run_inference(frame) {
            Ok(result) => self.emit(DetectorEvent::Result(result)),
            Err(err) => self.emit(DetectorEvent::Error(err)),
        }
    }

    fn run_inference(&mut self, frame: &CameraFrame) -> Result<DetectionResult, DetectorError> {
        let model = match self.model.as_mut() {
            Some(model) => model,
            None => return Err(LifecycleMisuse::SubmitAfterClose.into()),
        };

        let detect_time = Instant::now();

        let (input, scale_x, scale_y) = prepare_input(frame, model.input_size());
        let mut _detect_elapsed = detect_time.elapsed();
        _detect_elapsed = utils::trace(cfg!(test), "TIME", "Preprocessing input", detect_time, _detect_elapsed);

        let raw = model.detect(&input).map_err(|err| DetectorError::Inference {
            timestamp_micros: frame.timestamp_micros,
            reason: format!("{err:#}"),
        })?;
        _detect_elapsed = utils::trace(cfg!(test), "TIME", "Detection run", detect_time, _detect_elapsed);

        let detections = postprocess(raw, scale_x, scale_y, &self.config);
        utils::trace(cfg!(test), "TIME", "Postprocessing", detect_time, _detect_elapsed);

        Ok(DetectionResult::new(
            detections,
            frame.width,
            frame.height,
            frame.rotation,
            frame.timestamp_micros,
        )
        .with_inference_time(detect_time.elapsed().as_millis() as u64))
    }

    /// Releases the model. Safe to call more than once. A completion already
    /// in flight when close lands is delivered best-effort and dropped when
    /// nobody is listening; it never crashes the pipeline.
    pub fn close(&mut self) {
        if let Some(mut model) = self.model.take() {
            model.close();
            log::info!("Detector closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.model.is_none()
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Acceleration actually in use after any setup fallback.
    pub fn acceleration(&self) -> Acceleration {
        self.acceleration
    }

    fn emit(&self, event: DetectorEvent) {
        if let Some(listener) = &self.listener {
            if let Err(err) = listener.send(event) {
                log::trace!("Dropping detector event, listener gone: {err}");
            }
        }
    }
}

impl std::fmt::Debug for ObjectDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectDetector")
            .field("model", &self.model.as_ref().map(|model| model.name()))
            .field("config", &self.config)
            .field("acceleration", &self.acceleration)
            .field("last_timestamp_micros", &self.last_timestamp_micros)
            .finish_non_exhaustive()
    }
}

/// Resizes a frame to the model's input resolution. Returns the image handed
/// to the model plus the per-axis factors that map model-space boxes back
/// onto the source frame.
fn prepare_input(frame: &CameraFrame, input_size: Option<(u32, u32)>) -> (RgbaImage, f32, f32) {
    let (width, height) = match input_size {
        Some(size) if size != frame.dimensions() => size,
        _ => return (frame.image.clone(), 1.0, 1.0),
    };

    let source = frame.to_dyn();
    let mut resizer = fast_image_resize::Resizer::new();
    let options = fast_image_resize::ResizeOptions {
        algorithm: fast_image_resize::ResizeAlg::Convolution(
            fast_image_resize::FilterType::Bilinear,
        ),
        ..Default::default()
    };

    let mut resized = image::DynamicImage::new(width, height, source.color());
    if let Err(err) = resizer.resize(&source, &mut resized, &options) {
        log::warn!("Failed to use `fast_image_resize` ({err}). Falling back.");
        resized = image::imageops::resize(&source, width, height, FilterType::Nearest).into();
    }

    let scale_x = frame.width as f32 / width as f32;
    let scale_y = frame.height as f32 / height as f32;
    (resized.to_rgba8(), scale_x, scale_y)
}

/// Filters, orders, and truncates raw model output, scaling boxes back into
/// source-frame coordinates.
fn postprocess(
    raw: Vec<Detection>,
    scale_x: f32,
    scale_y: f32,
    config: &DetectorConfig,
) -> Vec<Detection> {
    let mut detections: Vec<Detection> = raw
        .into_iter()
        .filter(|det| det.score >= config.score_threshold)
        .map(|mut det| {
            let b = det.bounding_box;
            det.bounding_box = BoundingBox::new(
                b.left * scale_x,
                b.top * scale_y,
                b.right * scale_x,
                b.bottom * scale_y,
            );
            det
        })
        .collect();

    detections.sort_by(|a, b| b.score.total_cmp(&a.score));
    detections.truncate(config.max_results as usize);
    detections
}
