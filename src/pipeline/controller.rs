use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::common::{DetectorConfig, Rotation, RunningMode};
use crate::detect::{DetectorEvent, ModelLoader};
use crate::pipeline::camera::{CameraConfig, CameraError, CameraProvider, CameraSession, FrameSink};
use crate::pipeline::worker::DetectionWorker;

/// Lifecycle states of the frame pipeline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    #[default] Uninitialized,
    CameraBinding,
    Streaming,
    Paused,
    Closed,
}

impl PipelineState {
    pub fn str(&self) -> &'static str {
        match self {
            PipelineState::Uninitialized => "Uninitialized",
            PipelineState::CameraBinding => "CameraBinding",
            PipelineState::Streaming => "Streaming",
            PipelineState::Paused => "Paused",
            PipelineState::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.str())
    }
}

/// Drives the camera → worker → overlay pipeline through its lifecycle.
/// Owns the camera session and the inference worker; every method here is
/// meant to be called from the single owner (UI) thread, mirroring how
/// lifecycle signals arrive. Results and errors flow out over the event
/// channel in completion order.
pub struct PipelineController {
    state: PipelineState,
    config: DetectorConfig,
    camera_config: CameraConfig,
    loader: Arc<dyn ModelLoader>,
    provider: Box<dyn CameraProvider>,
    session: Option<Box<dyn CameraSession>>,
    worker: Option<DetectionWorker>,
    sink: FrameSink,
    events_tx: Sender<DetectorEvent>,
    events_rx: Receiver<DetectorEvent>,
    attached: bool,
    drain_timeout: Duration,
}

impl PipelineController {
    pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

    pub fn new(
        loader: Arc<dyn ModelLoader>,
        provider: Box<dyn CameraProvider>,
        config: DetectorConfig,
        camera_config: CameraConfig,
    ) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            state: PipelineState::Uninitialized,
            config: config.with_running_mode(RunningMode::LiveStream),
            camera_config,
            loader,
            provider,
            session: None,
            worker: None,
            sink: FrameSink::new(),
            events_tx,
            events_rx,
            attached: true,
            drain_timeout: Self::DEFAULT_DRAIN_TIMEOUT,
        }
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    /// Channel results and failures arrive on, in completion order.
    pub fn events(&self) -> Receiver<DetectorEvent> {
        self.events_rx.clone()
    }

    /// Sink the camera pushes frames into.
    pub fn frame_sink(&self) -> FrameSink {
        self.sink.clone()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn dropped_frames(&self) -> u64 {
        self.sink.dropped_frames()
    }

    /// Whether results may still be applied to a live view. Cleared by
    /// [`close`](Self::close); a completion that lands afterwards must be
    /// discarded by whoever pumps the event channel.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// The view is laid out: spawn the worker, bind the camera, start
    /// streaming. The worker goes first so the earliest frames find a
    /// receiver.
    pub fn on_view_ready(&mut self) -> Result<(), CameraError> {
        match self.state {
            PipelineState::Uninitialized => {}
            PipelineState::Closed => {
                return Err(CameraError::BindFailed("pipeline already closed".to_string()));
            }
            state => {
                log::warn!("on_view_ready ignored in state {state}");
                return Ok(());
            }
        }

        self.state = PipelineState::CameraBinding;
        log::info!(
            "Binding camera: {:?} lens, {:?}, target rotation {}",
            self.camera_config.lens_facing,
            self.camera_config.aspect_ratio,
            self.camera_config.target_rotation
        );

        self.spawn_worker();
        match self.provider.open(&self.camera_config, self.sink.clone()) {
            Ok(session) => {
                self.session = Some(session);
                self.state = PipelineState::Streaming;
                log::info!("Pipeline streaming\n{}", self.config.summary());
                Ok(())
            }
            Err(err) => {
                log::error!("Use case binding failed: {err}");
                self.teardown_worker();
                self.state = PipelineState::Uninitialized;
                Err(err)
            }
        }
    }

    /// Owner went to background: stop feeding frames and let the worker
    /// close the detector. Tuning parameters stay behind in the config for
    /// the matching resume.
    pub fn on_pause(&mut self) {
        if self.state != PipelineState::Streaming {
            return;
        }
        log::info!("Pipeline pausing");
        self.teardown_worker();
        self.state = PipelineState::Paused;
    }

    /// Owner came back: recreate the detector from the persisted config and
    /// stream again.
    pub fn on_resume(&mut self) {
        if self.state != PipelineState::Paused {
            return;
        }
        log::info!("Pipeline resuming\n{}", self.config.summary());
        self.spawn_worker();
        self.state = PipelineState::Streaming;
    }

    /// Replaces the tuning parameters. While streaming the worker is
    /// recycled so the next accepted frame already sees the new values.
    pub fn update_config(&mut self, config: DetectorConfig) {
        self.config = config.with_running_mode(RunningMode::LiveStream);
        if self.state == PipelineState::Streaming {
            self.teardown_worker();
            self.spawn_worker();
        }
    }

    /// Display rotation changed: retarget the analysis stream in place.
    /// No rebind, no pipeline restart.
    pub fn on_rotation_changed(&mut self, rotation: Rotation) {
        self.camera_config.target_rotation = rotation;
        if let Some(session) = self.session.as_mut() {
            session.set_target_rotation(rotation);
        }
    }

    /// Tears the pipeline down: stop frames, drain the worker with a
    /// bounded wait, release the camera. In-flight inference is never
    /// aborted; a completion that arrives after this is discarded via the
    /// attached guard instead of reaching a dead view.
    pub fn close(&mut self) {
        if self.state == PipelineState::Closed {
            return;
        }
        log::info!("Pipeline closing");
        self.attached = false;
        self.teardown_worker();
        if let Some(mut session) = self.session.take() {
            session.close();
        }
        self.state = PipelineState::Closed;
    }

    fn spawn_worker(&mut self) {
        let (worker, frame_tx) =
            DetectionWorker::spawn(self.loader.clone(), self.config, self.events_tx.clone());
        self.sink.attach(frame_tx);
        self.worker = Some(worker);
    }

    fn teardown_worker(&mut self) {
        self.sink.detach();
        if let Some(worker) = self.worker.take() {
            worker.drain(self.drain_timeout);
        }
    }
}

impl Drop for PipelineController {
    fn drop(&mut self) {
        self.close();
    }
}
