#![allow(dead_code)]

//! Scripted camera, model, translator, and audio backends shared by the
//! integration tests. Everything here is deterministic: inference can be
//! gated on a channel so tests control exactly when a frame is "in flight".

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use image::RgbaImage;
use parking_lot::Mutex;

use rosetta_scope::audio::{AudioSink, PlaybackError};
use rosetta_scope::common::{Acceleration, CameraFrame, Detection, ModelVariant, Rotation};
use rosetta_scope::detect::{ModelLoader, VisionModel};
use rosetta_scope::errors::ModelLoadError;
use rosetta_scope::pipeline::{
    CameraConfig, CameraError, CameraProvider, CameraSession, FrameSink,
};
use rosetta_scope::translate::{TranslateError, Translation, Translator};

pub const WAIT: Duration = Duration::from_secs(5);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn frame(width: u32, height: u32, rotation: Rotation, timestamp_micros: i64) -> CameraFrame {
    CameraFrame::new(RgbaImage::new(width, height), rotation, timestamp_micros)
}

pub fn detection(label: &str, left: f32, top: f32, right: f32, bottom: f32) -> Detection {
    Detection::default()
        .with_ltrb(left, top, right, bottom)
        .with_label(label)
        .with_score(0.9)
}

/// Test-side handle for a gated loader: observes the gated call starting
/// and decides when it may finish.
pub struct InferenceGate {
    started_rx: Receiver<()>,
    release_tx: Sender<()>,
}

impl InferenceGate {
    pub fn wait_started(&self) {
        self.started_rx
            .recv_timeout(WAIT)
            .expect("gated call never started");
    }

    pub fn release_one(&self) {
        self.release_tx.send(()).expect("model side of gate gone");
    }
}

struct ScriptedModel {
    detections: Vec<Detection>,
    input_size: Option<(u32, u32)>,
    fail_remaining: Arc<AtomicUsize>,
    started_tx: Option<Sender<()>>,
    release_rx: Option<Receiver<()>>,
}

impl VisionModel for ScriptedModel {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn input_size(&self) -> Option<(u32, u32)> {
        self.input_size
    }

    fn detect(&mut self, _image: &RgbaImage) -> anyhow::Result<Vec<Detection>> {
        if let Some(started) = &self.started_tx {
            let _ = started.send(());
        }
        if let Some(release) = &self.release_rx {
            // A dropped gate releases everything still blocked on it.
            let _ = release.recv();
        }

        let failed = self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            anyhow::bail!("scripted inference failure");
        }
        Ok(self.detections.clone())
    }
}

/// Loader producing [`ScriptedModel`]s. Counts setups so tests can observe
/// the detector being recreated across pause/resume.
pub struct ScriptedLoader {
    detections: Vec<Detection>,
    input_size: Option<(u32, u32)>,
    supported: Vec<Acceleration>,
    missing_artifact: bool,
    setups: AtomicUsize,
    fail_remaining: Arc<AtomicUsize>,
    gate: Option<(Sender<()>, Receiver<()>)>,
    setup_gate: Option<(Sender<()>, Receiver<()>)>,
}

impl ScriptedLoader {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            input_size: None,
            supported: vec![Acceleration::Cpu, Acceleration::Gpu],
            missing_artifact: false,
            setups: AtomicUsize::new(0),
            fail_remaining: Arc::new(AtomicUsize::new(0)),
            gate: None,
            setup_gate: None,
        }
    }

    pub fn cpu_only(mut self) -> Self {
        self.supported = vec![Acceleration::Cpu];
        self
    }

    /// Every load fails as if the model file were gone.
    pub fn missing_artifact(mut self) -> Self {
        self.missing_artifact = true;
        self
    }

    pub fn with_input_size(mut self, width: u32, height: u32) -> Self {
        self.input_size = Some((width, height));
        self
    }

    /// The next `count` inference calls fail before any detection is made.
    pub fn failing_next(self, count: usize) -> Self {
        self.fail_remaining.store(count, Ordering::SeqCst);
        self
    }

    /// Makes every created model block inside inference until the returned
    /// gate releases it.
    pub fn gated(mut self) -> (Self, InferenceGate) {
        let (started_tx, started_rx) = unbounded();
        let (release_tx, release_rx) = unbounded();
        self.gate = Some((started_tx, release_rx));
        (self, InferenceGate { started_rx, release_tx })
    }

    /// Makes every load call block until the returned gate releases it, so
    /// tests control when a detector setup outcome lands.
    pub fn gated_setup(mut self) -> (Self, InferenceGate) {
        let (started_tx, started_rx) = unbounded();
        let (release_tx, release_rx) = unbounded();
        self.setup_gate = Some((started_tx, release_rx));
        (self, InferenceGate { started_rx, release_tx })
    }

    pub fn setup_count(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }
}

impl ModelLoader for ScriptedLoader {
    fn load(
        &self,
        variant: ModelVariant,
        acceleration: Acceleration,
    ) -> Result<Box<dyn VisionModel>, ModelLoadError> {
        if let Some((started, release)) = &self.setup_gate {
            let _ = started.send(());
            let _ = release.recv();
        }
        if self.missing_artifact {
            return Err(ModelLoadError::ArtifactUnavailable {
                variant,
                artifact: variant.artifact_name().to_string(),
                reason: "scripted missing artifact".to_string(),
            });
        }
        if !self.supported.contains(&acceleration) {
            return Err(ModelLoadError::UnsupportedAcceleration { acceleration });
        }

        self.setups.fetch_add(1, Ordering::SeqCst);
        let (started_tx, release_rx) = match &self.gate {
            Some((started, release)) => (Some(started.clone()), Some(release.clone())),
            None => (None, None),
        };
        Ok(Box::new(ScriptedModel {
            detections: self.detections.clone(),
            input_size: self.input_size,
            fail_remaining: self.fail_remaining.clone(),
            started_tx,
            release_rx,
        }))
    }
}

/// Shared record of everything the fake camera was asked to do, plus the
/// sink the pipeline handed it at bind time.
#[derive(Default)]
pub struct CameraLog {
    sink: Mutex<Option<FrameSink>>,
    opens: AtomicUsize,
    rotations: Mutex<Vec<Rotation>>,
    closed: AtomicBool,
    fail_bind: AtomicBool,
}

impl CameraLog {
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn rotations(&self) -> Vec<Rotation> {
        self.rotations.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn sink(&self) -> FrameSink {
        self.sink.lock().clone().expect("camera was never bound")
    }

    /// Single offer, exactly like one camera callback firing.
    pub fn offer(&self, frame: CameraFrame) -> bool {
        self.sink().offer(frame)
    }

    /// Re-offers until the worker is parked and takes the frame. Only for
    /// getting a frame in; drop assertions must count from after this.
    pub fn offer_until_accepted(&self, frame: CameraFrame) {
        let sink = self.sink();
        let deadline = std::time::Instant::now() + WAIT;
        while !sink.offer(frame.clone()) {
            assert!(
                std::time::Instant::now() < deadline,
                "worker never accepted the frame"
            );
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

/// Camera provider that records its use and exposes the frame sink so tests
/// play the role of the capture callback.
pub struct FakeCamera {
    log: Arc<CameraLog>,
}

impl FakeCamera {
    pub fn new() -> (Self, Arc<CameraLog>) {
        let log = Arc::new(CameraLog::default());
        (Self { log: log.clone() }, log)
    }

    pub fn failing_bind() -> (Self, Arc<CameraLog>) {
        let (camera, log) = Self::new();
        log.fail_bind.store(true, Ordering::SeqCst);
        (camera, log)
    }
}

impl CameraProvider for FakeCamera {
    fn open(
        &mut self,
        config: &CameraConfig,
        sink: FrameSink,
    ) -> Result<Box<dyn CameraSession>, CameraError> {
        if self.log.fail_bind.load(Ordering::SeqCst) {
            return Err(CameraError::BindFailed("scripted bind failure".to_string()));
        }
        self.log.opens.fetch_add(1, Ordering::SeqCst);
        self.log.rotations.lock().push(config.target_rotation);
        *self.log.sink.lock() = Some(sink);
        Ok(Box::new(FakeSession { log: self.log.clone() }))
    }
}

struct FakeSession {
    log: Arc<CameraLog>,
}

impl CameraSession for FakeSession {
    fn set_target_rotation(&mut self, rotation: Rotation) {
        self.log.rotations.lock().push(rotation);
    }

    fn close(&mut self) {
        self.log.closed.store(true, Ordering::SeqCst);
    }
}

/// Translator with a scripted outcome; records every lookup.
pub struct StubTranslator {
    translated: String,
    pronunciation: Option<Vec<u8>>,
    fail: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubTranslator {
    pub fn new(translated: &str, pronunciation: Option<Vec<u8>>) -> Self {
        Self {
            translated: translated.to_string(),
            pronunciation,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        let mut stub = Self::new("", None);
        stub.fail = true;
        stub
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

impl Translator for StubTranslator {
    fn translate(&self, word: &str, target_language: &str) -> Result<Translation, TranslateError> {
        self.calls
            .lock()
            .push((word.to_string(), target_language.to_string()));
        if self.fail {
            return Err(TranslateError::MalformedResponse(std::io::Error::new(
                std::io::ErrorKind::Other,
                "scripted translation failure",
            )));
        }
        Ok(Translation {
            translated_word: self.translated.clone(),
            pronunciation: self.pronunciation.clone(),
        })
    }
}

/// Audio sink that records every payload it was asked to play.
#[derive(Default, Clone)]
pub struct RecordingAudioSink {
    played: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl RecordingAudioSink {
    pub fn played(&self) -> Vec<Vec<u8>> {
        self.played.lock().clone()
    }
}

impl AudioSink for RecordingAudioSink {
    fn play(&self, audio: &[u8]) -> Result<(), PlaybackError> {
        self.played.lock().push(audio.to_vec());
        Ok(())
    }
}
