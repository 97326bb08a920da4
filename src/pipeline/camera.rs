use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Sender, TrySendError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::{CameraFrame, Rotation};

/// Failure opening or binding a camera session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("no camera available for the {0:?} lens")]
    Unavailable(LensFacing),

    #[error("use case binding failed: {0}")]
    BindFailed(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LensFacing {
    #[default] Back,
    Front,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default] Ratio4x3,
    Ratio16x9,
}

/// What the controller asks of a camera provider when it binds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub lens_facing: LensFacing,
    pub aspect_ratio: AspectRatio,
    pub target_rotation: Rotation,
}

impl CameraConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_lens_facing(mut self, lens_facing: LensFacing) -> Self {
        self.lens_facing = lens_facing;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_target_rotation(mut self, target_rotation: Rotation) -> Self {
        self.target_rotation = target_rotation;
        self
    }
}

/// A bound camera delivering frames into the sink it was opened with.
pub trait CameraSession: Send {
    /// Points the analysis stream at a new display rotation without
    /// rebinding the use cases.
    fn set_target_rotation(&mut self, rotation: Rotation);

    /// Stops frame delivery and releases the device.
    fn close(&mut self);
}

/// Resolves a [`CameraConfig`] into a live session.
pub trait CameraProvider: Send {
    fn open(
        &mut self,
        config: &CameraConfig,
        sink: FrameSink,
    ) -> Result<Box<dyn CameraSession>, CameraError>;
}

#[derive(Debug, Default)]
struct SinkShared {
    sender: Mutex<Option<Sender<CameraFrame>>>,
    streaming: AtomicBool,
    accepted: AtomicU64,
    dropped: AtomicU64,
}

/// Keep-only-latest entry point for camera frames. The sender underneath is
/// a rendezvous channel: an offer succeeds only while the worker is parked
/// waiting for its next frame, so at most one frame is ever in flight and a
/// frame arriving while the worker is busy is dropped, never queued.
///
/// Cheap to clone; the camera keeps one clone and pushes into it from its
/// own thread.
#[derive(Debug, Clone, Default)]
pub struct FrameSink {
    shared: Arc<SinkShared>,
}

impl FrameSink {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    pub(crate) fn attach(&self, sender: Sender<CameraFrame>) {
        *self.shared.sender.lock() = Some(sender);
        self.shared.streaming.store(true, Ordering::Release);
    }

    /// Severs the worker's frame supply. Dropping the sender is what lets
    /// the worker finish its current frame and run off the end of its loop.
    pub(crate) fn detach(&self) {
        self.shared.streaming.store(false, Ordering::Release);
        *self.shared.sender.lock() = None;
    }

    /// Offers one frame to the pipeline. Returns true when the worker took
    /// it, false when it was dropped because the worker was busy or the
    /// pipeline is not streaming.
    pub fn offer(&self, frame: CameraFrame) -> bool {
        if !self.shared.streaming.load(Ordering::Acquire) {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let guard = self.shared.sender.lock();
        let Some(sender) = guard.as_ref() else {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        };

        match sender.try_send(frame) {
            Ok(()) => {
                self.shared.accepted.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.shared.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.shared.streaming.load(Ordering::Acquire)
    }

    pub fn accepted_frames(&self) -> u64 {
        self.shared.accepted.load(Ordering::Relaxed)
    }

    /// Frames dropped by backpressure or offered while not streaming.
    pub fn dropped_frames(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}
