use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use crate::common::{CameraFrame, DetectorConfig};
use crate::detect::{DetectorEvent, ModelLoader, ObjectDetector};

/// Dedicated inference thread. It owns the detector for its whole life:
/// builds it on startup, feeds it frames from the rendezvous channel, and
/// closes it when the channel disconnects. Exclusive ownership is what
/// upholds the live-stream single-submitter rule.
pub(crate) struct DetectionWorker {
    handle: Option<JoinHandle<()>>,
    done_rx: Receiver<()>,
}

impl DetectionWorker {
    /// Spawns the worker and returns the frame sender to attach to the
    /// sink. The capacity of zero is what turns the sink's try_send into
    /// the keep-only-latest policy.
    pub(crate) fn spawn(
        loader: Arc<dyn ModelLoader>,
        config: DetectorConfig,
        events: Sender<DetectorEvent>,
    ) -> (Self, Sender<CameraFrame>) {
        let (frame_tx, frame_rx) = bounded::<CameraFrame>(0);
        let (done_tx, done_rx) = bounded::<()>(0);

        let handle = thread::spawn(move || {
            // Dropped when the thread ends; drain() watches the disconnect.
            let _done_tx = done_tx;
            run_worker(loader, config, events, frame_rx);
        });

        (Self { handle: Some(handle), done_rx }, frame_tx)
    }

    /// Waits up to `timeout` for the thread to finish the frame it is on
    /// and exit. The frame sender must already be detached or this will
    /// simply time out. On timeout the thread is left to finish on its own
    /// rather than aborted mid-inference.
    pub(crate) fn drain(mut self, timeout: Duration) -> bool {
        let finished = matches!(
            self.done_rx.recv_timeout(timeout),
            Ok(()) | Err(RecvTimeoutError::Disconnected)
        );

        if finished {
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        } else {
            log::warn!("Detection worker did not drain within {timeout:?}, detaching");
        }
        finished
    }
}

fn run_worker(
    loader: Arc<dyn ModelLoader>,
    config: DetectorConfig,
    events: Sender<DetectorEvent>,
    frame_rx: Receiver<CameraFrame>,
) {
    let mut detector = match ObjectDetector::setup(loader.as_ref(), config, Some(events.clone())) {
        Ok(detector) => detector,
        Err(err) => {
            log::error!("Detector setup failed: {err}");
            if let Err(send_err) = events.send(DetectorEvent::Error(err)) {
                log::trace!("No listener for setup failure: {send_err}");
            }
            return;
        }
    };

    // MESSAGE LOOP STARTS HERE
    while let Ok(frame) = frame_rx.recv() {
        detector.detect_async(&frame);
    }

    // Sender gone: the pipeline is pausing or closing. Finish cleanly.
    detector.close();
}
