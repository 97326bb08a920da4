use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use image::RgbaImage;

use crate::audio::{AudioSink, PlaybackError};
use crate::common::Rotation;
use crate::detect::DetectorEvent;
use crate::errors::DetectorError;
use crate::overlay::DetectionOverlay;
use crate::pipeline::{CameraError, PipelineController, PipelineState};
use crate::translate::{Translation, Translator};

/// Outcomes of the work a session kicks off beyond the frame loop itself:
/// translations finishing on their background thread and fatal detector
/// failures the host has to act on.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Translated {
        word: String,
        translation: Translation,
    },
    TranslationFailed {
        word: String,
        reason: String,
    },
    DetectorFailed(DetectorError),
}

/// Glue between the pipeline and a live view. Pumps detection results into
/// the overlay while the view is attached, turns taps into translation
/// lookups on a background thread, and plays pronunciation audio through the
/// sink it was built with. Single-owner type: every method is meant to be
/// called from the thread that owns the view, the same thread that delivers
/// lifecycle signals.
pub struct ScopeSession {
    controller: PipelineController,
    overlay: DetectionOverlay,
    translator: Arc<dyn Translator>,
    audio: Box<dyn AudioSink>,
    target_language: String,
    detector_events: Receiver<DetectorEvent>,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
    view_width: u32,
    view_height: u32,
}

impl ScopeSession {
    pub const DEFAULT_TARGET_LANGUAGE: &'static str = "es";

    pub fn new(
        controller: PipelineController,
        overlay: DetectionOverlay,
        translator: Arc<dyn Translator>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let detector_events = controller.events();
        let (events_tx, events_rx) = unbounded();
        Self {
            controller,
            overlay,
            translator,
            audio,
            target_language: Self::DEFAULT_TARGET_LANGUAGE.to_string(),
            detector_events,
            events_tx,
            events_rx,
            view_width: 0,
            view_height: 0,
        }
    }

    pub fn with_target_language(mut self, target_language: &str) -> Self {
        self.target_language = target_language.to_string();
        self
    }

    /// Channel translation outcomes and fatal detector failures arrive on.
    pub fn events(&self) -> Receiver<SessionEvent> {
        self.events_rx.clone()
    }

    pub fn state(&self) -> PipelineState {
        self.controller.state()
    }

    pub fn overlay(&self) -> &DetectionOverlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut DetectionOverlay {
        &mut self.overlay
    }

    pub fn dropped_frames(&self) -> u64 {
        self.controller.dropped_frames()
    }

    /// The view finished layout at this size. Taken into account from the
    /// next applied result onward, like the view dimensions the original
    /// mapping reads at draw time.
    pub fn set_view_size(&mut self, view_width: u32, view_height: u32) {
        self.view_width = view_width;
        self.view_height = view_height;
    }

    pub fn on_view_ready(&mut self) -> Result<(), CameraError> {
        self.controller.on_view_ready()
    }

    pub fn on_pause(&mut self) {
        self.controller.on_pause();
    }

    pub fn on_resume(&mut self) {
        self.controller.on_resume();
    }

    pub fn on_rotation_changed(&mut self, rotation: Rotation) {
        self.controller.on_rotation_changed(rotation);
    }

    /// Tears the pipeline down and empties the overlay. Results that
    /// complete after this are discarded by [`pump_events`](Self::pump_events)
    /// instead of reaching the dead view.
    pub fn close(&mut self) {
        self.controller.close();
        self.overlay.clear();
    }

    /// Applies everything the worker has finished since the last pump.
    /// Results land in the overlay in completion order. Fatal errors are
    /// surfaced as a [`SessionEvent::DetectorFailed`], per-frame errors only
    /// logged. Once the session is closed, anything the worker still
    /// delivers is discarded here, results and errors alike. Returns how
    /// many results were applied, so callers know whether a redraw is due.
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.detector_events.try_recv() {
            if !self.controller.is_attached() {
                match &event {
                    DetectorEvent::Result(result) => log::trace!(
                        "Discarding result completed after close ({}us)",
                        result.timestamp_micros
                    ),
                    DetectorEvent::Error(err) => {
                        log::trace!("Discarding detector error after close: {err}");
                    }
                }
                continue;
            }

            match event {
                DetectorEvent::Result(result) => {
                    self.overlay.set_result(result, self.view_width, self.view_height);
                    applied += 1;
                }
                DetectorEvent::Error(err) if err.is_fatal() => {
                    log::error!("Detector failed: {err}");
                    self.emit(SessionEvent::DetectorFailed(err));
                }
                DetectorEvent::Error(err) => {
                    log::warn!("Detection error, continuing: {err}");
                }
            }
        }
        applied
    }

    /// A tap landed on the view. Hit-tests the mapped rectangles and, on a
    /// hit, looks the label up with the translator on a background thread;
    /// the outcome arrives over [`events`](Self::events). Returns the tapped
    /// word so the host can acknowledge the tap immediately.
    pub fn on_tap(&mut self, x: f32, y: f32) -> Option<String> {
        let word = self.overlay.hit_test(x, y)?.get_label();
        log::info!("Tapped '{}', translating to '{}'", word, self.target_language);

        let translator = self.translator.clone();
        let events = self.events_tx.clone();
        let target_language = self.target_language.clone();
        let tapped = word.clone();
        thread::spawn(move || {
            let event = match translator.translate(&tapped, &target_language) {
                Ok(translation) => SessionEvent::Translated { word: tapped, translation },
                Err(err) => SessionEvent::TranslationFailed {
                    word: tapped,
                    reason: err.to_string(),
                },
            };
            if let Err(send_err) = events.send(event) {
                log::trace!("Dropping translation outcome, listener gone: {send_err}");
            }
        });

        Some(word)
    }

    /// Plays a translation's pronunciation through the audio sink. Returns
    /// false when the translation came without audio.
    pub fn play_pronunciation(&self, translation: &Translation) -> Result<bool, PlaybackError> {
        let Some(pronunciation) = translation.pronunciation.as_deref() else {
            log::debug!("No pronunciation audio for '{}'", translation.translated_word);
            return Ok(false);
        };
        self.audio.play(pronunciation)?;
        Ok(true)
    }

    /// Draws the overlay's current boxes and captions into `canvas`.
    pub fn draw(&self, canvas: &mut RgbaImage) {
        self.overlay.draw(canvas);
    }

    fn emit(&self, event: SessionEvent) {
        if let Err(err) = self.events_tx.send(event) {
            log::trace!("Dropping session event, listener gone: {err}");
        }
    }
}
