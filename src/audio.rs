use thiserror::Error;

/// Failure handing pronunciation bytes to the audio output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("audio bytes are not a playable stream: {0}")]
    Undecodable(String),

    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),
}

/// Seam in front of the platform audio output. Implementations take raw
/// decoded bytes (the translation service sends compressed audio, typically
/// MP3) and are responsible for their own decode and device handling. Play
/// calls may block until playback has been handed off, not until it ends.
pub trait AudioSink: Send {
    fn play(&self, audio: &[u8]) -> Result<(), PlaybackError>;
}

/// Sink that swallows audio. For headless hosts and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn play(&self, audio: &[u8]) -> Result<(), PlaybackError> {
        log::debug!("Discarding {} bytes of pronunciation audio", audio.len());
        Ok(())
    }
}
