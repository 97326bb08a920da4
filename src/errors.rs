use thiserror::Error;
use crate::common::{Acceleration, ModelVariant, RunningMode};

/// Setup-time failure while resolving or building a vision model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelLoadError {
    #[error("model artifact {artifact} for {variant} is unavailable: {reason}")]
    ArtifactUnavailable {
        variant: ModelVariant,
        artifact: String,
        reason: String,
    },

    #[error("{acceleration} acceleration is not supported on this device")]
    UnsupportedAcceleration { acceleration: Acceleration },

    #[error("model backend error: {0}")]
    Backend(String),
}

/// Caller-side misuse of the detector lifecycle. These are reported, never
/// recovered: the offending call is skipped and the detector stays usable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleMisuse {
    #[error("frame submitted to a closed detector")]
    SubmitAfterClose,

    #[error("frame timestamp {timestamp_micros}us is not after the previous {last_micros}us")]
    NonMonotonicTimestamp {
        last_micros: i64,
        timestamp_micros: i64,
    },

    #[error("{operation} requires {required} mode, detector is configured for {configured}")]
    WrongRunningMode {
        operation: &'static str,
        required: RunningMode,
        configured: RunningMode,
    },

    #[error("live-stream mode requires a result channel at setup")]
    MissingResultChannel,
}

/// Failure surface of the detector adapter, split the way the pipeline
/// reacts: load errors end the stream, inference errors skip one frame,
/// misuse errors point back at the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    #[error("model load failed: {0}")]
    ModelLoad(#[from] ModelLoadError),

    #[error("inference failed for frame at {timestamp_micros}us: {reason}")]
    Inference {
        timestamp_micros: i64,
        reason: String,
    },

    #[error("lifecycle misuse: {0}")]
    LifecycleMisuse(#[from] LifecycleMisuse),
}

impl DetectorError {
    /// Whether the pipeline can keep streaming after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DetectorError::ModelLoad(_))
    }
}
