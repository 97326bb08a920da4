use serde::{Deserialize, Serialize};

/// How results leave the detector: returned from a synchronous call, or
/// pushed over the live-stream channel from the worker that submitted the
/// frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunningMode {
    #[default] Image,
    LiveStream,
}

impl RunningMode {
    pub fn str(&self) -> &'static str {
        match self {
            RunningMode::Image => "Image",
            RunningMode::LiveStream => "LiveStream",
        }
    }
}

impl std::fmt::Display for RunningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.str())
    }
}
