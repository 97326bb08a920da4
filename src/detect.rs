mod detector;
mod vision_model;

pub use detector::*;
pub use vision_model::*;
