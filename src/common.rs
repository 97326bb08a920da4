mod acceleration;
mod bounding_box;
mod detection;
mod detection_result;
mod detector_config;
mod frame;
mod model_variant;
mod rotation;
mod running_mode;

pub use acceleration::*;
pub use bounding_box::*;
pub use detection::*;
pub use detection_result::*;
pub use detector_config::*;
pub use frame::*;
pub use model_variant::*;
pub use rotation::*;
pub use running_mode::*;
