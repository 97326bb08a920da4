use image::RgbaImage;
use crate::common::{Acceleration, Detection, ModelVariant};
use crate::errors::ModelLoadError;

/// Seam in front of the actual vision backend. The adapter owns preprocess,
/// filtering, and delivery; an implementation only has to turn pixels into
/// raw detections.
pub trait VisionModel: Send {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Fixed input resolution the model expects, if it has one. Frames are
    /// resized to this before inference and boxes scaled back afterwards.
    fn input_size(&self) -> Option<(u32, u32)>;

    /// Runs the model over one RGBA image. Boxes come back in the coordinate
    /// space of `image`.
    fn detect(&mut self, image: &RgbaImage) -> anyhow::Result<Vec<Detection>>;

    /// Releases backend resources. Called once before the model is dropped.
    fn close(&mut self) {}
}

/// Resolves a model variant plus an acceleration request into a live
/// [`VisionModel`].
pub trait ModelLoader: Send + Sync {
    fn load(
        &self,
        variant: ModelVariant,
        acceleration: Acceleration,
    ) -> Result<Box<dyn VisionModel>, ModelLoadError>;
}
