use image::{DynamicImage, RgbaImage};
use crate::common::Rotation;

/// One camera frame as delivered by the analysis stream: RGBA pixels plus
/// the rotation applied at capture and the capture timestamp.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub image: RgbaImage,
    pub width: u32,
    pub height: u32,
    pub rotation: Rotation,
    pub timestamp_micros: i64,
}

impl std::ops::Deref for CameraFrame {
    type Target = RgbaImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl From<RgbaImage> for CameraFrame {
    fn from(image: RgbaImage) -> Self {
        Self::new(image, Rotation::Deg0, 0)
    }
}

impl From<DynamicImage> for CameraFrame {
    fn from(image: DynamicImage) -> Self {
        Self::new(image.to_rgba8(), Rotation::Deg0, 0)
    }
}

impl CameraFrame {
    pub fn new(image: RgbaImage, rotation: Rotation, timestamp_micros: i64) -> Self {
        let (width, height) = image.dimensions();
        Self { image, width, height, rotation, timestamp_micros }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_timestamp_micros(mut self, timestamp_micros: i64) -> Self {
        self.timestamp_micros = timestamp_micros;
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn to_dyn(&self) -> DynamicImage {
        DynamicImage::from(self.image.clone())
    }

    pub fn into_dyn(self) -> DynamicImage {
        DynamicImage::from(self.image)
    }
}
