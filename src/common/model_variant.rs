use serde::{Deserialize, Serialize};

/// Detection model families the loader knows how to resolve.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVariant {
    #[default] EfficientDetLite0,
    EfficientDetLite2,
    MobileNetV2,
}

impl ModelVariant {
    pub fn name(&self) -> String {
        match self {
            Self::EfficientDetLite0 => "EfficientDet-Lite0".to_string(),
            Self::EfficientDetLite2 => "EfficientDet-Lite2".to_string(),
            Self::MobileNetV2 => "MobileNetV2".to_string(),
        }
    }

    pub fn from(variant: String) -> ModelVariant {
        match variant.to_lowercase().as_str() {
            "efficientdet-lite0" | "efficientdetlite0" => ModelVariant::EfficientDetLite0,
            "efficientdet-lite2" | "efficientdetlite2" => ModelVariant::EfficientDetLite2,
            "mobilenetv2" | "mobilenet-v2" => ModelVariant::MobileNetV2,
            _ => ModelVariant::EfficientDetLite0,
        }
    }

    /// File name of the bundled model artifact this variant resolves to.
    pub fn artifact_name(&self) -> &'static str {
        match self {
            Self::EfficientDetLite0 => "efficientdet-lite0.tflite",
            Self::EfficientDetLite2 => "efficientdet-lite2.tflite",
            Self::MobileNetV2 => "mobilenetv2.tflite",
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
