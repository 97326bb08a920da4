use ab_glyph::FontArc;
use image::Rgba;

/// Render options for a detection overlay. Each overlay owns the style it
/// was constructed with and never mutates it, so concurrent overlays cannot
/// bleed paint state into each other.
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub box_color: Rgba<u8>,
    pub text_color: Rgba<u8>,
    pub text_background: Rgba<u8>,
    pub stroke_width: u32,
    pub text_scale: f32,
    pub label_padding: i32,
    /// Captions are skipped entirely when no font is configured.
    pub font: Option<FontArc>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            box_color: Rgba([0, 150, 136, 255]),
            text_color: Rgba([255, 255, 255, 255]),
            text_background: Rgba([0, 0, 0, 255]),
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            text_scale: Self::DEFAULT_TEXT_SCALE,
            label_padding: Self::DEFAULT_LABEL_PADDING,
            font: None,
        }
    }
}

impl OverlayStyle {
    pub const DEFAULT_STROKE_WIDTH: u32 = 8;
    pub const DEFAULT_TEXT_SCALE: f32 = 50.0;
    pub const DEFAULT_LABEL_PADDING: i32 = 8;

    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_box_color(mut self, color: Rgba<u8>) -> Self {
        self.box_color = color;
        self
    }

    pub fn with_text_color(mut self, color: Rgba<u8>) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_text_background(mut self, color: Rgba<u8>) -> Self {
        self.text_background = color;
        self
    }

    pub fn with_stroke_width(mut self, stroke_width: u32) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    pub fn with_text_scale(mut self, text_scale: f32) -> Self {
        self.text_scale = text_scale;
        self
    }

    pub fn with_label_padding(mut self, label_padding: i32) -> Self {
        self.label_padding = label_padding;
        self
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }
}
