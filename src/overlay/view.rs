use ab_glyph::PxScale;
use image::RgbaImage;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::common::{BoundingBox, Detection, DetectionResult};
use crate::overlay::{map_result, MappedBox, OverlayStyle};

/// View-side half of the pipeline. Keeps the latest result mapped into view
/// coordinates, answers tap hit-tests against the mapped rectangles, and
/// draws boxes plus captions into an RGBA canvas. Meant to be owned and
/// mutated by a single (UI) thread; results are handed to it, it never
/// pulls.
pub struct DetectionOverlay {
    style: OverlayStyle,
    result: Option<DetectionResult>,
    view_width: u32,
    view_height: u32,
    scale_factor: f32,
    mapped: Vec<MappedBox>,
    invalidated: bool,
}

impl Default for DetectionOverlay {
    fn default() -> Self {
        Self::new(OverlayStyle::default())
    }
}

impl DetectionOverlay {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            result: None,
            view_width: 0,
            view_height: 0,
            scale_factor: 1.0,
            mapped: Vec::new(),
            invalidated: false,
        }
    }

    /// Applies a new result for a view of the given size. Recomputes the
    /// cover scale and every mapped rectangle from scratch, so re-applying
    /// the same result is idempotent. A result whose mapping collapses
    /// (zero-sized frame or view) is ignored and the previous state kept.
    pub fn set_result(&mut self, result: DetectionResult, view_width: u32, view_height: u32) {
        let Some((scale_factor, mapped)) = map_result(&result, view_width, view_height) else {
            log::warn!(
                "Ignoring detection result: zero-sized mapping ({}x{} frame, {}x{} view)",
                result.frame_width, result.frame_height, view_width, view_height
            );
            return;
        };

        self.result = Some(result);
        self.view_width = view_width;
        self.view_height = view_height;
        self.scale_factor = scale_factor;
        self.mapped = mapped;
        self.invalidated = true;
    }

    /// Drops the current result and its tap targets. The style is part of
    /// the overlay's identity and survives.
    pub fn clear(&mut self) {
        self.result = None;
        self.mapped.clear();
        self.scale_factor = 1.0;
        self.invalidated = true;
    }

    /// First detection, in original detection order, whose mapped rectangle
    /// contains the point. View-space coordinates.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&Detection> {
        let result = self.result.as_ref()?;
        self.mapped
            .iter()
            .find(|mapped| mapped.view_rect.contains_point(x, y))
            .map(|mapped| &result.detections[mapped.index])
    }

    pub fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn mapped_boxes(&self) -> &[MappedBox] {
        &self.mapped
    }

    pub fn view_size(&self) -> (u32, u32) {
        (self.view_width, self.view_height)
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// True once after every state change; consumed by the render pass.
    pub fn take_invalidated(&mut self) -> bool {
        std::mem::take(&mut self.invalidated)
    }

    /// Draws boxes and captions for the current result into `canvas`.
    pub fn draw(&self, canvas: &mut RgbaImage) {
        let Some(result) = &self.result else { return };

        for mapped in &self.mapped {
            self.draw_box(canvas, &mapped.view_rect);
            self.draw_caption(canvas, &mapped.view_rect, &result.detections[mapped.index]);
        }
    }

    fn draw_box(&self, canvas: &mut RgbaImage, rect: &BoundingBox) {
        let (x, y, w, h) = rect.as_xy_wh_i32();
        if w <= 0 || h <= 0 {
            return;
        }

        // Stroke width by insetting concentric hollow rects.
        for inset in 0..self.style.stroke_width as i32 {
            let w = w - 2 * inset;
            let h = h - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let outline = Rect::at(x + inset, y + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(canvas, outline, self.style.box_color);
        }
    }

    fn draw_caption(&self, canvas: &mut RgbaImage, rect: &BoundingBox, detection: &Detection) {
        let Some(font) = &self.style.font else { return };

        let caption = detection.caption();
        let scale = PxScale::from(self.style.text_scale);
        let (text_width, text_height) = text_size(scale, font, &caption);

        let x = rect.left.round() as i32;
        let y = rect.top.round() as i32;
        let bg_width = text_width as i32 + self.style.label_padding;
        let bg_height = text_height as i32 + self.style.label_padding;
        if bg_width <= 0 || bg_height <= 0 {
            return;
        }

        let background = Rect::at(x, y).of_size(bg_width as u32, bg_height as u32);
        draw_filled_rect_mut(canvas, background, self.style.text_background);
        draw_text_mut(canvas, self.style.text_color, x, y, scale, font, &caption);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Rotation;
    use image::Rgba;

    fn result_with_boxes(boxes: &[(BoundingBox, &str)]) -> DetectionResult {
        let detections = boxes
            .iter()
            .map(|(bbox, label)| Detection::new(*bbox, Some(label.to_string()), 0.9))
            .collect();
        DetectionResult::new(detections, 200, 100, Rotation::Deg0, 0)
    }

    #[test]
    fn first_containing_box_wins_in_detection_order() {
        let mut overlay = DetectionOverlay::default();
        overlay.set_result(
            result_with_boxes(&[
                (BoundingBox::new(10., 10., 60., 60.), "first"),
                (BoundingBox::new(40., 40., 90., 90.), "second"),
            ]),
            200,
            100,
        );

        // Inside the overlap both contain the point; the first wins.
        assert_eq!(overlay.hit_test(50., 50.).unwrap().get_label(), "first");
        // Inside only the second.
        assert_eq!(overlay.hit_test(80., 80.).unwrap().get_label(), "second");
        // Outside both.
        assert!(overlay.hit_test(5., 95.).is_none());
    }

    #[test]
    fn reapplying_the_same_result_is_idempotent() {
        let mut overlay = DetectionOverlay::default();
        let result = result_with_boxes(&[(BoundingBox::new(10., 10., 60., 60.), "cup")]);

        overlay.set_result(result.clone(), 400, 300);
        let first_scale = overlay.scale_factor();
        let first_mapped = overlay.mapped_boxes().to_vec();

        overlay.set_result(result, 400, 300);
        assert_eq!(overlay.scale_factor(), first_scale);
        assert_eq!(overlay.mapped_boxes(), first_mapped.as_slice());
    }

    #[test]
    fn zero_sized_update_keeps_previous_state() {
        let mut overlay = DetectionOverlay::default();
        overlay.set_result(
            result_with_boxes(&[(BoundingBox::new(10., 10., 60., 60.), "cup")]),
            200,
            100,
        );
        let before = overlay.mapped_boxes().to_vec();

        let degenerate = DetectionResult::new(vec![], 0, 0, Rotation::Deg0, 99);
        overlay.set_result(degenerate, 200, 100);

        assert_eq!(overlay.mapped_boxes(), before.as_slice());
        assert_eq!(overlay.result().unwrap().timestamp_micros, 0);
    }

    #[test]
    fn clear_drops_result_and_tap_targets() {
        let mut overlay = DetectionOverlay::default();
        overlay.set_result(
            result_with_boxes(&[(BoundingBox::new(10., 10., 60., 60.), "cup")]),
            200,
            100,
        );
        overlay.clear();

        assert!(overlay.result().is_none());
        assert!(overlay.mapped_boxes().is_empty());
        assert!(overlay.hit_test(20., 20.).is_none());
    }

    #[test]
    fn invalidation_is_consumed_once() {
        let mut overlay = DetectionOverlay::default();
        assert!(!overlay.take_invalidated());

        overlay.set_result(result_with_boxes(&[]), 200, 100);
        assert!(overlay.take_invalidated());
        assert!(!overlay.take_invalidated());
    }

    #[test]
    fn draw_outlines_boxes_without_a_font() {
        let style = OverlayStyle::new()
            .with_stroke_width(1)
            .with_box_color(Rgba([255, 0, 0, 255]));
        let mut overlay = DetectionOverlay::new(style);
        overlay.set_result(
            result_with_boxes(&[(BoundingBox::new(10., 10., 20., 20.), "cup")]),
            200,
            100,
        );

        let mut canvas = RgbaImage::new(200, 100);
        overlay.draw(&mut canvas);

        assert_eq!(canvas.get_pixel(10, 10), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(15, 15), &Rgba([0, 0, 0, 0]));
    }
}
