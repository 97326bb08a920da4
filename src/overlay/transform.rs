use crate::common::{BoundingBox, DetectionResult, Rotation};

/// A detection's rectangle mapped into view space, keyed back to its index
/// in the source result so hit-testing can return the original detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedBox {
    pub view_rect: BoundingBox,
    pub index: usize,
}

/// Cover-fit scale factor mapping a result's rotated source dimensions onto
/// a view: the larger of the two axis ratios, so the scaled frame always
/// covers the whole view. `None` when either side has a zero dimension.
pub fn cover_scale_factor(
    result: &DetectionResult,
    view_width: u32,
    view_height: u32,
) -> Option<f32> {
    let (effective_width, effective_height) = result.rotated_dimensions();
    if effective_width == 0 || effective_height == 0 || view_width == 0 || view_height == 0 {
        return None;
    }

    let scale_w = view_width as f32 / effective_width as f32;
    let scale_h = view_height as f32 / effective_height as f32;
    Some(scale_w.max(scale_h))
}

/// Maps one frame-space box into view space. The order matters: translate so
/// the frame center is the origin, rotate by the capture rotation, translate
/// back out by the rotated half-extents, then scale everything by the cover
/// factor. Quarter turns keep the box axis-aligned, so mapping two opposite
/// corners is exact.
pub fn map_box(
    bbox: &BoundingBox,
    frame_width: u32,
    frame_height: u32,
    rotation: Rotation,
    scale_factor: f32,
) -> BoundingBox {
    let half_w = frame_width as f32 / 2.;
    let half_h = frame_height as f32 / 2.;
    let (out_x, out_y) = if rotation.swaps_dimensions() {
        (half_h, half_w)
    } else {
        (half_w, half_h)
    };

    let a = rotation.rotate_point(bbox.left - half_w, bbox.top - half_h);
    let b = rotation.rotate_point(bbox.right - half_w, bbox.bottom - half_h);

    BoundingBox::from_corners((a.0 + out_x, a.1 + out_y), (b.0 + out_x, b.1 + out_y))
        .scaled(scale_factor)
}

/// Maps every detection of a result into view space, preserving detection
/// order. `None` when the mapping collapses (zero-sized frame or view).
pub fn map_result(
    result: &DetectionResult,
    view_width: u32,
    view_height: u32,
) -> Option<(f32, Vec<MappedBox>)> {
    let scale_factor = cover_scale_factor(result, view_width, view_height)?;
    let mapped = result
        .detections
        .iter()
        .enumerate()
        .map(|(index, det)| MappedBox {
            view_rect: map_box(
                &det.bounding_box,
                result.frame_width,
                result.frame_height,
                result.rotation,
                scale_factor,
            ),
            index,
        })
        .collect();
    Some((scale_factor, mapped))
}
