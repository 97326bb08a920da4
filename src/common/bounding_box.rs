use serde::{Deserialize, Serialize};

/// Axis-aligned box, stored as its four edges in `f32` so it can be rotated
/// and scaled without accumulating rounding error. Used both for detections
/// in frame space and for their mapped rectangles in view space.
#[derive(Default, Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Builds a box from two opposite corners given in any order.
    pub fn from_corners(a: (f32, f32), b: (f32, f32)) -> Self {
        Self {
            left: a.0.min(b.0),
            top: a.1.min(b.1),
            right: a.0.max(b.0),
            bottom: a.1.max(b.1),
        }
    }

    /// Returns the width of the box.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Returns the height of the box.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Returns the center x-coordinate of the box.
    pub fn cx(&self) -> f32 {
        self.left + self.width() / 2.
    }

    /// Returns the center y-coordinate of the box.
    pub fn cy(&self) -> f32 {
        self.top + self.height() / 2.
    }

    /// Computes the area of the box.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Checks whether a point falls inside the box. The left and top edges
    /// are inclusive, the right and bottom edges exclusive, so adjacent
    /// boxes never both claim a shared edge.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Computes the intersection area between this box and another.
    pub fn intersect(&self, other: &BoundingBox) -> f32 {
        let left = self.left.max(other.left);
        let right = self.right.min(other.right);
        let top = self.top.max(other.top);
        let bottom = self.bottom.min(other.bottom);
        (right - left).max(0.) * (bottom - top).max(0.)
    }

    /// Computes the union area between this box and another.
    pub fn union(&self, other: &BoundingBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    /// Returns a copy with every coordinate multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            left: self.left * factor,
            top: self.top * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
        }
    }

    /// Returns a copy with both corners shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    pub fn as_ltrb_i32(&self) -> (i32, i32, i32, i32) {
        (self.left.round() as i32,
         self.top.round() as i32,
         self.right.round() as i32,
         self.bottom.round() as i32)
    }

    pub fn as_xy_wh_i32(&self) -> (i32, i32, i32, i32) {
        (self.left.round() as i32,
         self.top.round() as i32,
         self.width().round() as i32,
         self.height().round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_normalize() {
        let b = BoundingBox::from_corners((10., 20.), (2., 4.));
        assert_eq!(b, BoundingBox::new(2., 4., 10., 20.));
        assert_eq!(b.width(), 8.);
        assert_eq!(b.height(), 16.);
    }

    #[test]
    fn containment_is_half_open() {
        let b = BoundingBox::new(0., 0., 10., 10.);
        assert!(b.contains_point(0., 0.));
        assert!(b.contains_point(9.9, 9.9));
        assert!(!b.contains_point(10., 5.));
        assert!(!b.contains_point(5., 10.));
        assert!(!b.contains_point(-0.1, 5.));
    }

    #[test]
    fn disjoint_boxes_have_zero_intersection() {
        let a = BoundingBox::new(0., 0., 5., 5.);
        let b = BoundingBox::new(6., 6., 8., 8.);
        assert_eq!(a.intersect(&b), 0.);
        assert_eq!(a.union(&b), a.area() + b.area());
    }

    #[test]
    fn scale_multiplies_all_edges() {
        let b = BoundingBox::new(1., 2., 3., 4.).scaled(2.);
        assert_eq!(b, BoundingBox::new(2., 4., 6., 8.));
    }
}
