use serde::{Deserialize, Serialize};
use crate::common::BoundingBox;

/// A single detected object in the coordinate space of its source frame.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bounding_box: BoundingBox,
    pub label: Option<String>,
    pub score: f32,
}

impl Detection {
    pub fn new(bounding_box: BoundingBox, label: Option<String>, score: f32) -> Self {
        Self { bounding_box, label, score }
    }

    /// Sets the bounding box using `(left, top, right, bottom)` edges.
    ///
    /// # Arguments
    ///
    /// * `left` - The x-coordinate of the left edge.
    /// * `top` - The y-coordinate of the top edge.
    /// * `right` - The x-coordinate of the right edge.
    /// * `bottom` - The y-coordinate of the bottom edge.
    ///
    /// # Returns
    ///
    /// A `Detection` instance with an updated bounding box.
    pub fn with_ltrb(mut self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        self.bounding_box = BoundingBox::new(left, top, right, bottom);
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn get_label(&self) -> String {
        self.label.clone().unwrap_or("Unknown".to_string())
    }

    /// Caption drawn next to the box, `"label score"` with two decimals.
    pub fn caption(&self) -> String {
        format!("{} {:.2}", self.get_label(), self.score)
    }
}
