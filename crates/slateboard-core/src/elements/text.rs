//! Text labels.

use super::{ElementId, Rgba, Transform2d};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Approximate glyph width as a fraction of the font size. Good enough for
/// casual erase hit boxes; exact font metrics are a non-goal.
const GLYPH_WIDTH_FACTOR: f64 = 0.6;

/// A text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLabel {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub color: Rgba,
    #[serde(flatten)]
    pub transform: Transform2d,
}

impl TextLabel {
    /// Create an empty label at the given position; content is typically
    /// filled in by a follow-up edit.
    pub fn new(position: Point, font_size: f64, font_family: impl Into<String>, color: Rgba) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: position.x,
            y: position.y,
            text: String::new(),
            font_size,
            font_family: font_family.into(),
            color,
            transform: Transform2d::default(),
        }
    }

    /// Approximate bounding box: character count scaled by the font size.
    pub fn approx_bounds(&self) -> Rect {
        let width = self.text.chars().count() as f64 * self.font_size * GLYPH_WIDTH_FACTOR;
        Rect::new(self.x, self.y, self.x + width, self.y + self.font_size)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
