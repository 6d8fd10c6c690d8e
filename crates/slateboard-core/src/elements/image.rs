//! Placed raster images.

use super::{ElementId, Transform2d};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image placed on the canvas. Pixel data sits behind an opaque source
/// reference; decoding and file ingestion happen outside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub pixel_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub transform: Transform2d,
}

impl ImageElement {
    pub fn new(position: Point, width: f64, height: f64, pixel_source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: position.x,
            y: position.y,
            width,
            height,
            pixel_source: pixel_source.into(),
            name: None,
            transform: Transform2d::default(),
        }
    }

    /// Axis-aligned placement box, normalized so negative extents still
    /// produce a well-formed rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }
}
