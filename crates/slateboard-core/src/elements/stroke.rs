//! Freehand pen strokes.

use super::{ElementId, Rgba, flat_points};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pen stroke: an ordered polyline with paint settings.
///
/// Record shape: `{ "id", "points": [x0, y0, ..], "color", "strokeWidth" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub id: ElementId,
    #[serde(with = "flat_points")]
    pub points: Vec<Point>,
    pub color: Rgba,
    pub stroke_width: f64,
}

impl Stroke {
    /// Create an empty stroke with the given paint settings.
    pub fn new(color: Rgba, stroke_width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            color,
            stroke_width,
        }
    }

    /// Create a stroke from an existing polyline.
    pub fn from_points(points: Vec<Point>, color: Rgba, stroke_width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            stroke_width,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
