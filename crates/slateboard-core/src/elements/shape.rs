//! Geometric shapes: rectangle, circle, ellipse, freeline.

use super::{ElementId, Rgba, Transform2d};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum extent below which a dragged-out shape is judged accidental and
/// not committed.
pub const MIN_SHAPE_EXTENT: f64 = 5.0;

/// Shape variants selectable from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Ellipse,
    Freeline,
}

/// Variant-specific geometry, tagged with the record's `type` field.
///
/// For rectangles the element position is the top-left corner; for circles
/// and ellipses it is the center; freelines ignore it and carry their own
/// endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeGeometry {
    Rectangle {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
    },
    #[serde(rename_all = "camelCase")]
    Ellipse {
        radius_x: f64,
        radius_y: f64,
    },
    Freeline {
        #[serde(with = "crate::elements::flat_points")]
        points: Vec<Point>,
    },
}

/// A committed shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub geometry: ShapeGeometry,
    pub color: Rgba,
    pub stroke_width: f64,
    #[serde(flatten)]
    pub transform: Transform2d,
}

impl ShapeElement {
    /// Start dragging a new shape at the pointer-down position. All extents
    /// begin at zero and grow via [`drag_to`](Self::drag_to).
    pub fn begin(kind: ShapeKind, origin: Point, color: Rgba, stroke_width: f64) -> Self {
        let (x, y, geometry) = match kind {
            ShapeKind::Rectangle => (
                origin.x,
                origin.y,
                ShapeGeometry::Rectangle { width: 0.0, height: 0.0 },
            ),
            ShapeKind::Circle => (origin.x, origin.y, ShapeGeometry::Circle { radius: 0.0 }),
            ShapeKind::Ellipse => (
                origin.x,
                origin.y,
                ShapeGeometry::Ellipse { radius_x: 0.0, radius_y: 0.0 },
            ),
            // Freelines keep their coordinates in the point list.
            ShapeKind::Freeline => (
                0.0,
                0.0,
                ShapeGeometry::Freeline { points: vec![origin, origin] },
            ),
        };
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            geometry,
            color,
            stroke_width,
            transform: Transform2d::default(),
        }
    }

    /// Update the in-progress geometry from the current pointer position.
    /// The anchor set at pointer-down stays fixed.
    pub fn drag_to(&mut self, pointer: Point) {
        let anchor = Point::new(self.x, self.y);
        match &mut self.geometry {
            ShapeGeometry::Rectangle { width, height } => {
                *width = pointer.x - anchor.x;
                *height = pointer.y - anchor.y;
            }
            ShapeGeometry::Circle { radius } => {
                *radius = anchor.distance(pointer);
            }
            ShapeGeometry::Ellipse { radius_x, radius_y } => {
                *radius_x = (pointer.x - anchor.x).abs();
                *radius_y = (pointer.y - anchor.y).abs();
            }
            ShapeGeometry::Freeline { points } => {
                if let Some(end) = points.last_mut() {
                    *end = pointer;
                }
            }
        }
    }

    /// Whether the shape is large enough to commit. Tiny drag slips are
    /// discarded instead of replicated.
    pub fn is_significant(&self) -> bool {
        match &self.geometry {
            ShapeGeometry::Rectangle { width, height } => {
                width.abs() > MIN_SHAPE_EXTENT && height.abs() > MIN_SHAPE_EXTENT
            }
            ShapeGeometry::Circle { radius } => *radius > MIN_SHAPE_EXTENT,
            ShapeGeometry::Ellipse { radius_x, radius_y } => {
                *radius_x > MIN_SHAPE_EXTENT && *radius_y > MIN_SHAPE_EXTENT
            }
            ShapeGeometry::Freeline { points } => match (points.first(), points.last()) {
                (Some(start), Some(end)) if points.len() >= 2 => {
                    start.distance(*end) > MIN_SHAPE_EXTENT
                }
                _ => false,
            },
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self.geometry {
            ShapeGeometry::Rectangle { .. } => ShapeKind::Rectangle,
            ShapeGeometry::Circle { .. } => ShapeKind::Circle,
            ShapeGeometry::Ellipse { .. } => ShapeKind::Ellipse,
            ShapeGeometry::Freeline { .. } => ShapeKind::Freeline,
        }
    }
}
