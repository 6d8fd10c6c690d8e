//! Eraser collision engine: pure geometry over a canvas snapshot.
//!
//! Given the pointer samples of one erase gesture and a snapshot of the
//! element collections, compute which elements the gesture touched. The
//! whole module is free of state and side effects, so identical inputs
//! always produce identical hit sets.

use kurbo::{Point, Rect};

use crate::elements::{ElementId, ShapeElement, ShapeGeometry};
use crate::history::CanvasSnapshot;

/// Distance below which an eraser segment endpoint erases a stroke segment.
pub const ERASE_THRESHOLD: f64 = 10.0;

/// Ids marked for deletion by one erase gesture, per collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EraserHits {
    pub strokes: Vec<ElementId>,
    pub shapes: Vec<ElementId>,
    pub images: Vec<ElementId>,
    pub texts: Vec<ElementId>,
}

impl EraserHits {
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
            && self.shapes.is_empty()
            && self.images.is_empty()
            && self.texts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strokes.len() + self.shapes.len() + self.images.len() + self.texts.len()
    }
}

/// Collect every element the eraser path touches. Paths with fewer than two
/// samples can't form a segment and hit nothing.
pub fn erase_hits(eraser_path: &[Point], snapshot: &CanvasSnapshot) -> EraserHits {
    let mut hits = EraserHits::default();
    if eraser_path.len() < 2 {
        return hits;
    }

    for stroke in &snapshot.strokes {
        if polyline_hit(eraser_path, &stroke.points) {
            hits.strokes.push(stroke.id);
        }
    }
    for shape in &snapshot.shapes {
        if shape_hit(eraser_path, shape) {
            hits.shapes.push(shape.id);
        }
    }
    for image in &snapshot.images {
        if eraser_path.iter().any(|&p| point_in_rect(p, image.bounds())) {
            hits.images.push(image.id);
        }
    }
    for text in &snapshot.texts {
        if eraser_path.iter().any(|&p| point_in_rect(p, text.approx_bounds())) {
            hits.texts.push(text.id);
        }
    }
    hits
}

fn shape_hit(eraser_path: &[Point], shape: &ShapeElement) -> bool {
    let center = Point::new(shape.x, shape.y);
    match &shape.geometry {
        ShapeGeometry::Rectangle { width, height } => {
            // Normalize so a box dragged out with negative extents still
            // erases.
            let rect = Rect::new(shape.x, shape.y, shape.x + width, shape.y + height).abs();
            eraser_path.iter().any(|&p| point_in_rect(p, rect))
        }
        ShapeGeometry::Circle { radius } => {
            eraser_path.iter().any(|&p| point_in_circle(p, center, *radius))
        }
        ShapeGeometry::Ellipse { radius_x, radius_y } => eraser_path
            .iter()
            .any(|&p| point_in_ellipse(p, center, *radius_x, *radius_y)),
        ShapeGeometry::Freeline { points } => polyline_hit(eraser_path, points),
    }
}

/// Inclusive axis-aligned box test (kurbo's `Rect::contains` is half-open).
fn point_in_rect(p: Point, rect: Rect) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Squared-distance test against the squared radius; boundary inclusive,
/// no square root.
fn point_in_circle(p: Point, center: Point, radius: f64) -> bool {
    (p - center).hypot2() <= radius * radius
}

/// Normalized quadratic form `(dx/rx)² + (dy/ry)² ≤ 1`. Degenerate radii
/// make the quotient non-finite and the test false.
fn point_in_ellipse(p: Point, center: Point, radius_x: f64, radius_y: f64) -> bool {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    (dx * dx) / (radius_x * radius_x) + (dy * dy) / (radius_y * radius_y) <= 1.0
}

/// Eraser polyline vs element polyline: hit when either endpoint of any
/// eraser segment comes within [`ERASE_THRESHOLD`] of any element segment.
/// Returns on the first hit.
fn polyline_hit(eraser_path: &[Point], points: &[Point]) -> bool {
    if eraser_path.len() < 2 || points.len() < 2 {
        return false;
    }
    for eraser_seg in eraser_path.windows(2) {
        for seg in points.windows(2) {
            if point_to_segment_dist(eraser_seg[0], seg[0], seg[1]) < ERASE_THRESHOLD
                || point_to_segment_dist(eraser_seg[1], seg[0], seg[1]) < ERASE_THRESHOLD
            {
                return true;
            }
        }
    }
    false
}

/// Distance from a point to a line segment (a→b).
fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}
