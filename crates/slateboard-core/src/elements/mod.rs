//! Canvas element definitions and the canonical record shapes they
//! serialize to.
//!
//! Every element carries an opaque [`ElementId`] assigned at creation and
//! never changed afterwards. The serde derives on these types produce the
//! exact JSON records stored in the shared document, so the wire shape is
//! defined here and nowhere else.

mod image;
mod shape;
mod stroke;
mod text;

pub use image::ImageElement;
pub use shape::{MIN_SHAPE_EXTENT, ShapeElement, ShapeGeometry, ShapeKind};
pub use stroke::Stroke;
pub use text::TextLabel;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for canvas elements.
pub type ElementId = Uuid;

/// Replicated pan offset of the shared canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub x: f64,
    pub y: f64,
}

/// RGBA color carried as `#rrggbb` / `#rrggbbaa` hex on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse a `#rrggbb` or `#rrggbbaa` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let byte_at = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::new(byte_at(0)?, byte_at(2)?, byte_at(4)?, 255)),
            8 => Some(Self::new(byte_at(0)?, byte_at(2)?, byte_at(4)?, byte_at(6)?)),
            _ => None,
        }
    }

    /// Hex form; the alpha byte is omitted when fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color {hex:?}")))
    }
}

/// Optional scale/rotation carried by selectable elements. Absent fields
/// stay off the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform2d {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

/// Serde adapter storing `Vec<Point>` as the flat `[x0, y0, x1, y1, ..]`
/// arrays the record format uses.
pub(crate) mod flat_points {
    use kurbo::Point;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(points: &[Point], serializer: S) -> Result<S::Ok, S::Error> {
        let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        serializer.collect_seq(flat)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Point>, D::Error> {
        let flat = Vec::<f64>::deserialize(deserializer)?;
        if flat.len() % 2 != 0 {
            return Err(D::Error::custom("point array has odd length"));
        }
        Ok(flat.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse_opaque() {
        let color = Rgba::from_hex("#ff8000").unwrap();
        assert_eq!(color, Rgba::new(255, 128, 0, 255));
        assert_eq!(color.to_hex(), "#ff8000");
    }

    #[test]
    fn test_color_parse_with_alpha() {
        let color = Rgba::from_hex("#00ff0080").unwrap();
        assert_eq!(color.a, 128);
        assert_eq!(color.to_hex(), "#00ff0080");
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!(Rgba::from_hex("red").is_none());
        assert!(Rgba::from_hex("#12345").is_none());
        assert!(Rgba::from_hex("#gggggg").is_none());
    }

    #[test]
    fn test_color_json_roundtrip() {
        let json = serde_json::to_string(&Rgba::new(1, 2, 3, 255)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::new(1, 2, 3, 255));
    }

    #[test]
    fn test_transform_absent_fields_stay_off_the_wire() {
        let json = serde_json::to_value(Transform2d::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
