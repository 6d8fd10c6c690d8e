//! Slateboard Core Library
//!
//! Shared-state synchronization and editing engine for the Slateboard
//! collaborative whiteboard: a replicated element document, a client-local
//! undo/redo overlay, eraser collision geometry, and velocity-adaptive
//! stroke smoothing. Rendering, transport, and persistence live in other
//! layers and talk to this crate through the document's subscribe/import
//! surface.

pub mod bridge;
pub mod collision;
pub mod document;
pub mod elements;
pub mod history;
pub mod smoothing;
pub mod whiteboard;

pub use bridge::SyncBridge;
pub use collision::{ERASE_THRESHOLD, EraserHits, erase_hits};
pub use document::{
    Channel, DocumentError, ElementKind, SHAPE_CAPACITY, STROKE_CAPACITY, SharedDocument,
    SubscriptionToken, TEXT_CAPACITY,
};
pub use elements::{
    ElementId, ImageElement, Rgba, ShapeElement, ShapeGeometry, ShapeKind, Stroke, TextLabel,
    Transform2d, ViewState,
};
pub use history::{CanvasSnapshot, HistoryManager, MAX_HISTORY};
pub use smoothing::{CurveFamily, SpeedTier, StrokeSmoother, TierProfile, classify_velocity};
pub use whiteboard::{BrushSettings, Tool, Whiteboard};
