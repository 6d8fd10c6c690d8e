//! Whiteboard editing session: routes pointer gestures into document
//! writes and coordinates replication with local history.
//!
//! All state transitions here are synchronous reactions to pointer events
//! or to change notifications; nothing blocks or suspends. The in-progress
//! gesture, the active tool, and the brush settings are strictly
//! per-client and never replicated.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::Point;

use crate::bridge::SyncBridge;
use crate::collision::{EraserHits, erase_hits};
use crate::document::{DocumentError, ElementKind, SharedDocument};
use crate::elements::{
    ElementId, ImageElement, Rgba, ShapeElement, ShapeKind, Stroke, TextLabel, ViewState,
};
use crate::history::{CanvasSnapshot, HistoryManager};
use crate::smoothing::StrokeSmoother;

/// Active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pen,
    Shape(ShapeKind),
    Text,
    Eraser,
    Pan,
}

/// Per-client brush settings applied to newly created elements.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushSettings {
    pub color: Rgba,
    pub stroke_width: f64,
    pub font_size: f64,
    pub font_family: String,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Rgba::black(),
            stroke_width: 2.5,
            font_size: 16.0,
            font_family: "Arial".to_owned(),
        }
    }
}

/// In-progress gesture state.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Drawing {
        smoother: StrokeSmoother,
        stroke: Stroke,
    },
    Shaping {
        shape: ShapeElement,
    },
    Erasing {
        path: Vec<Point>,
    },
    Panning {
        pointer_start: Point,
        pointer_last: Point,
        offset_start: ViewState,
    },
}

/// One client's editing session over a shared document.
pub struct Whiteboard {
    doc: Rc<SharedDocument>,
    bridge: SyncBridge,
    history: HistoryManager,
    /// Held while replaying history so the resulting notifications neither
    /// refresh caches nor get captured as new history. A plain flag is
    /// enough: everything runs on one logical timeline.
    suppressed: Rc<Cell<bool>>,
    pub tool: Tool,
    pub brush: BrushSettings,
    gesture: Gesture,
    /// Label created by the latest text gesture; removed again if its first
    /// edit leaves it blank.
    last_text_id: Option<ElementId>,
}

impl Whiteboard {
    /// Open an editing session on a shared document. Records a baseline
    /// history snapshot of whatever state the document already carries.
    pub fn new(doc: Rc<SharedDocument>) -> Self {
        let suppressed = Rc::new(Cell::new(false));
        let bridge = SyncBridge::attach(Rc::clone(&doc), Rc::clone(&suppressed));
        let mut history = HistoryManager::new();
        history.save_state(bridge.snapshot(0.0));
        Self {
            doc,
            bridge,
            history,
            suppressed,
            tool: Tool::default(),
            brush: BrushSettings::default(),
            gesture: Gesture::Idle,
            last_text_id: None,
        }
    }

    pub fn document(&self) -> &Rc<SharedDocument> {
        &self.doc
    }

    pub fn bridge(&self) -> &SyncBridge {
        &self.bridge
    }

    // --- Pointer gestures ---

    /// Begin a gesture. Timestamps are caller-supplied milliseconds; the
    /// core never reads a clock.
    pub fn pointer_down(&mut self, position: Point, timestamp_ms: f64) {
        if !matches!(self.gesture, Gesture::Idle) {
            log::debug!("pointer down while a gesture is active; ignoring");
            return;
        }
        match self.tool {
            Tool::Pen => {
                if self.at_capacity(ElementKind::Strokes) {
                    return;
                }
                let mut stroke = Stroke::new(self.brush.color, self.brush.stroke_width);
                stroke.points.push(position);
                self.gesture = Gesture::Drawing {
                    smoother: StrokeSmoother::begin(position, timestamp_ms),
                    stroke,
                };
            }
            Tool::Shape(kind) => {
                if self.at_capacity(ElementKind::Shapes) {
                    return;
                }
                self.gesture = Gesture::Shaping {
                    shape: ShapeElement::begin(kind, position, self.brush.color, self.brush.stroke_width),
                };
            }
            Tool::Text => {
                if self.at_capacity(ElementKind::Texts) {
                    return;
                }
                let label = TextLabel::new(
                    position,
                    self.brush.font_size,
                    self.brush.font_family.clone(),
                    self.brush.color,
                );
                let id = label.id;
                match self.bridge.commit_text(&label) {
                    Ok(()) => self.last_text_id = Some(id),
                    Err(err) => log::warn!("failed to add text label: {err}"),
                }
            }
            Tool::Eraser => {
                self.gesture = Gesture::Erasing { path: vec![position] };
            }
            Tool::Pan => {
                self.gesture = Gesture::Panning {
                    pointer_start: position,
                    pointer_last: position,
                    offset_start: self.bridge.view_state(),
                };
            }
        }
    }

    /// Advance the active gesture.
    pub fn pointer_move(&mut self, position: Point, timestamp_ms: f64) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Drawing { smoother, stroke } => {
                stroke.points = smoother.sample(position, timestamp_ms);
            }
            Gesture::Shaping { shape } => shape.drag_to(position),
            Gesture::Erasing { path } => path.push(position),
            Gesture::Panning { pointer_last, .. } => *pointer_last = position,
        }
    }

    /// Commit the active gesture.
    pub fn pointer_up(&mut self, position: Point, timestamp_ms: f64) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Drawing { stroke, .. } => {
                if stroke.points.len() >= 2 {
                    match self.bridge.commit_stroke(&stroke) {
                        Ok(()) => self.save_history(timestamp_ms),
                        Err(err) => log::warn!("failed to commit stroke: {err}"),
                    }
                }
            }
            Gesture::Shaping { mut shape } => {
                shape.drag_to(position);
                if shape.is_significant() {
                    match self.bridge.commit_shape(&shape) {
                        Ok(()) => self.save_history(timestamp_ms),
                        Err(err) => log::warn!("failed to commit shape: {err}"),
                    }
                }
            }
            Gesture::Erasing { path } => {
                let snapshot = self.bridge.snapshot(timestamp_ms);
                let hits = erase_hits(&path, &snapshot);
                if !hits.is_empty() {
                    self.delete_hits(&hits);
                    self.save_history(timestamp_ms);
                }
            }
            Gesture::Panning {
                pointer_start,
                offset_start,
                ..
            } => {
                let offset = ViewState {
                    x: offset_start.x + (position.x - pointer_start.x),
                    y: offset_start.y + (position.y - pointer_start.y),
                };
                if let Err(err) = self.doc.set_view_state(offset) {
                    log::warn!("failed to update view state: {err}");
                }
            }
        }
    }

    /// Discard the active gesture without committing anything
    /// (pointer-cancel / pointer-leave).
    pub fn pointer_cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    fn at_capacity(&self, kind: ElementKind) -> bool {
        let Some(capacity) = kind.capacity() else {
            return false;
        };
        if self.doc.len(kind) >= capacity {
            log::warn!("{kind} limit reached ({capacity}); ignoring gesture");
            true
        } else {
            false
        }
    }

    fn delete_hits(&self, hits: &EraserHits) {
        let groups = [
            (ElementKind::Strokes, &hits.strokes),
            (ElementKind::Shapes, &hits.shapes),
            (ElementKind::Images, &hits.images),
            (ElementKind::Texts, &hits.texts),
        ];
        for (kind, ids) in groups {
            for id in ids {
                if let Err(err) = self.doc.remove_by_id(kind, &id.to_string()) {
                    log::warn!("failed to erase {kind} element {id}: {err}");
                }
            }
        }
    }

    // --- In-progress state (for rendering previews) ---

    pub fn current_stroke(&self) -> Option<&Stroke> {
        match &self.gesture {
            Gesture::Drawing { stroke, .. } => Some(stroke),
            _ => None,
        }
    }

    pub fn current_shape(&self) -> Option<&ShapeElement> {
        match &self.gesture {
            Gesture::Shaping { shape } => Some(shape),
            _ => None,
        }
    }

    pub fn eraser_path(&self) -> Option<&[Point]> {
        match &self.gesture {
            Gesture::Erasing { path } => Some(path),
            _ => None,
        }
    }

    /// Current pan offset, including the live offset of an in-progress pan
    /// gesture that has not been committed yet.
    pub fn view_state(&self) -> ViewState {
        match &self.gesture {
            Gesture::Panning {
                pointer_start,
                pointer_last,
                offset_start,
            } => ViewState {
                x: offset_start.x + (pointer_last.x - pointer_start.x),
                y: offset_start.y + (pointer_last.y - pointer_start.y),
            },
            _ => self.bridge.view_state(),
        }
    }

    // --- Element edits outside of gestures ---

    /// Place an image that external ingestion already turned into a pixel
    /// source reference.
    pub fn add_image(&mut self, image: ImageElement, timestamp_ms: f64) -> Result<(), DocumentError> {
        self.bridge.commit_image(&image)?;
        self.save_history(timestamp_ms);
        Ok(())
    }

    /// Edit one shape in place (move, resize, rotate).
    pub fn update_shape(
        &mut self,
        id: ElementId,
        edit: impl FnOnce(&mut ShapeElement),
        timestamp_ms: f64,
    ) -> Result<(), DocumentError> {
        self.bridge.update_shape(id, edit)?;
        self.save_history(timestamp_ms);
        Ok(())
    }

    /// Edit one image in place.
    pub fn update_image(
        &mut self,
        id: ElementId,
        edit: impl FnOnce(&mut ImageElement),
        timestamp_ms: f64,
    ) -> Result<(), DocumentError> {
        self.bridge.update_image(id, edit)?;
        self.save_history(timestamp_ms);
        Ok(())
    }

    /// Edit one text label in place.
    pub fn update_text(
        &mut self,
        id: ElementId,
        edit: impl FnOnce(&mut TextLabel),
        timestamp_ms: f64,
    ) -> Result<(), DocumentError> {
        self.bridge.update_text(id, edit)?;
        self.save_history(timestamp_ms);
        Ok(())
    }

    /// Finish editing a label. A freshly created label left blank is
    /// removed instead of lingering as an empty element.
    pub fn finish_text_edit(&mut self, id: ElementId, text: &str, timestamp_ms: f64) {
        if text.trim().is_empty() && self.last_text_id == Some(id) {
            if let Err(err) = self.doc.remove_by_id(ElementKind::Texts, &id.to_string()) {
                log::warn!("failed to drop blank text label: {err}");
            }
        } else {
            match self.update_text(id, |label| label.text = text.to_owned(), timestamp_ms) {
                Ok(()) => {}
                Err(err) => log::warn!("failed to update text label {id}: {err}"),
            }
        }
        if self.last_text_id == Some(id) {
            self.last_text_id = None;
        }
    }

    /// Delete one element directly (keyboard delete on a selection).
    pub fn delete_element(
        &mut self,
        kind: ElementKind,
        id: ElementId,
        timestamp_ms: f64,
    ) -> Result<(), DocumentError> {
        if self.bridge.delete_element(kind, id)? {
            self.save_history(timestamp_ms);
        }
        Ok(())
    }

    /// Wipe every element collection and the local history.
    pub fn clear_canvas(&mut self) {
        self.gesture = Gesture::Idle;
        self.last_text_id = None;
        if let Err(err) = self.doc.clear_elements() {
            log::warn!("failed to clear canvas: {err}");
        }
        self.history.clear();
    }

    /// Apply replicated bytes delivered by the external transport.
    pub fn apply_remote(&mut self, bytes: &[u8]) -> Result<(), DocumentError> {
        self.doc.import(bytes)
    }

    // --- History ---

    fn save_history(&mut self, timestamp_ms: f64) {
        if self.suppressed.get() {
            return;
        }
        self.history.save_state(self.bridge.snapshot(timestamp_ms));
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step the canvas back one snapshot. A no-op at the oldest state.
    pub fn undo(&mut self) {
        let Some(snapshot) = self.history.undo().cloned() else {
            return;
        };
        self.apply_snapshot(&snapshot);
    }

    /// Step the canvas forward one snapshot. A no-op at the newest state.
    pub fn redo(&mut self) {
        let Some(snapshot) = self.history.redo().cloned() else {
            return;
        };
        self.apply_snapshot(&snapshot);
    }

    fn apply_snapshot(&mut self, snapshot: &CanvasSnapshot) {
        self.suppressed.set(true);
        let result = self.bridge.restore_document(snapshot);
        // The caches take the snapshot verbatim instead of re-reading a
        // document that may be mid-rewrite.
        self.bridge.overwrite_cache(snapshot);
        self.suppressed.set(false);
        if let Err(err) = result {
            log::warn!("history restore left the document partially written: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Channel;

    fn board() -> Whiteboard {
        Whiteboard::new(Rc::new(SharedDocument::new()))
    }

    /// Drag a pen stroke through the given points, 10 ms apart.
    fn draw_stroke(board: &mut Whiteboard, points: &[Point], t0: f64) {
        board.tool = Tool::Pen;
        board.pointer_down(points[0], t0);
        for (i, &p) in points.iter().enumerate().skip(1) {
            board.pointer_move(p, t0 + i as f64 * 10.0);
        }
        board.pointer_up(points[points.len() - 1], t0 + points.len() as f64 * 10.0);
    }

    #[test]
    fn test_pen_gesture_commits_a_stroke() {
        let mut board = board();
        draw_stroke(
            &mut board,
            &[Point::new(0.0, 0.0), Point::new(20.0, 0.0), Point::new(40.0, 5.0)],
            0.0,
        );

        assert_eq!(board.doc.len(ElementKind::Strokes), 1);
        assert_eq!(board.bridge().strokes().len(), 1);
        assert!(board.can_undo());

        let strokes = board.bridge().strokes();
        let points = &strokes[0].points;
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert_eq!(*points.last().unwrap(), Point::new(40.0, 5.0));
    }

    #[test]
    fn test_single_click_pen_gesture_is_discarded() {
        let mut board = board();
        board.tool = Tool::Pen;
        board.pointer_down(Point::new(5.0, 5.0), 0.0);
        board.pointer_up(Point::new(5.0, 5.0), 10.0);

        assert_eq!(board.doc.len(ElementKind::Strokes), 0);
        assert!(!board.can_undo());
    }

    #[test]
    fn test_pointer_cancel_discards_uncommitted_work() {
        let mut board = board();
        board.tool = Tool::Pen;
        board.pointer_down(Point::new(0.0, 0.0), 0.0);
        board.pointer_move(Point::new(50.0, 0.0), 10.0);
        assert!(board.current_stroke().is_some());

        board.pointer_cancel();
        assert!(board.current_stroke().is_none());
        assert_eq!(board.doc.len(ElementKind::Strokes), 0);

        // The session keeps working after a cancel.
        draw_stroke(&mut board, &[Point::new(0.0, 0.0), Point::new(30.0, 0.0)], 100.0);
        assert_eq!(board.doc.len(ElementKind::Strokes), 1);
    }

    #[test]
    fn test_shape_gesture_respects_minimum_extent() {
        let mut board = board();
        board.tool = Tool::Shape(ShapeKind::Rectangle);

        board.pointer_down(Point::new(0.0, 0.0), 0.0);
        board.pointer_up(Point::new(3.0, 3.0), 10.0);
        assert_eq!(board.doc.len(ElementKind::Shapes), 0, "drag slip is discarded");

        board.pointer_down(Point::new(0.0, 0.0), 20.0);
        board.pointer_move(Point::new(30.0, 10.0), 30.0);
        board.pointer_up(Point::new(60.0, 40.0), 40.0);
        assert_eq!(board.doc.len(ElementKind::Shapes), 1);
    }

    #[test]
    fn test_eraser_gesture_deletes_hit_elements() {
        let mut board = board();
        draw_stroke(&mut board, &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)], 0.0);
        draw_stroke(&mut board, &[Point::new(0.0, 200.0), Point::new(100.0, 200.0)], 100.0);
        assert_eq!(board.doc.len(ElementKind::Strokes), 2);

        board.tool = Tool::Eraser;
        board.pointer_down(Point::new(50.0, 5.0), 300.0);
        board.pointer_move(Point::new(55.0, 5.0), 310.0);
        board.pointer_up(Point::new(55.0, 5.0), 320.0);

        assert_eq!(board.doc.len(ElementKind::Strokes), 1, "only the near stroke dies");
        assert_eq!(board.bridge().strokes().len(), 1);
    }

    #[test]
    fn test_eraser_miss_saves_no_history() {
        let mut board = board();
        draw_stroke(&mut board, &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)], 0.0);
        let depth = board.history.len();

        board.tool = Tool::Eraser;
        board.pointer_down(Point::new(500.0, 500.0), 300.0);
        board.pointer_move(Point::new(510.0, 500.0), 310.0);
        board.pointer_up(Point::new(510.0, 500.0), 320.0);

        assert_eq!(board.history.len(), depth);
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut board = board();
        draw_stroke(&mut board, &[Point::new(0.0, 0.0), Point::new(30.0, 0.0)], 0.0);
        draw_stroke(&mut board, &[Point::new(0.0, 50.0), Point::new(30.0, 50.0)], 100.0);
        assert_eq!(board.doc.len(ElementKind::Strokes), 2);

        board.undo();
        assert_eq!(board.doc.len(ElementKind::Strokes), 1);
        assert_eq!(board.bridge().strokes().len(), 1);
        assert!(board.can_redo());

        board.redo();
        assert_eq!(board.doc.len(ElementKind::Strokes), 2);
        assert_eq!(board.bridge().strokes().len(), 2);
    }

    #[test]
    fn test_undo_does_not_destroy_its_own_redo_branch() {
        let mut board = board();
        draw_stroke(&mut board, &[Point::new(0.0, 0.0), Point::new(30.0, 0.0)], 0.0);
        draw_stroke(&mut board, &[Point::new(0.0, 50.0), Point::new(30.0, 50.0)], 100.0);

        // If the rewrite performed by undo were captured as new history,
        // the redo branch would be truncated and this would fail.
        board.undo();
        assert!(board.can_redo(), "replay must not re-enter saveState");
        board.redo();
        assert_eq!(board.doc.len(ElementKind::Strokes), 2);
    }

    #[test]
    fn test_new_commit_after_undo_truncates_redo() {
        let mut board = board();
        draw_stroke(&mut board, &[Point::new(0.0, 0.0), Point::new(30.0, 0.0)], 0.0);
        draw_stroke(&mut board, &[Point::new(0.0, 50.0), Point::new(30.0, 50.0)], 100.0);

        board.undo();
        draw_stroke(&mut board, &[Point::new(0.0, 90.0), Point::new(30.0, 90.0)], 200.0);

        assert!(!board.can_redo());
        board.redo();
        assert_eq!(board.doc.len(ElementKind::Strokes), 2);
    }

    #[test]
    fn test_capacity_precheck_ignores_gesture() {
        let mut board = board();
        let full: Vec<String> = (0..crate::document::TEXT_CAPACITY)
            .map(|i| {
                let mut label =
                    TextLabel::new(Point::new(i as f64, 0.0), 16.0, "Arial", Rgba::black());
                label.text = "x".to_owned();
                serde_json::to_string(&label).unwrap()
            })
            .collect();
        board.doc.replace_all(ElementKind::Texts, &full).unwrap();

        board.tool = Tool::Text;
        board.pointer_down(Point::new(0.0, 0.0), 0.0);

        assert_eq!(board.doc.len(ElementKind::Texts), crate::document::TEXT_CAPACITY);
        assert!(board.last_text_id.is_none());
    }

    #[test]
    fn test_text_gesture_creates_then_edit_fills() {
        let mut board = board();
        board.tool = Tool::Text;
        board.pointer_down(Point::new(10.0, 10.0), 0.0);

        let id = board.last_text_id.expect("label committed on pointer down");
        assert_eq!(board.doc.len(ElementKind::Texts), 1);

        board.finish_text_edit(id, "hello", 10.0);
        assert_eq!(board.bridge().texts()[0].text, "hello");
    }

    #[test]
    fn test_blank_new_text_is_removed() {
        let mut board = board();
        board.tool = Tool::Text;
        board.pointer_down(Point::new(10.0, 10.0), 0.0);
        let id = board.last_text_id.unwrap();

        board.finish_text_edit(id, "   ", 10.0);
        assert_eq!(board.doc.len(ElementKind::Texts), 0);
        assert!(board.last_text_id.is_none());
    }

    #[test]
    fn test_pan_gesture_commits_view_state_on_release() {
        let mut board = board();
        board.tool = Tool::Pan;
        board.pointer_down(Point::new(100.0, 100.0), 0.0);
        board.pointer_move(Point::new(130.0, 90.0), 10.0);

        // Live preview before the commit.
        assert_eq!(board.view_state(), ViewState { x: 30.0, y: -10.0 });
        assert_eq!(board.doc.view_state(), ViewState::default());

        board.pointer_up(Point::new(150.0, 80.0), 20.0);
        assert_eq!(board.doc.view_state(), ViewState { x: 50.0, y: -20.0 });
        assert_eq!(board.bridge().view_state(), ViewState { x: 50.0, y: -20.0 });
    }

    #[test]
    fn test_remote_insert_between_down_and_up_survives() {
        let mut board = board();
        board.tool = Tool::Pen;
        board.pointer_down(Point::new(0.0, 0.0), 0.0);
        board.pointer_move(Point::new(20.0, 0.0), 10.0);

        // A remote peer's stroke lands mid-gesture.
        let peer = SharedDocument::new();
        peer.append(
            ElementKind::Strokes,
            &serde_json::to_string(&Stroke::from_points(
                vec![Point::new(0.0, 9.0), Point::new(9.0, 9.0)],
                Rgba::black(),
                1.0,
            ))
            .unwrap(),
        )
        .unwrap();
        board.apply_remote(&peer.export_snapshot()).unwrap();

        board.pointer_up(Point::new(40.0, 0.0), 20.0);
        assert_eq!(board.doc.len(ElementKind::Strokes), 2, "neither write is lost");
    }

    #[test]
    fn test_clear_canvas_resets_document_and_history() {
        let mut board = board();
        draw_stroke(&mut board, &[Point::new(0.0, 0.0), Point::new(30.0, 0.0)], 0.0);
        board.tool = Tool::Shape(ShapeKind::Circle);
        board.pointer_down(Point::new(0.0, 0.0), 100.0);
        board.pointer_up(Point::new(20.0, 0.0), 110.0);

        board.clear_canvas();
        for kind in ElementKind::ALL {
            assert_eq!(board.doc.len(kind), 0);
        }
        assert!(!board.can_undo());
        assert!(!board.can_redo());
    }

    #[test]
    fn test_update_shape_records_history() {
        let mut board = board();
        board.tool = Tool::Shape(ShapeKind::Rectangle);
        board.pointer_down(Point::new(0.0, 0.0), 0.0);
        board.pointer_up(Point::new(40.0, 40.0), 10.0);

        let id = board.bridge().shapes()[0].id;
        board
            .update_shape(id, |shape| shape.x = 200.0, 20.0)
            .unwrap();

        assert_eq!(board.bridge().shapes()[0].x, 200.0);
        board.undo();
        assert_eq!(board.bridge().shapes()[0].x, 0.0);
    }

    #[test]
    fn test_no_foreign_subscriber_leak_after_session_end() {
        let doc = Rc::new(SharedDocument::new());
        let fired = Rc::new(Cell::new(0usize));
        let fired_in_handler = Rc::clone(&fired);
        doc.subscribe(
            Channel::Strokes,
            Rc::new(move |_, _| fired_in_handler.set(fired_in_handler.get() + 1)),
        );

        {
            let mut board = Whiteboard::new(Rc::clone(&doc));
            draw_stroke(&mut board, &[Point::new(0.0, 0.0), Point::new(30.0, 0.0)], 0.0);
        }
        assert_eq!(fired.get(), 1);

        // The dropped session detached its own subscriptions; outside
        // subscribers keep working.
        doc.append(
            ElementKind::Strokes,
            &serde_json::to_string(&Stroke::from_points(
                vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
                Rgba::black(),
                1.0,
            ))
            .unwrap(),
        )
        .unwrap();
        assert_eq!(fired.get(), 2);
    }
}
