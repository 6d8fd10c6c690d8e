//! Marshals element structs to and from the serialized records stored in
//! the shared document, and keeps the in-memory caches in step with change
//! notifications.
//!
//! On every notification the bridge re-reads the *entire* collection,
//! reparses it, drops records that fail to parse, and replaces its cache
//! wholesale. That is O(collection size) per notification, which the
//! capacity bounds keep affordable, and it means a cache can never drift
//! from the document by missing an incremental step.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::document::{Channel, DocumentError, ElementKind, SharedDocument, SubscriptionToken};
use crate::elements::{ElementId, ImageElement, ShapeElement, Stroke, TextLabel, ViewState};
use crate::history::CanvasSnapshot;

/// Parse every record in a collection. A record that fails to parse is
/// dropped with a warning; the rest of the collection still loads.
fn parse_records<T: DeserializeOwned>(kind: ElementKind, records: &[String]) -> Vec<T> {
    records
        .iter()
        .filter_map(|record| match serde_json::from_str(record) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                log::warn!("dropping malformed {kind} record: {err}");
                None
            }
        })
        .collect()
}

fn to_record<T: Serialize>(element: &T) -> Result<String, DocumentError> {
    Ok(serde_json::to_string(element)?)
}

fn to_records<T: Serialize>(elements: &[T]) -> Result<Vec<String>, DocumentError> {
    elements.iter().map(to_record).collect()
}

/// Register a cache-refresh handler for one element collection.
fn subscribe_cache<T: DeserializeOwned + 'static>(
    doc: &Rc<SharedDocument>,
    kind: ElementKind,
    cache: &Rc<RefCell<Vec<T>>>,
    suppressed: &Rc<Cell<bool>>,
) -> SubscriptionToken {
    let cache = Rc::clone(cache);
    let suppressed = Rc::clone(suppressed);
    doc.subscribe(
        kind.into(),
        Rc::new(move |doc, _| {
            // While a history replay is rewriting the document, the cache is
            // assigned directly from the snapshot instead; reading here would
            // observe a partially-written document.
            if suppressed.get() {
                return;
            }
            *cache.borrow_mut() = parse_records(kind, &doc.records(kind));
        }),
    )
}

/// Keeps parsed element caches synchronized with the shared document.
pub struct SyncBridge {
    doc: Rc<SharedDocument>,
    strokes: Rc<RefCell<Vec<Stroke>>>,
    shapes: Rc<RefCell<Vec<ShapeElement>>>,
    images: Rc<RefCell<Vec<ImageElement>>>,
    texts: Rc<RefCell<Vec<TextLabel>>>,
    view_state: Rc<Cell<ViewState>>,
    tokens: Vec<SubscriptionToken>,
}

impl SyncBridge {
    /// Subscribe to every channel of the document and load the initial
    /// caches. The suppression flag is shared with whoever replays history
    /// into the document.
    pub fn attach(doc: Rc<SharedDocument>, suppressed: Rc<Cell<bool>>) -> Self {
        let strokes = Rc::new(RefCell::new(Vec::new()));
        let shapes = Rc::new(RefCell::new(Vec::new()));
        let images = Rc::new(RefCell::new(Vec::new()));
        let texts = Rc::new(RefCell::new(Vec::new()));
        let view_state = Rc::new(Cell::new(ViewState::default()));

        let tokens = vec![
            subscribe_cache(&doc, ElementKind::Strokes, &strokes, &suppressed),
            subscribe_cache(&doc, ElementKind::Shapes, &shapes, &suppressed),
            subscribe_cache(&doc, ElementKind::Images, &images, &suppressed),
            subscribe_cache(&doc, ElementKind::Texts, &texts, &suppressed),
            {
                let view_state = Rc::clone(&view_state);
                doc.subscribe(
                    Channel::ViewState,
                    Rc::new(move |doc, _| view_state.set(doc.view_state())),
                )
            },
        ];

        let bridge = Self {
            doc,
            strokes,
            shapes,
            images,
            texts,
            view_state,
            tokens,
        };
        bridge.refresh_all();
        bridge
    }

    /// Reload every cache from the document.
    pub fn refresh_all(&self) {
        *self.strokes.borrow_mut() =
            parse_records(ElementKind::Strokes, &self.doc.records(ElementKind::Strokes));
        *self.shapes.borrow_mut() =
            parse_records(ElementKind::Shapes, &self.doc.records(ElementKind::Shapes));
        *self.images.borrow_mut() =
            parse_records(ElementKind::Images, &self.doc.records(ElementKind::Images));
        *self.texts.borrow_mut() =
            parse_records(ElementKind::Texts, &self.doc.records(ElementKind::Texts));
        self.view_state.set(self.doc.view_state());
    }

    // --- Cached reads ---

    pub fn strokes(&self) -> Ref<'_, Vec<Stroke>> {
        self.strokes.borrow()
    }

    pub fn shapes(&self) -> Ref<'_, Vec<ShapeElement>> {
        self.shapes.borrow()
    }

    pub fn images(&self) -> Ref<'_, Vec<ImageElement>> {
        self.images.borrow()
    }

    pub fn texts(&self) -> Ref<'_, Vec<TextLabel>> {
        self.texts.borrow()
    }

    pub fn view_state(&self) -> ViewState {
        self.view_state.get()
    }

    /// Clone all four caches into one immutable capture.
    pub fn snapshot(&self, timestamp_ms: f64) -> CanvasSnapshot {
        CanvasSnapshot {
            strokes: self.strokes.borrow().clone(),
            shapes: self.shapes.borrow().clone(),
            images: self.images.borrow().clone(),
            texts: self.texts.borrow().clone(),
            timestamp_ms,
        }
    }

    // --- Writes (serialize at the boundary, then go through the document) ---

    pub fn commit_stroke(&self, stroke: &Stroke) -> Result<(), DocumentError> {
        self.doc.append(ElementKind::Strokes, &to_record(stroke)?)
    }

    pub fn commit_shape(&self, shape: &ShapeElement) -> Result<(), DocumentError> {
        self.doc.append(ElementKind::Shapes, &to_record(shape)?)
    }

    pub fn commit_image(&self, image: &ImageElement) -> Result<(), DocumentError> {
        self.doc.append(ElementKind::Images, &to_record(image)?)
    }

    pub fn commit_text(&self, label: &TextLabel) -> Result<(), DocumentError> {
        self.doc.append(ElementKind::Texts, &to_record(label)?)
    }

    /// Edit one shape in place, keeping its z-order slot.
    pub fn update_shape(
        &self,
        id: ElementId,
        edit: impl FnOnce(&mut ShapeElement),
    ) -> Result<(), DocumentError> {
        let found = self.shapes.borrow().iter().find(|s| s.id == id).cloned();
        let mut shape = found.ok_or_else(|| DocumentError::NotFound {
            kind: ElementKind::Shapes,
            id: id.to_string(),
        })?;
        edit(&mut shape);
        self.doc
            .replace(ElementKind::Shapes, &id.to_string(), &to_record(&shape)?)
    }

    /// Edit one image in place, keeping its z-order slot.
    pub fn update_image(
        &self,
        id: ElementId,
        edit: impl FnOnce(&mut ImageElement),
    ) -> Result<(), DocumentError> {
        let found = self.images.borrow().iter().find(|i| i.id == id).cloned();
        let mut image = found.ok_or_else(|| DocumentError::NotFound {
            kind: ElementKind::Images,
            id: id.to_string(),
        })?;
        edit(&mut image);
        self.doc
            .replace(ElementKind::Images, &id.to_string(), &to_record(&image)?)
    }

    /// Edit one text label in place, keeping its z-order slot.
    pub fn update_text(
        &self,
        id: ElementId,
        edit: impl FnOnce(&mut TextLabel),
    ) -> Result<(), DocumentError> {
        let found = self.texts.borrow().iter().find(|t| t.id == id).cloned();
        let mut label = found.ok_or_else(|| DocumentError::NotFound {
            kind: ElementKind::Texts,
            id: id.to_string(),
        })?;
        edit(&mut label);
        self.doc
            .replace(ElementKind::Texts, &id.to_string(), &to_record(&label)?)
    }

    /// Delete one element by id; absent ids are a quiet no-op.
    pub fn delete_element(&self, kind: ElementKind, id: ElementId) -> Result<bool, DocumentError> {
        self.doc.remove_by_id(kind, &id.to_string())
    }

    // --- History replay support ---

    /// Rewrite the whole document from a snapshot. Callers hold the
    /// suppression flag around this so the notifications it fires neither
    /// refresh caches nor capture new history.
    pub fn restore_document(&self, snapshot: &CanvasSnapshot) -> Result<(), DocumentError> {
        self.doc
            .replace_all(ElementKind::Strokes, &to_records(&snapshot.strokes)?)?;
        self.doc
            .replace_all(ElementKind::Shapes, &to_records(&snapshot.shapes)?)?;
        self.doc
            .replace_all(ElementKind::Images, &to_records(&snapshot.images)?)?;
        self.doc
            .replace_all(ElementKind::Texts, &to_records(&snapshot.texts)?)?;
        Ok(())
    }

    /// Assign the caches directly from a snapshot, bypassing the parse path.
    pub fn overwrite_cache(&self, snapshot: &CanvasSnapshot) {
        *self.strokes.borrow_mut() = snapshot.strokes.clone();
        *self.shapes.borrow_mut() = snapshot.shapes.clone();
        *self.images.borrow_mut() = snapshot.images.clone();
        *self.texts.borrow_mut() = snapshot.texts.clone();
    }

    fn detach(&mut self) {
        for token in self.tokens.drain(..) {
            // Best-effort: a token the document no longer knows is logged
            // inside unsubscribe and otherwise ignored.
            self.doc.unsubscribe(token);
        }
    }
}

impl Drop for SyncBridge {
    fn drop(&mut self) {
        self.detach();
    }
}
