//! Replicated shared document backed by a Loro CRDT.
//!
//! # Schema
//!
//! ```text
//! LoroDoc
//! ├── "strokes":   LoroList<String> (canonical JSON records)
//! ├── "shapes":    LoroList<String>
//! ├── "images":    LoroList<String>
//! ├── "texts":     LoroList<String>
//! └── "viewState": LoroMap { "x": f64, "y": f64 }
//! ```
//!
//! Each list entry is one serialized element record. The document never
//! interprets record contents beyond the `id` field, which it reads to
//! re-validate positional indices right before an update's delete+insert
//! pair. List order is render z-order.
//!
//! One `SharedDocument` is constructed per session and handed out as an
//! `Rc` to every component that needs it; there is no global instance.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use loro::{ExportMode, LoroDoc, LoroList, LoroMap, LoroValue, ValueOrContainer, VersionVector};
use thiserror::Error;

use crate::elements::ViewState;

/// Capacity of the strokes collection.
pub const STROKE_CAPACITY: usize = 2000;
/// Capacity of the shapes collection.
pub const SHAPE_CAPACITY: usize = 1000;
/// Capacity of the texts collection.
pub const TEXT_CAPACITY: usize = 1000;

/// Key of the view-state map in the document.
const VIEW_STATE_KEY: &str = "viewState";

/// The four replicated element collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Strokes,
    Shapes,
    Images,
    Texts,
}

impl ElementKind {
    pub const ALL: [ElementKind; 4] = [
        ElementKind::Strokes,
        ElementKind::Shapes,
        ElementKind::Images,
        ElementKind::Texts,
    ];

    /// Container key inside the Loro document.
    pub fn key(self) -> &'static str {
        match self {
            ElementKind::Strokes => "strokes",
            ElementKind::Shapes => "shapes",
            ElementKind::Images => "images",
            ElementKind::Texts => "texts",
        }
    }

    /// Maximum collection size enforced at the insertion boundary.
    /// Images are unbounded.
    pub fn capacity(self) -> Option<usize> {
        match self {
            ElementKind::Strokes => Some(STROKE_CAPACITY),
            ElementKind::Shapes => Some(SHAPE_CAPACITY),
            ElementKind::Texts => Some(TEXT_CAPACITY),
            ElementKind::Images => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Notification channels: one per element collection plus the view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Strokes,
    Shapes,
    Images,
    Texts,
    ViewState,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Strokes,
        Channel::Shapes,
        Channel::Images,
        Channel::Texts,
        Channel::ViewState,
    ];
}

impl From<ElementKind> for Channel {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Strokes => Channel::Strokes,
            ElementKind::Shapes => Channel::Shapes,
            ElementKind::Images => Channel::Images,
            ElementKind::Texts => Channel::Texts,
        }
    }
}

/// Errors surfaced by document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Insertion rejected: the collection is at capacity. The document is
    /// left untouched.
    #[error("{kind} collection is full (capacity {capacity})")]
    CollectionFull { kind: ElementKind, capacity: usize },
    /// Positional update aborted: no record with this id currently exists.
    #[error("no {kind} record with id {id}")]
    NotFound { kind: ElementKind, id: String },
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Crdt(#[from] loro::LoroError),
}

/// Callback invoked synchronously after a committed change to one channel.
pub type ChangeHandler = Rc<dyn Fn(&SharedDocument, Channel)>;

/// Handle returned by [`SharedDocument::subscribe`]; pass it back to
/// [`SharedDocument::unsubscribe`] to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

struct Subscriber {
    token: SubscriptionToken,
    channel: Channel,
    handler: ChangeHandler,
}

/// A replicated whiteboard document.
///
/// Wraps a [`LoroDoc`] holding the four element collections and the shared
/// view state, and layers a small synchronous publish/subscribe registry on
/// top so consumers learn about committed changes without polling.
pub struct SharedDocument {
    doc: LoroDoc,
    subscribers: RefCell<Vec<Subscriber>>,
    next_token: Cell<u64>,
}

impl SharedDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            doc: LoroDoc::new(),
            subscribers: RefCell::new(Vec::new()),
            next_token: Cell::new(0),
        }
    }

    /// Create a document from an exported snapshot.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, DocumentError> {
        let doc = LoroDoc::new();
        doc.import(bytes)?;
        Ok(Self {
            doc,
            subscribers: RefCell::new(Vec::new()),
            next_token: Cell::new(0),
        })
    }

    fn list(&self, kind: ElementKind) -> LoroList {
        self.doc.get_list(kind.key())
    }

    fn view_map(&self) -> LoroMap {
        self.doc.get_map(VIEW_STATE_KEY)
    }

    /// Number of records in a collection.
    pub fn len(&self, kind: ElementKind) -> usize {
        self.list(kind).len()
    }

    pub fn is_empty(&self, kind: ElementKind) -> bool {
        self.len(kind) == 0
    }

    /// Read every record in a collection, in z-order.
    pub fn records(&self, kind: ElementKind) -> Vec<String> {
        let list = self.list(kind);
        let mut records = Vec::with_capacity(list.len());
        for i in 0..list.len() {
            if let Some(ValueOrContainer::Value(LoroValue::String(s))) = list.get(i) {
                records.push(s.to_string());
            }
        }
        records
    }

    fn check_capacity(&self, kind: ElementKind, list: &LoroList) -> Result<(), DocumentError> {
        if let Some(capacity) = kind.capacity() {
            if list.len() >= capacity {
                log::warn!("{kind} collection is full; rejecting insert (capacity {capacity})");
                return Err(DocumentError::CollectionFull { kind, capacity });
            }
        }
        Ok(())
    }

    /// Append a record at the end of a collection (top of the z-order).
    pub fn append(&self, kind: ElementKind, record: &str) -> Result<(), DocumentError> {
        let list = self.list(kind);
        self.check_capacity(kind, &list)?;
        list.push(LoroValue::String(record.to_owned().into()))?;
        self.doc.commit();
        self.notify(kind.into());
        Ok(())
    }

    /// Insert a record at a position. Indices beyond the current length
    /// clamp to an append.
    pub fn insert_at(&self, kind: ElementKind, index: usize, record: &str) -> Result<(), DocumentError> {
        let list = self.list(kind);
        self.check_capacity(kind, &list)?;
        let index = index.min(list.len());
        list.insert(index, LoroValue::String(record.to_owned().into()))?;
        self.doc.commit();
        self.notify(kind.into());
        Ok(())
    }

    /// Delete up to `count` records starting at `start`. Positions that no
    /// longer exist are silently skipped; deleting past the end is a no-op,
    /// never an error.
    pub fn delete_range(&self, kind: ElementKind, start: usize, count: usize) -> Result<(), DocumentError> {
        let list = self.list(kind);
        let len = list.len();
        if start >= len || count == 0 {
            return Ok(());
        }
        list.delete(start, count.min(len - start))?;
        self.doc.commit();
        self.notify(kind.into());
        Ok(())
    }

    /// Current positional index of the record with this id, found by a
    /// linear scan (there is no secondary index).
    pub fn index_of(&self, kind: ElementKind, id: &str) -> Option<usize> {
        self.records(kind)
            .iter()
            .position(|record| record_id(record).as_deref() == Some(id))
    }

    /// Replace the record with this id in place, preserving its z-order
    /// position. The index is re-validated by id immediately before the
    /// delete+insert pair, so a remote delete that shifted positions since
    /// the caller last read cannot make the wrong record move. Both steps
    /// land in a single commit.
    pub fn replace(&self, kind: ElementKind, id: &str, record: &str) -> Result<(), DocumentError> {
        let index = self.index_of(kind, id).ok_or_else(|| DocumentError::NotFound {
            kind,
            id: id.to_owned(),
        })?;
        let list = self.list(kind);
        list.delete(index, 1)?;
        list.insert(index, LoroValue::String(record.to_owned().into()))?;
        self.doc.commit();
        self.notify(kind.into());
        Ok(())
    }

    /// Delete the record with this id. Returns false when no such record
    /// exists (already erased by a peer, for example).
    pub fn remove_by_id(&self, kind: ElementKind, id: &str) -> Result<bool, DocumentError> {
        match self.index_of(kind, id) {
            Some(index) => {
                self.list(kind).delete(index, 1)?;
                self.doc.commit();
                self.notify(kind.into());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Rewrite an entire collection in one commit with one notification.
    /// Used by history restore and bulk edits; capacity is not re-checked
    /// because the records come from a collection that already honored it.
    pub fn replace_all(&self, kind: ElementKind, records: &[String]) -> Result<(), DocumentError> {
        let list = self.list(kind);
        let len = list.len();
        if len > 0 {
            list.delete(0, len)?;
        }
        for record in records {
            list.push(LoroValue::String(record.clone().into()))?;
        }
        self.doc.commit();
        self.notify(kind.into());
        Ok(())
    }

    /// Empty all four element collections. The view state is untouched.
    pub fn clear_elements(&self) -> Result<(), DocumentError> {
        for kind in ElementKind::ALL {
            let list = self.list(kind);
            let len = list.len();
            if len > 0 {
                list.delete(0, len)?;
            }
        }
        self.doc.commit();
        for kind in ElementKind::ALL {
            self.notify(kind.into());
        }
        Ok(())
    }

    /// Publish the shared pan offset.
    pub fn set_view_state(&self, view: ViewState) -> Result<(), DocumentError> {
        let map = self.view_map();
        map.insert("x", view.x)?;
        map.insert("y", view.y)?;
        self.doc.commit();
        self.notify(Channel::ViewState);
        Ok(())
    }

    /// Read the shared pan offset; unset axes default to zero.
    pub fn view_state(&self) -> ViewState {
        let map = self.view_map();
        ViewState {
            x: read_double(&map, "x"),
            y: read_double(&map, "y"),
        }
    }

    // --- Change notification ---

    /// Register a change handler for one channel. Handlers run synchronously
    /// after every committed mutation of that channel, local or imported.
    pub fn subscribe(&self, channel: Channel, handler: ChangeHandler) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            token,
            channel,
            handler,
        });
        token
    }

    /// Cancel a subscription. Teardown is best-effort: an already-removed
    /// token is logged and reported as false, never an error.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.token != token);
        if subscribers.len() == before {
            log::warn!("unsubscribe: {token:?} is not registered (already removed?)");
            false
        } else {
            true
        }
    }

    fn notify(&self, channel: Channel) {
        // Clone the matching handlers out of the registry first so a handler
        // may subscribe, unsubscribe, or mutate the document without holding
        // the registry borrow.
        let handlers: Vec<ChangeHandler> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.channel == channel)
            .map(|s| Rc::clone(&s.handler))
            .collect();
        for handler in handlers {
            handler(self, channel);
        }
    }

    // --- Transport hooks (the relay itself lives outside the core) ---

    /// Export the full document state.
    pub fn export_snapshot(&self) -> Vec<u8> {
        self.doc.export(ExportMode::Snapshot).unwrap_or_default()
    }

    /// Export incremental updates since a version.
    pub fn export_updates(&self, since: &VersionVector) -> Vec<u8> {
        self.doc.export(ExportMode::updates(since)).unwrap_or_default()
    }

    /// Import updates from a remote peer and notify every channel. The
    /// bridge re-reads collections wholesale, so over-notifying is cheap
    /// and avoids diffing the import.
    pub fn import(&self, bytes: &[u8]) -> Result<(), DocumentError> {
        self.doc.import(bytes)?;
        for channel in Channel::ALL {
            self.notify(channel);
        }
        Ok(())
    }

    /// Current version vector.
    pub fn version(&self) -> VersionVector {
        self.doc.oplog_vv()
    }

    /// Loro peer id of this replica.
    pub fn peer_id(&self) -> u64 {
        self.doc.peer_id()
    }
}

impl Default for SharedDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the `id` field from a serialized record without a full typed
/// parse.
fn record_id(record: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(record).ok()?;
    value.get("id")?.as_str().map(str::to_owned)
}

fn read_double(map: &LoroMap, key: &str) -> f64 {
    if let LoroValue::Map(values) = map.get_deep_value() {
        match values.get(key) {
            Some(LoroValue::Double(d)) => return *d,
            Some(LoroValue::I64(i)) => return *i as f64,
            _ => {}
        }
    }
    0.0
}
