//! Raw input events and the lifetime of the process-wide listeners.
//!
//! The editor decides what an event *means* (see
//! [`GridEditor::handle`](crate::editor::GridEditor::handle)); this module
//! describes events, decodes keys, and owns the listener registrations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use shiftgrid_core::{CellKey, SlotValue};
use tracing::debug;

use crate::catalog::PickerOption;
use crate::overlay::EditOutcome;
use crate::paint::PaintMode;

/// A key as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Other,
}

/// Element that had focus when a key went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Document,
    Grid,
    TextInput,
    TextArea,
    Select,
    ContentEditable,
}

impl FocusTarget {
    /// Typing into these must never toggle paint mode.
    pub fn is_text_entry(self) -> bool {
        matches!(
            self,
            FocusTarget::TextInput
                | FocusTarget::TextArea
                | FocusTarget::Select
                | FocusTarget::ContentEditable
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown { key: Key, target: FocusTarget },
    PointerDown { cell: CellKey },
    PointerEnter { cell: CellKey },
    /// Anywhere in the document, not only over the grid.
    PointerUp,
    /// A choice made in the per-cell picker.
    PickerSelect { cell: CellKey, value: SlotValue },
}

/// Key meaning after focus filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Escape,
    Digit(u8),
}

pub fn decode_key(key: Key, target: FocusTarget) -> Option<KeyCommand> {
    if target.is_text_entry() {
        return None;
    }
    match key {
        Key::Escape => Some(KeyCommand::Escape),
        Key::Char(c) => c.to_digit(10).map(|d| KeyCommand::Digit(d as u8)),
        Key::Other => None,
    }
}

/// Per-cell picker the host should open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub cell: CellKey,
    pub current: SlotValue,
    pub options: Vec<PickerOption>,
}

/// What handling one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Ignored,
    Paint(PaintMode),
    Edit { cell: CellKey, outcome: EditOutcome },
    OpenPicker(Picker),
    DragEnded,
}

/// Process-wide listeners the editor needs while the period is editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalListener {
    KeyDown,
    PointerUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The document/window the listeners are attached to.
pub trait ListenerHost: Send + Sync {
    fn attach(&self, listener: GlobalListener) -> ListenerId;
    fn detach(&self, id: ListenerId);
}

/// Host for headless use: hands out ids, delivers nothing by itself.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    next: AtomicU64,
}

impl ListenerHost for HeadlessHost {
    fn attach(&self, _listener: GlobalListener) -> ListenerId {
        ListenerId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    fn detach(&self, _id: ListenerId) {}
}

/// Registrations held while mounted; dropping it detaches them.
pub struct ListenerGuard {
    host: Arc<dyn ListenerHost>,
    ids: Vec<ListenerId>,
}

impl ListenerGuard {
    fn acquire(host: Arc<dyn ListenerHost>) -> Self {
        let ids = [GlobalListener::KeyDown, GlobalListener::PointerUp]
            .into_iter()
            .map(|l| host.attach(l))
            .collect();
        debug!("global listeners attached");
        Self { host, ids }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            self.host.detach(id);
        }
        debug!("global listeners detached");
    }
}

/// Keeps global listeners attached exactly while the grid is mounted and editable.
pub struct InputRouter {
    host: Arc<dyn ListenerHost>,
    guard: Option<ListenerGuard>,
}

impl InputRouter {
    pub fn new(host: Arc<dyn ListenerHost>) -> Self {
        Self { host, guard: None }
    }

    pub fn is_listening(&self) -> bool {
        self.guard.is_some()
    }

    /// Attach when `editable`, detach otherwise. Idempotent.
    pub fn sync(&mut self, editable: bool) {
        match (editable, self.guard.is_some()) {
            (true, false) => self.guard = Some(ListenerGuard::acquire(Arc::clone(&self.host))),
            (false, true) => self.guard = None,
            _ => {}
        }
    }

    /// Unmount: release the listeners regardless of editability.
    pub fn unmount(&mut self) {
        self.guard = None;
    }
}
