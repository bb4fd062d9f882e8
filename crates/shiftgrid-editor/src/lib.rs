//! `shiftgrid-editor` — edit state for one period's staff-by-date shift grid.
//!
//! # Overview
//!
//! The displayed grid is always `baseline + pending edits`. Users change cells
//! through a per-cell picker or by painting a stamp across a staff row; the
//! sync engine flushes pending edits as independent per-cell updates and keeps
//! the failed ones pending for retry.
//!
//! | Module       | Responsibility                                               |
//! |--------------|--------------------------------------------------------------|
//! | `geometry`   | Date range, Sunday-first week rows, labels, render state     |
//! | `catalog`    | Slot names, palette index, digit shortcuts, picker options   |
//! | `baseline`   | Last fetched assignments, indexed by cell                    |
//! | `overlay`    | Pending edits and the per-cell view                          |
//! | `paint`      | Stamp selection and the row-pinned drag session              |
//! | `input`      | Raw events, focus filtering, global listener lifetime        |
//! | `sync`       | Save batches, per-cell outcomes, completion reports          |
//! | `editor`     | [`GridEditor`], the synchronous facade over all of the above |
//! | `session`    | [`ScheduleSession`], owner that fetches, saves and refreshes |

pub mod baseline;
pub mod catalog;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod input;
pub mod overlay;
pub mod paint;
pub mod session;
pub mod sync;

pub use baseline::Baseline;
pub use catalog::{PickerOption, SlotCatalog};
pub use editor::GridEditor;
pub use error::{Result, SessionError, SyncError};
pub use geometry::{GridLayout, RenderState};
pub use input::{
    FocusTarget, HeadlessHost, InputEvent, Key, ListenerHost, Picker, RouteOutcome,
};
pub use overlay::{CellView, EditOutcome, IgnoreReason, LocalEdit};
pub use paint::{DragState, PaintMode};
pub use session::{CompletedSave, InFlightSave, ScheduleSession};
pub use sync::{BatchOutcome, SaveBatch, SyncReport};
