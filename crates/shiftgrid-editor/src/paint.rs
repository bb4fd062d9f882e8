use shiftgrid_core::{SlotValue, StaffId};
use tracing::debug;

/// Whether a pointer drag is currently stamping, and on which staff row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { row: StaffId },
}

/// Paint mode. A drag only exists inside `Active`, so "dragging while
/// inactive" cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintMode {
    #[default]
    Inactive,
    Active { stamp: SlotValue, drag: DragState },
}

/// Selects what value to stamp and tracks the open drag session.
#[derive(Debug, Clone, Default)]
pub struct PaintController {
    mode: PaintMode,
}

impl PaintController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PaintMode {
        self.mode
    }

    pub fn stamp(&self) -> Option<SlotValue> {
        match self.mode {
            PaintMode::Active { stamp, .. } => Some(stamp),
            PaintMode::Inactive => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.mode, PaintMode::Active { .. })
    }

    pub fn drag_row(&self) -> Option<StaffId> {
        match self.mode {
            PaintMode::Active {
                drag: DragState::Dragging { row },
                ..
            } => Some(row),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_row().is_some()
    }

    /// Toolbar or shortcut selection of `value`.
    ///
    /// Selecting the active stamp again switches paint off; selecting another
    /// value switches straight to it. An open drag survives a stamp switch.
    pub fn select(&mut self, value: SlotValue) -> PaintMode {
        self.mode = match self.mode {
            PaintMode::Active { stamp, .. } if stamp == value => PaintMode::Inactive,
            PaintMode::Active { drag, .. } => PaintMode::Active { stamp: value, drag },
            PaintMode::Inactive => PaintMode::Active {
                stamp: value,
                drag: DragState::Idle,
            },
        };
        debug!(mode = ?self.mode, "paint selection");
        self.mode
    }

    /// Escape, or the period becoming locked. Ends any drag.
    pub fn deactivate(&mut self) -> PaintMode {
        if self.is_active() {
            debug!("paint deactivated");
        }
        self.mode = PaintMode::Inactive;
        self.mode
    }

    /// Pointer-down on a cell of `row`. Returns the stamp to apply, or `None`
    /// when paint is off (the caller opens the picker instead).
    pub fn begin_drag(&mut self, row: StaffId) -> Option<SlotValue> {
        match self.mode {
            PaintMode::Active { stamp, .. } => {
                self.mode = PaintMode::Active {
                    stamp,
                    drag: DragState::Dragging { row },
                };
                Some(stamp)
            }
            PaintMode::Inactive => None,
        }
    }

    /// Stamp for a pointer-enter on `row`; `None` outside a drag or on another row.
    pub fn stamp_for(&self, row: StaffId) -> Option<SlotValue> {
        match self.mode {
            PaintMode::Active {
                stamp,
                drag: DragState::Dragging { row: pinned },
            } if pinned == row => Some(stamp),
            _ => None,
        }
    }

    /// Global pointer-up. Returns true when a drag was open.
    pub fn end_drag(&mut self) -> bool {
        match self.mode {
            PaintMode::Active {
                stamp,
                drag: DragState::Dragging { .. },
            } => {
                self.mode = PaintMode::Active {
                    stamp,
                    drag: DragState::Idle,
                };
                true
            }
            _ => false,
        }
    }
}
