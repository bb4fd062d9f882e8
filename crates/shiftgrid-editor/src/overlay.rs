use std::collections::BTreeMap;

use shiftgrid_core::{AssignmentId, CellKey, SlotValue};
use tracing::debug;

use crate::baseline::Baseline;

/// An unsaved override of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalEdit {
    pub assignment_id: AssignmentId,
    pub value: SlotValue,
}

/// Why an edit did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The period is published.
    Locked,
    /// No assignment exists for the cell.
    NoAssignment,
}

/// Result of [`Overlay::apply_edit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Ignored(IgnoreReason),
    /// The cell already shows this value.
    Unchanged,
    /// A pending edit was inserted or overwritten.
    Pending,
    /// The value equals the baseline again; the pending edit was dropped.
    Reverted,
}

impl EditOutcome {
    pub fn changed(self) -> bool {
        matches!(self, EditOutcome::Pending | EditOutcome::Reverted)
    }
}

/// Everything the grid needs to draw one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub assignment_id: AssignmentId,
    pub value: SlotValue,
    /// Baseline manual marker, or any unsaved local change.
    pub manual: bool,
    /// Carries a pending edit (drawn with the "unsaved" ring).
    pub pending: bool,
}

/// Pending edits on top of a [`Baseline`].
///
/// Holds nothing but the diff: the displayed grid is always
/// `baseline + pending`, so it can be re-derived at any point.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    pending: BTreeMap<CellKey, LocalEdit>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Displayed value of a cell, `None` for cells without an assignment.
    pub fn value(&self, baseline: &Baseline, cell: CellKey) -> Option<SlotValue> {
        let base = baseline.value(cell)?;
        Some(self.pending.get(&cell).map_or(base, |e| e.value))
    }

    pub fn view(&self, baseline: &Baseline, cell: CellKey) -> Option<CellView> {
        let a = baseline.get(cell)?;
        let edit = self.pending.get(&cell);
        Some(CellView {
            assignment_id: a.id,
            value: edit.map_or(a.shift_slot_id, |e| e.value),
            manual: a.is_manual_edit || edit.is_some(),
            pending: edit.is_some(),
        })
    }

    pub fn apply_edit(&mut self, baseline: &Baseline, cell: CellKey, value: SlotValue) -> EditOutcome {
        if !baseline.is_editable() {
            return EditOutcome::Ignored(IgnoreReason::Locked);
        }
        let Some(assignment) = baseline.get(cell) else {
            return EditOutcome::Ignored(IgnoreReason::NoAssignment);
        };
        if self.value(baseline, cell) == Some(value) {
            return EditOutcome::Unchanged;
        }

        if assignment.shift_slot_id == value {
            self.pending.remove(&cell);
            debug!(%cell, %value, "edit reverted to baseline");
            EditOutcome::Reverted
        } else {
            self.pending.insert(
                cell,
                LocalEdit {
                    assignment_id: assignment.id,
                    value,
                },
            );
            debug!(%cell, %value, "edit pending");
            EditOutcome::Pending
        }
    }

    /// Drop every pending edit. Returns how many were dropped.
    pub fn discard_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub fn pending(&self) -> &BTreeMap<CellKey, LocalEdit> {
        &self.pending
    }

    pub fn get(&self, cell: CellKey) -> Option<&LocalEdit> {
        self.pending.get(&cell)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Make the cell display `displayed` against the (possibly updated) baseline.
    ///
    /// Used after the baseline absorbed a server acknowledgement: the user keeps
    /// seeing whatever they saw before.
    pub(crate) fn pin(&mut self, baseline: &Baseline, cell: CellKey, displayed: SlotValue) {
        match baseline.get(cell) {
            Some(a) if a.shift_slot_id != displayed => {
                self.pending.insert(
                    cell,
                    LocalEdit {
                        assignment_id: a.id,
                        value: displayed,
                    },
                );
            }
            _ => {
                self.pending.remove(&cell);
            }
        }
    }

    /// Re-apply pending edits onto a freshly fetched baseline.
    ///
    /// Edits whose cell vanished, or which now equal the fresh value, are
    /// dropped. Returns the number of edits dropped.
    pub(crate) fn rebase(&mut self, fresh: &Baseline) -> usize {
        let before = self.pending.len();
        self.pending.retain(|cell, edit| match fresh.get(*cell) {
            Some(a) if a.shift_slot_id != edit.value => {
                edit.assignment_id = a.id;
                true
            }
            _ => false,
        });
        before - self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shiftgrid_core::{
        Assignment, Period, PeriodId, PeriodStatus, ScheduleResponse, ShiftSlotId, StaffId,
    };

    const EARLY: SlotValue = SlotValue::Slot(ShiftSlotId(1));
    const LATE: SlotValue = SlotValue::Slot(ShiftSlotId(2));

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn cell(day: u32) -> CellKey {
        CellKey::new(StaffId(1), d(day))
    }

    fn baseline(status: PeriodStatus) -> Baseline {
        Baseline::new(ScheduleResponse {
            period: Period {
                id: PeriodId(1),
                start_date: d(1),
                end_date: d(2),
                status,
            },
            assignments: vec![
                Assignment {
                    id: AssignmentId(10),
                    period_id: PeriodId(1),
                    staff_id: StaffId(1),
                    date: d(1),
                    shift_slot_id: EARLY,
                    is_manual_edit: false,
                },
                Assignment {
                    id: AssignmentId(11),
                    period_id: PeriodId(1),
                    staff_id: StaffId(1),
                    date: d(2),
                    shift_slot_id: SlotValue::Off,
                    is_manual_edit: false,
                },
            ],
        })
    }

    #[test]
    fn edit_then_revert_cancels_pending() {
        let b = baseline(PeriodStatus::Draft);
        let mut o = Overlay::new();

        assert_eq!(o.apply_edit(&b, cell(1), LATE), EditOutcome::Pending);
        assert_eq!(o.len(), 1);
        assert_eq!(o.apply_edit(&b, cell(1), EARLY), EditOutcome::Reverted);
        assert!(o.is_empty());
    }

    #[test]
    fn repeated_writes_keep_only_last_value() {
        let b = baseline(PeriodStatus::Draft);
        let mut o = Overlay::new();

        o.apply_edit(&b, cell(2), EARLY);
        o.apply_edit(&b, cell(2), LATE);
        assert_eq!(o.len(), 1);
        assert_eq!(o.get(cell(2)).map(|e| e.value), Some(LATE));
        assert_eq!(o.value(&b, cell(2)), Some(LATE));
        assert_eq!(o.get(cell(2)).map(|e| e.assignment_id), Some(AssignmentId(11)));
    }

    #[test]
    fn same_value_is_unchanged() {
        let b = baseline(PeriodStatus::Draft);
        let mut o = Overlay::new();
        assert_eq!(o.apply_edit(&b, cell(1), EARLY), EditOutcome::Unchanged);
        assert!(o.is_empty());
    }

    #[test]
    fn locked_and_missing_cells_are_ignored() {
        let mut o = Overlay::new();
        let locked = baseline(PeriodStatus::Published);
        assert_eq!(
            o.apply_edit(&locked, cell(1), LATE),
            EditOutcome::Ignored(IgnoreReason::Locked)
        );

        let b = baseline(PeriodStatus::Draft);
        assert_eq!(
            o.apply_edit(&b, CellKey::new(StaffId(7), d(1)), LATE),
            EditOutcome::Ignored(IgnoreReason::NoAssignment)
        );
        assert!(o.is_empty());
        assert!(o.view(&b, CellKey::new(StaffId(7), d(1))).is_none());
    }

    #[test]
    fn view_marks_pending_as_manual() {
        let b = baseline(PeriodStatus::Draft);
        let mut o = Overlay::new();
        let before = o.view(&b, cell(1)).unwrap();
        assert!(!before.manual && !before.pending);

        o.apply_edit(&b, cell(1), SlotValue::Off);
        let after = o.view(&b, cell(1)).unwrap();
        assert_eq!(after.value, SlotValue::Off);
        assert!(after.manual && after.pending);
    }

    #[test]
    fn discard_restores_baseline() {
        let b = baseline(PeriodStatus::Draft);
        let mut o = Overlay::new();
        o.apply_edit(&b, cell(1), LATE);
        o.apply_edit(&b, cell(2), EARLY);

        assert_eq!(o.discard_all(), 2);
        assert_eq!(o.value(&b, cell(1)), b.value(cell(1)));
        assert_eq!(o.value(&b, cell(2)), b.value(cell(2)));
    }

    #[test]
    fn rebase_keeps_only_real_differences() {
        let b = baseline(PeriodStatus::Draft);
        let mut o = Overlay::new();
        o.apply_edit(&b, cell(1), LATE);
        o.apply_edit(&b, cell(2), LATE);

        // Fresh fetch: cell 2 already holds LATE on the server.
        let mut fresh = baseline(PeriodStatus::Draft);
        fresh.acknowledge(cell(2), AssignmentId(11), LATE);

        assert_eq!(o.rebase(&fresh), 1);
        assert_eq!(o.len(), 1);
        assert_eq!(o.get(cell(1)).map(|e| e.value), Some(LATE));
    }
}
