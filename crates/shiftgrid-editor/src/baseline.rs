use std::collections::HashMap;

use shiftgrid_core::{
    Assignment, AssignmentId, CellKey, Period, PeriodId, PeriodStatus, ScheduleResponse,
    SlotValue,
};
use tracing::warn;

/// Last fetched, authoritative assignment list for one period.
///
/// Indexed by cell once on construction; every lookup during render or drag
/// is a hash probe. A fresh fetch builds a new `Baseline` rather than
/// patching this one.
#[derive(Debug, Clone)]
pub struct Baseline {
    period: Period,
    assignments: Vec<Assignment>,
    index: HashMap<CellKey, usize>,
}

impl Baseline {
    pub fn new(schedule: ScheduleResponse) -> Self {
        let ScheduleResponse {
            period,
            assignments,
        } = schedule;

        if let Err(e) = Period::validate_range(period.start_date, period.end_date) {
            warn!(period_id = %period.id, error = %e, "nothing to render");
        }

        let mut kept = Vec::with_capacity(assignments.len());
        let mut index = HashMap::with_capacity(assignments.len());
        for a in assignments {
            if a.period_id != period.id {
                warn!(period_id = %period.id, assignment_id = %a.id, "assignment from another period dropped");
                continue;
            }
            let cell = a.cell();
            if index.contains_key(&cell) {
                warn!(period_id = %period.id, %cell, "duplicate assignment for cell, keeping the first");
                continue;
            }
            index.insert(cell, kept.len());
            kept.push(a);
        }

        Self {
            period,
            assignments: kept,
            index,
        }
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn period_id(&self) -> PeriodId {
        self.period.id
    }

    /// Draft periods accept edits; published ones are locked.
    pub fn is_editable(&self) -> bool {
        self.period.is_editable()
    }

    pub fn get(&self, cell: CellKey) -> Option<&Assignment> {
        self.index.get(&cell).map(|&i| &self.assignments[i])
    }

    pub fn value(&self, cell: CellKey) -> Option<SlotValue> {
        self.get(cell).map(|a| a.shift_slot_id)
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Record that the server accepted `value` for this assignment.
    ///
    /// Mirrors exactly what the update endpoint does server-side, so the
    /// baseline stays equal to what a re-fetch would return. Returns false when
    /// the cell no longer holds that assignment.
    pub(crate) fn acknowledge(
        &mut self,
        cell: CellKey,
        assignment_id: AssignmentId,
        value: SlotValue,
    ) -> bool {
        let Some(&i) = self.index.get(&cell) else {
            return false;
        };
        let a = &mut self.assignments[i];
        if a.id != assignment_id {
            return false;
        }
        a.shift_slot_id = value;
        a.is_manual_edit = true;
        true
    }

    pub(crate) fn set_status(&mut self, status: PeriodStatus) {
        self.period.status = status;
    }
}
