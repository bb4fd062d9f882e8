use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiftgridError};
use crate::types::{AssignmentId, CellKey, PeriodId, ShiftSlotId, SlotValue, StaffId};

/// Draft periods may be edited; published periods are locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    #[default]
    Draft,
    Published,
}

impl PeriodStatus {
    pub fn is_editable(self) -> bool {
        matches!(self, PeriodStatus::Draft)
    }
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodStatus::Draft => write!(f, "draft"),
            PeriodStatus::Published => write!(f, "published"),
        }
    }
}

/// A date range over which one schedule grid exists. Both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PeriodStatus,
}

impl Period {
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    /// Reject inverted ranges before they are sent to the server.
    pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
        if start > end {
            return Err(ShiftgridError::InvalidPeriod(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(())
    }
}

/// Authoritative slot value for one staff member on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub period_id: PeriodId,
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub shift_slot_id: SlotValue,
    /// Set once a human has overridden the optimizer's choice.
    #[serde(default)]
    pub is_manual_edit: bool,
}

impl Assignment {
    pub fn cell(&self) -> CellKey {
        CellKey::new(self.staff_id, self.date)
    }
}

/// `GET /api/schedules/{id}` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub period: Period,
    pub assignments: Vec<Assignment>,
}

/// `PUT /api/schedules/{period}/assignments/{id}` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentUpdate {
    pub shift_slot_id: SlotValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSlot {
    pub id: ShiftSlotId,
    pub name: String,
    /// `HH:MM` or `HH:MM:SS`, as sent by the server.
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub max_days_per_week: u32,
    #[serde(default)]
    pub min_days_per_week: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// One reason the optimizer could not produce a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub constraint: String,
    pub severity: DiagnosticSeverity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// `POST /api/schedules/{id}/optimize` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    /// `"optimal"` on success, anything else (e.g. `"infeasible"`) otherwise.
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl OptimizeResponse {
    pub fn is_optimal(&self) -> bool {
        self.status == "optimal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn inverted_range_is_invalid() {
        assert!(Period::validate_range(d(1), d(1)).is_ok());
        assert!(Period::validate_range(d(1), d(31)).is_ok());
        let err = Period::validate_range(d(2), d(1)).unwrap_err();
        assert_eq!(err.code(), "INVALID_PERIOD");
    }

    #[test]
    fn only_drafts_are_editable() {
        assert!(PeriodStatus::Draft.is_editable());
        assert!(!PeriodStatus::Published.is_editable());
        assert_eq!(PeriodStatus::default(), PeriodStatus::Draft);
    }
}
