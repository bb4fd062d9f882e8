// Verify the JSON shapes the schedule server sends and expects.

use chrono::NaiveDate;
use shiftgrid_core::{
    AssignmentUpdate, DiagnosticSeverity, OptimizeResponse, PeriodStatus, ScheduleResponse,
    ShiftSlotId, SlotValue, Staff, StaffId,
};

#[test]
fn schedule_response_parses() {
    let json = r#"{
        "period": {"id": 3, "start_date": "2026-03-01", "end_date": "2026-03-31", "status": "draft"},
        "assignments": [
            {"id": 10, "period_id": 3, "staff_id": 1, "date": "2026-03-01", "shift_slot_id": 2, "is_manual_edit": false},
            {"id": 11, "period_id": 3, "staff_id": 1, "date": "2026-03-02", "shift_slot_id": null, "is_manual_edit": true}
        ]
    }"#;
    let resp: ScheduleResponse = serde_json::from_str(json).unwrap();

    assert_eq!(resp.period.status, PeriodStatus::Draft);
    assert!(resp.period.is_editable());
    assert_eq!(resp.assignments.len(), 2);
    assert_eq!(resp.assignments[0].shift_slot_id, SlotValue::Slot(ShiftSlotId(2)));
    assert_eq!(resp.assignments[1].shift_slot_id, SlotValue::Off);
    assert!(resp.assignments[1].is_manual_edit);
    assert_eq!(
        resp.assignments[1].cell().date,
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    );
}

#[test]
fn published_period_is_not_editable() {
    let json = r#"{"period": {"id": 1, "start_date": "2026-01-01", "end_date": "2026-01-02", "status": "published"}, "assignments": []}"#;
    let resp: ScheduleResponse = serde_json::from_str(json).unwrap();
    assert!(!resp.period.is_editable());
}

#[test]
fn assignment_update_keeps_null_field() {
    let off = AssignmentUpdate {
        shift_slot_id: SlotValue::Off,
    };
    assert_eq!(serde_json::to_string(&off).unwrap(), r#"{"shift_slot_id":null}"#);

    let slot = AssignmentUpdate {
        shift_slot_id: SlotValue::Slot(ShiftSlotId(5)),
    };
    assert_eq!(serde_json::to_string(&slot).unwrap(), r#"{"shift_slot_id":5}"#);
}

#[test]
fn staff_tolerates_missing_optional_columns() {
    let json = r#"{"id": 4, "name": "Aoi", "role": "nurse", "max_days_per_week": 5}"#;
    let staff: Staff = serde_json::from_str(json).unwrap();
    assert_eq!(staff.id, StaffId(4));
    assert_eq!(staff.min_days_per_week, 0);
}

#[test]
fn infeasible_optimize_response_carries_diagnostics() {
    let json = r#"{
        "status": "infeasible",
        "message": "no solution",
        "assignments": [],
        "diagnostics": [{"constraint": "staffing", "severity": "error", "message": "short on 03-01"}]
    }"#;
    let resp: OptimizeResponse = serde_json::from_str(json).unwrap();
    assert!(!resp.is_optimal());
    assert_eq!(resp.diagnostics[0].severity, DiagnosticSeverity::Error);
    assert!(resp.diagnostics[0].details.is_none());
}

#[test]
fn optimize_response_without_diagnostics_field() {
    let json = r#"{"status": "optimal", "message": "ok", "assignments": []}"#;
    let resp: OptimizeResponse = serde_json::from_str(json).unwrap();
    assert!(resp.is_optimal());
    assert!(resp.diagnostics.is_empty());
}
