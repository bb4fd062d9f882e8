// In-memory schedule server shared by the editor integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use shiftgrid_api::{ApiError, ScheduleApi};
use shiftgrid_core::{
    Assignment, AssignmentId, CellKey, OptimizeResponse, Period, PeriodId, PeriodStatus,
    ScheduleResponse, ShiftSlot, ShiftSlotId, SlotValue, Staff, StaffId,
};
use tokio::sync::watch;

pub const PERIOD: PeriodId = PeriodId(1);
pub const A: StaffId = StaffId(1);
pub const B: StaffId = StaffId(2);
pub const EARLY: SlotValue = SlotValue::Slot(ShiftSlotId(1));
pub const LATE: SlotValue = SlotValue::Slot(ShiftSlotId(2));

pub fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

pub fn cell(staff: StaffId, day: u32) -> CellKey {
    CellKey::new(staff, d(day))
}

pub fn staff(id: StaffId, name: &str) -> Staff {
    Staff {
        id,
        name: name.to_string(),
        role: "nurse".to_string(),
        max_days_per_week: 5,
        min_days_per_week: 0,
    }
}

pub fn slots() -> Vec<ShiftSlot> {
    vec![
        ShiftSlot {
            id: ShiftSlotId(1),
            name: "Early".to_string(),
            start_time: "07:00".to_string(),
            end_time: "15:00".to_string(),
        },
        ShiftSlot {
            id: ShiftSlotId(2),
            name: "Late".to_string(),
            start_time: "15:00".to_string(),
            end_time: "23:00".to_string(),
        },
    ]
}

/// Dense schedule over 2026-03-01..=`last_day`. Assignment ids are
/// `staff * 100 + day`; every cell starts "off" except (A, 03-01) = Early.
pub fn schedule(roster: &[StaffId], last_day: u32, status: PeriodStatus) -> ScheduleResponse {
    let mut assignments = Vec::new();
    for &s in roster {
        for day in 1..=last_day {
            assignments.push(Assignment {
                id: assignment_id(s, day),
                period_id: PERIOD,
                staff_id: s,
                date: d(day),
                shift_slot_id: if s == A && day == 1 { EARLY } else { SlotValue::Off },
                is_manual_edit: false,
            });
        }
    }
    ScheduleResponse {
        period: Period {
            id: PERIOD,
            start_date: d(1),
            end_date: d(last_day),
            status,
        },
        assignments,
    }
}

pub fn assignment_id(staff: StaffId, day: u32) -> AssignmentId {
    AssignmentId(staff.get() * 100 + i64::from(day))
}

/// Two-day grid: 03-01..03-02, staff {A}, A/03-01 = Early, A/03-02 = off.
pub fn small_schedule() -> ScheduleResponse {
    schedule(&[A], 2, PeriodStatus::Draft)
}

pub fn roster(ids: &[StaffId]) -> Vec<Staff> {
    ids.iter()
        .map(|&id| staff(id, if id == A { "A" } else { "B" }))
        .collect()
}

/// Server double: applies updates to its own copy of the schedule, fails
/// the assignment ids it is told to, and holds updates (all of them, or
/// chosen ids) until released.
pub struct FakeServer {
    pub schedule: Mutex<ScheduleResponse>,
    pub roster: Vec<Staff>,
    pub slots: Vec<ShiftSlot>,
    pub failing: Mutex<HashSet<AssignmentId>>,
    pub stall: AtomicBool,
    pub held: Mutex<HashSet<AssignmentId>>,
    pub release: watch::Sender<bool>,
    pub updates: Mutex<Vec<(AssignmentId, SlotValue)>>,
    pub fetches: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub optimize_result: Mutex<Option<OptimizeResponse>>,
}

impl FakeServer {
    pub fn new(schedule: ScheduleResponse, roster: Vec<Staff>) -> Self {
        Self {
            schedule: Mutex::new(schedule),
            roster,
            slots: slots(),
            failing: Mutex::new(HashSet::new()),
            stall: AtomicBool::new(false),
            held: Mutex::new(HashSet::new()),
            release: watch::channel(false).0,
            updates: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            fail_fetch: AtomicBool::new(false),
            optimize_result: Mutex::new(None),
        }
    }

    pub fn fail(&self, id: AssignmentId) {
        self.failing.lock().unwrap().insert(id);
    }

    /// Hold updates to `id` until [`release_held`](Self::release_held).
    pub fn hold(&self, id: AssignmentId) {
        self.held.lock().unwrap().insert(id);
    }

    pub fn release_held(&self) {
        self.release.send_replace(true);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn server_value(&self, cell: CellKey) -> Option<SlotValue> {
        self.schedule
            .lock()
            .unwrap()
            .assignments
            .iter()
            .find(|a| a.cell() == cell)
            .map(|a| a.shift_slot_id)
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl ScheduleApi for FakeServer {
    async fn fetch_schedule(&self, period_id: PeriodId) -> Result<ScheduleResponse, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("connection refused".to_string()));
        }
        let schedule = self.schedule.lock().unwrap().clone();
        if schedule.period.id != period_id {
            return Err(ApiError::Status {
                status: 404,
                message: "Schedule period not found".to_string(),
            });
        }
        Ok(schedule)
    }

    async fn update_assignment(
        &self,
        _period_id: PeriodId,
        assignment_id: AssignmentId,
        value: SlotValue,
    ) -> Result<(), ApiError> {
        let held = self.stall.load(Ordering::SeqCst)
            || self.held.lock().unwrap().contains(&assignment_id);
        if held {
            let mut released = self.release.subscribe();
            let _ = released.wait_for(|r| *r).await;
        }
        self.updates.lock().unwrap().push((assignment_id, value));
        if self.failing.lock().unwrap().contains(&assignment_id) {
            return Err(ApiError::Status {
                status: 500,
                message: "internal error".to_string(),
            });
        }
        let mut schedule = self.schedule.lock().unwrap();
        if let Some(a) = schedule
            .assignments
            .iter_mut()
            .find(|a| a.id == assignment_id)
        {
            a.shift_slot_id = value;
            a.is_manual_edit = true;
        }
        Ok(())
    }

    async fn list_periods(&self) -> Result<Vec<Period>, ApiError> {
        Ok(vec![self.schedule.lock().unwrap().period.clone()])
    }

    async fn publish(&self, _period_id: PeriodId) -> Result<Period, ApiError> {
        let mut schedule = self.schedule.lock().unwrap();
        schedule.period.status = PeriodStatus::Published;
        Ok(schedule.period.clone())
    }

    async fn optimize(&self, _period_id: PeriodId) -> Result<OptimizeResponse, ApiError> {
        self.optimize_result
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::Unavailable("optimizer not configured".to_string()))
    }

    async fn list_staff(&self) -> Result<Vec<Staff>, ApiError> {
        Ok(self.roster.clone())
    }

    async fn list_shift_slots(&self) -> Result<Vec<ShiftSlot>, ApiError> {
        Ok(self.slots.clone())
    }
}
