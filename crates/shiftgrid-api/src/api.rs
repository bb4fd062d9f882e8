use async_trait::async_trait;
use shiftgrid_core::{
    AssignmentId, OptimizeResponse, Period, PeriodId, ScheduleResponse, ShiftSlot, SlotValue,
    Staff,
};

use crate::error::ApiError;

/// Typed request/response contract of the schedule server.
///
/// Only `fetch_schedule` and `update_assignment` are needed by the grid
/// editor itself; the rest back the surrounding session and console.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    /// Period metadata plus the full, dense assignment list.
    async fn fetch_schedule(&self, period_id: PeriodId) -> Result<ScheduleResponse, ApiError>;

    /// Overwrite one assignment's slot. The server marks it manually edited.
    async fn update_assignment(
        &self,
        period_id: PeriodId,
        assignment_id: AssignmentId,
        value: SlotValue,
    ) -> Result<(), ApiError>;

    async fn list_periods(&self) -> Result<Vec<Period>, ApiError>;

    async fn publish(&self, period_id: PeriodId) -> Result<Period, ApiError>;

    async fn optimize(&self, period_id: PeriodId) -> Result<OptimizeResponse, ApiError>;

    async fn list_staff(&self) -> Result<Vec<Staff>, ApiError>;

    async fn list_shift_slots(&self) -> Result<Vec<ShiftSlot>, ApiError>;
}
