//! `shiftgrid-core` — identifiers, the schedule wire model, configuration and
//! the top-level error type shared by every shiftgrid crate.

pub mod config;
pub mod error;
pub mod model;
pub mod types;

pub use config::ShiftgridConfig;
pub use error::{Result, ShiftgridError};
pub use model::{
    Assignment, AssignmentUpdate, Diagnostic, DiagnosticSeverity, OptimizeResponse, Period,
    PeriodStatus, ScheduleResponse, ShiftSlot, Staff,
};
pub use types::{AssignmentId, CellKey, PeriodId, ShiftSlotId, SlotValue, StaffId};
