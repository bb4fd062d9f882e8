use shiftgrid_api::ApiError;
use shiftgrid_core::PeriodId;
use thiserror::Error;

/// Failure of a whole save batch, before any per-cell outcome is known.
///
/// Per-cell failures are not errors; they are reported in the batch outcome.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No cell answered before the deadline.
    #[error("no save request answered within {ms}ms")]
    Timeout { ms: u64 },

    #[error("period {period_id} is published; edits are locked")]
    Locked { period_id: PeriodId },
}

/// Errors surfaced by [`ScheduleSession`](crate::session::ScheduleSession).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
