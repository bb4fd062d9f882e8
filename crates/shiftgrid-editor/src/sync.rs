//! Commit pending edits to the server as independent per-cell updates.
//!
//! A save is three steps so the grid stays editable while requests are in
//! flight:
//!
//! 1. [`GridEditor::begin_save`](crate::editor::GridEditor::begin_save)
//!    snapshots the pending edits into a [`SaveBatch`].
//! 2. [`SaveBatch::run`] issues every update concurrently and waits for all of
//!    them. It does not borrow the editor.
//! 3. [`GridEditor::finish_save`](crate::editor::GridEditor::finish_save)
//!    reconciles each cell's outcome.
//!
//! One failed or slow cell never aborts its siblings, and an issued request is
//! never cancelled. Only a batch in which no cell answered before the deadline
//! is an error, and it leaves every edit pending.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use shiftgrid_api::{ApiError, ScheduleApi};
use shiftgrid_core::{CellKey, PeriodId};
use tokio::time::{timeout_at, Instant};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::SyncError;
use crate::overlay::LocalEdit;

/// Value snapshot of the pending edits at dispatch time.
#[derive(Debug, Clone)]
pub struct SaveBatch {
    id: Uuid,
    period_id: PeriodId,
    edits: Vec<(CellKey, LocalEdit)>,
}

impl SaveBatch {
    pub(crate) fn new(period_id: PeriodId, edits: Vec<(CellKey, LocalEdit)>) -> Self {
        Self {
            // UUIDv7 so batches sort by dispatch time in logs
            id: Uuid::now_v7(),
            period_id,
            edits,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn period_id(&self) -> PeriodId {
        self.period_id
    }

    pub fn edits(&self) -> &[(CellKey, LocalEdit)] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Issue one update per edit and await all of them.
    ///
    /// No ordering between cells is assumed. Each request runs as its own
    /// task, so a cell that misses `deadline` is reported as failed while its
    /// request keeps going; siblings that answered keep their outcomes.
    /// Returns `Err` only when no cell answered at all.
    #[instrument(skip_all, fields(batch_id = %self.id, period_id = %self.period_id, cells = self.edits.len()))]
    pub async fn run(
        &self,
        api: Arc<dyn ScheduleApi>,
        deadline: Duration,
    ) -> Result<BatchOutcome, SyncError> {
        info!("dispatching save batch");
        let period_id = self.period_id;
        let ms = deadline.as_millis() as u64;
        let expires = Instant::now() + deadline;

        let requests = self.edits.iter().map(|&(cell, edit)| {
            let api = Arc::clone(&api);
            let handle = tokio::spawn(async move {
                api.update_assignment(period_id, edit.assignment_id, edit.value)
                    .await
            });
            async move {
                // Dropping the handle on expiry detaches the task; the request is not cancelled.
                let (result, answered) = match timeout_at(expires, handle).await {
                    Ok(Ok(result)) => (result, true),
                    Ok(Err(e)) => (Err(ApiError::Unavailable(format!("save task failed: {e}"))), true),
                    Err(_) => (
                        Err(ApiError::Unavailable(format!("no answer within {ms}ms"))),
                        false,
                    ),
                };
                if let Err(ref e) = result {
                    warn!(%cell, assignment_id = %edit.assignment_id, error = %e, "cell save failed");
                }
                (CellOutcome { cell, edit, result }, answered)
            }
        });
        let results = join_all(requests).await;

        if !results.is_empty() && results.iter().all(|(_, answered)| !answered) {
            warn!(ms, "no cell answered before the deadline");
            return Err(SyncError::Timeout { ms });
        }

        let outcome = BatchOutcome {
            batch_id: self.id,
            period_id,
            cells: results.into_iter().map(|(cell, _)| cell).collect(),
        };
        info!(
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            "save batch complete"
        );
        Ok(outcome)
    }
}

/// Server verdict for one dispatched edit.
#[derive(Debug)]
pub struct CellOutcome {
    pub cell: CellKey,
    /// The value that was sent, not whatever the cell holds now.
    pub edit: LocalEdit,
    pub result: Result<(), ApiError>,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub batch_id: Uuid,
    pub period_id: PeriodId,
    pub cells: Vec<CellOutcome>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.cells.iter().filter(|c| c.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.cells.len() - self.succeeded()
    }
}

/// Aggregate result handed to the owner once per batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub batch_id: Uuid,
    pub succeeded: usize,
    pub failed: usize,
    /// Set when the batch as a whole failed; nothing was reconciled.
    pub aborted: Option<String>,
}

impl SyncReport {
    pub(crate) fn completed(outcome: &BatchOutcome) -> Self {
        Self {
            batch_id: outcome.batch_id,
            succeeded: outcome.succeeded(),
            failed: outcome.failed(),
            aborted: None,
        }
    }

    pub(crate) fn aborted(batch: &SaveBatch, err: &SyncError) -> Self {
        Self {
            batch_id: batch.id(),
            succeeded: 0,
            failed: batch.len(),
            aborted: Some(err.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.aborted.is_none()
    }

    /// The owner should re-fetch the period. False after an aborted batch.
    pub fn wants_refresh(&self) -> bool {
        self.aborted.is_none()
    }

    /// One status line for the whole batch.
    pub fn status_message(&self) -> String {
        match (&self.aborted, self.failed) {
            (Some(reason), _) => format!("Save failed: {reason}"),
            (None, 0) => format!("Saved {} change(s)", self.succeeded),
            (None, failed) => format!(
                "{failed} of {} change(s) failed to save; they are still pending",
                failed + self.succeeded
            ),
        }
    }
}
