use std::sync::Arc;
use std::time::Duration;

use shiftgrid_api::ScheduleApi;
use shiftgrid_core::config::{RefreshPolicy, SyncConfig};
use shiftgrid_core::{OptimizeResponse, Period, PeriodId, ScheduleResponse, ShiftgridConfig};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::editor::GridEditor;
use crate::error::{Result, SyncError};
use crate::input::{HeadlessHost, ListenerHost};
use crate::sync::{BatchOutcome, SaveBatch, SyncReport};

/// Owner of one period grid: the editor plus the collaborator it syncs with.
///
/// Performs the canonical re-fetch after every completed save.
pub struct ScheduleSession {
    api: Arc<dyn ScheduleApi>,
    sync: SyncConfig,
    notify_capacity: usize,
    editor: GridEditor,
}

impl ScheduleSession {
    /// Fetch the period, roster and slot list together and mount an editor.
    pub async fn open(
        api: Arc<dyn ScheduleApi>,
        config: &ShiftgridConfig,
        period_id: PeriodId,
    ) -> Result<Self> {
        Self::open_with_host(api, config, period_id, Arc::new(HeadlessHost::default())).await
    }

    /// Like [`open`](Self::open), mounting the editor against a real listener host.
    #[instrument(skip(api, config, host))]
    pub async fn open_with_host(
        api: Arc<dyn ScheduleApi>,
        config: &ShiftgridConfig,
        period_id: PeriodId,
        host: Arc<dyn ListenerHost>,
    ) -> Result<Self> {
        let (schedule, staff, slots) = tokio::try_join!(
            api.fetch_schedule(period_id),
            api.list_staff(),
            api.list_shift_slots()
        )?;
        Ok(Self::from_editor(
            api,
            config,
            GridEditor::with_host(schedule, staff, slots, host),
        ))
    }

    pub fn from_editor(api: Arc<dyn ScheduleApi>, config: &ShiftgridConfig, editor: GridEditor) -> Self {
        Self {
            api,
            sync: config.sync.clone(),
            notify_capacity: config.editor.notify_capacity.max(1),
            editor,
        }
    }

    pub fn period_id(&self) -> PeriodId {
        self.editor.period_id()
    }

    pub fn editor(&self) -> &GridEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut GridEditor {
        &mut self.editor
    }

    /// Receive one [`SyncReport`] per completed or aborted batch.
    ///
    /// Replaces any earlier subscription.
    pub fn subscribe_reports(&mut self) -> mpsc::Receiver<SyncReport> {
        let (tx, rx) = mpsc::channel(self.notify_capacity);
        self.editor.set_report_sender(tx);
        rx
    }

    /// Flush every pending edit, reconcile, then re-fetch the period.
    ///
    /// Per-cell failures and a batch nobody answered are both reported through
    /// the returned [`SyncReport`], not as errors. A failed re-fetch is logged
    /// and the local state is kept.
    ///
    /// This borrows the session for the whole round trip. To keep editing
    /// while requests are out, use [`start_save`](Self::start_save), run the
    /// returned [`InFlightSave`] and hand its result to
    /// [`complete_save`](Self::complete_save).
    #[instrument(skip(self), fields(period_id = %self.editor.period_id()))]
    pub async fn save_all(&mut self) -> Result<SyncReport> {
        let save = self.start_save()?;
        let done = save.run().await;
        Ok(self.complete_save(done).await)
    }

    /// Snapshot the pending edits. The returned save does not borrow the session.
    pub fn start_save(&self) -> Result<InFlightSave> {
        let batch = self.editor.begin_save()?;
        Ok(InFlightSave {
            batch,
            api: Arc::clone(&self.api),
            deadline: Duration::from_millis(self.sync.batch_timeout_ms),
        })
    }

    /// Reconcile a finished save, then re-fetch unless the batch was empty or
    /// nobody answered.
    #[instrument(skip_all, fields(period_id = %self.editor.period_id(), batch_id = %done.batch.id()))]
    pub async fn complete_save(&mut self, done: CompletedSave) -> SyncReport {
        let report = match done.result {
            Ok(outcome) => self.editor.finish_save(outcome),
            Err(e) => return self.editor.abort_save(&done.batch, &e),
        };

        if !done.batch.is_empty() && report.wants_refresh() {
            if let Err(e) = self.refresh().await {
                warn!(error = %e, "re-fetch after save failed, keeping local state");
            }
        }
        report
    }

    /// Re-fetch the period and load it as the new baseline.
    ///
    /// Returns how many pending edits the refresh dropped.
    #[instrument(skip(self), fields(period_id = %self.editor.period_id()))]
    pub async fn refresh(&mut self) -> Result<usize> {
        let schedule = self.api.fetch_schedule(self.period_id()).await?;
        Ok(self.editor.load_baseline(schedule, self.sync.refresh_policy))
    }

    /// Re-fetch roster and shift slots.
    #[instrument(skip(self))]
    pub async fn reload_reference_data(&mut self) -> Result<()> {
        let (staff, slots) = tokio::try_join!(self.api.list_staff(), self.api.list_shift_slots())?;
        self.editor.set_roster(staff);
        self.editor.set_slots(slots);
        Ok(())
    }

    /// Publish the period. The editor locks and drops its listeners.
    #[instrument(skip(self), fields(period_id = %self.editor.period_id()))]
    pub async fn publish(&mut self) -> Result<Period> {
        let period = self.api.publish(self.period_id()).await?;
        self.editor.set_period_status(period.status);
        if self.editor.has_unsaved_changes() {
            warn!(
                pending = self.editor.pending_edits().len(),
                "period published with unsaved edits"
            );
        }
        Ok(period)
    }

    /// Run the optimizer. An optimal result replaces the baseline and drops
    /// pending edits; any other status leaves the grid untouched and is
    /// returned with its diagnostics.
    #[instrument(skip(self), fields(period_id = %self.editor.period_id()))]
    pub async fn optimize(&mut self) -> Result<OptimizeResponse> {
        if !self.editor.is_editable() {
            return Err(SyncError::Locked {
                period_id: self.period_id(),
            }
            .into());
        }

        let response = self.api.optimize(self.period_id()).await?;
        if response.is_optimal() {
            let schedule = ScheduleResponse {
                period: self.editor.baseline().period().clone(),
                assignments: response.assignments.clone(),
            };
            self.editor.load_baseline(schedule, RefreshPolicy::Discard);
            info!(assignments = response.assignments.len(), "optimized schedule loaded");
        } else {
            warn!(
                status = %response.status,
                diagnostics = response.diagnostics.len(),
                "optimizer returned no schedule"
            );
        }
        Ok(response)
    }
}

/// A save batch detached from its session.
pub struct InFlightSave {
    batch: SaveBatch,
    api: Arc<dyn ScheduleApi>,
    deadline: Duration,
}

impl InFlightSave {
    pub fn batch(&self) -> &SaveBatch {
        &self.batch
    }

    pub async fn run(self) -> CompletedSave {
        let result = self.batch.run(self.api, self.deadline).await;
        CompletedSave {
            batch: self.batch,
            result,
        }
    }
}

/// Result of [`InFlightSave::run`], consumed by [`ScheduleSession::complete_save`].
#[derive(Debug)]
pub struct CompletedSave {
    batch: SaveBatch,
    result: std::result::Result<BatchOutcome, SyncError>,
}
