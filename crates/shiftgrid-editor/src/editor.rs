use std::collections::BTreeMap;
use std::sync::Arc;

use shiftgrid_core::config::RefreshPolicy;
use shiftgrid_core::{
    CellKey, PeriodId, PeriodStatus, ScheduleResponse, ShiftSlot, SlotValue, Staff,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::baseline::Baseline;
use crate::catalog::SlotCatalog;
use crate::error::SyncError;
use crate::geometry::GridLayout;
use crate::input::{
    decode_key, HeadlessHost, InputEvent, InputRouter, KeyCommand, ListenerHost, Picker,
    RouteOutcome,
};
use crate::overlay::{CellView, EditOutcome, LocalEdit, Overlay};
use crate::paint::{PaintController, PaintMode};
use crate::sync::{BatchOutcome, SaveBatch, SyncReport};

/// Edit state of one period grid: baseline, overlay, paint mode and the
/// listeners that feed them.
///
/// Single owner, synchronous. The only async piece, [`SaveBatch::run`], works
/// on a snapshot and never borrows the editor, so edits keep flowing while a
/// save is in flight.
pub struct GridEditor {
    baseline: Baseline,
    roster: Vec<Staff>,
    catalog: SlotCatalog,
    layout: GridLayout,
    overlay: Overlay,
    paint: PaintController,
    router: InputRouter,
    unsaved_tx: watch::Sender<bool>,
    report_tx: Option<mpsc::Sender<SyncReport>>,
}

impl GridEditor {
    pub fn new(schedule: ScheduleResponse, roster: Vec<Staff>, slots: Vec<ShiftSlot>) -> Self {
        Self::with_host(schedule, roster, slots, Arc::new(HeadlessHost::default()))
    }

    /// Mount against `host`; global listeners attach now if the period is a draft.
    pub fn with_host(
        schedule: ScheduleResponse,
        roster: Vec<Staff>,
        slots: Vec<ShiftSlot>,
        host: Arc<dyn ListenerHost>,
    ) -> Self {
        let baseline = Baseline::new(schedule);
        let layout = layout_for(&baseline, &roster);
        let (unsaved_tx, _) = watch::channel(false);
        let mut editor = Self {
            baseline,
            roster,
            catalog: SlotCatalog::new(slots),
            layout,
            overlay: Overlay::new(),
            paint: PaintController::new(),
            router: InputRouter::new(host),
            unsaved_tx,
            report_tx: None,
        };
        editor.apply_lock_state();
        info!(
            period_id = %editor.period_id(),
            assignments = editor.baseline.len(),
            editable = editor.is_editable(),
            "grid editor mounted"
        );
        editor
    }

    // ── read side ───────────────────────────────────────────────────────────

    pub fn period_id(&self) -> PeriodId {
        self.baseline.period_id()
    }

    pub fn is_editable(&self) -> bool {
        self.baseline.is_editable()
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn roster(&self) -> &[Staff] {
        &self.roster
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn paint_mode(&self) -> PaintMode {
        self.paint.mode()
    }

    pub fn is_listening(&self) -> bool {
        self.router.is_listening()
    }

    /// Displayed value, `None` for a non-interactive cell.
    pub fn value(&self, cell: CellKey) -> Option<SlotValue> {
        self.overlay.value(&self.baseline, cell)
    }

    pub fn cell_view(&self, cell: CellKey) -> Option<CellView> {
        self.overlay.view(&self.baseline, cell)
    }

    pub fn pending_edits(&self) -> &BTreeMap<CellKey, LocalEdit> {
        self.overlay.pending()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.overlay.is_empty()
    }

    /// Signal that flips whenever the pending set becomes empty or non-empty.
    pub fn subscribe_unsaved(&self) -> watch::Receiver<bool> {
        self.unsaved_tx.subscribe()
    }

    /// Where completion reports go. Full channels drop the report with a warning.
    pub fn set_report_sender(&mut self, tx: mpsc::Sender<SyncReport>) {
        self.report_tx = Some(tx);
    }

    // ── edits ───────────────────────────────────────────────────────────────

    pub fn apply_edit(&mut self, cell: CellKey, value: SlotValue) -> EditOutcome {
        let outcome = self.overlay.apply_edit(&self.baseline, cell, value);
        if outcome.changed() {
            self.publish_unsaved();
        }
        outcome
    }

    /// Drop every pending edit. Never touches the network or an in-flight batch.
    pub fn discard_all(&mut self) -> usize {
        let n = self.overlay.discard_all();
        if n > 0 {
            info!(period_id = %self.period_id(), discarded = n, "pending edits discarded");
        }
        self.publish_unsaved();
        n
    }

    // ── paint ───────────────────────────────────────────────────────────────

    /// Toolbar selection. Locked periods keep paint inactive.
    pub fn select_stamp(&mut self, value: SlotValue) -> PaintMode {
        if !self.is_editable() {
            return self.paint.deactivate();
        }
        self.paint.select(value)
    }

    /// Digit shortcut; `None` when the digit maps to no configured slot.
    pub fn select_digit(&mut self, digit: u8) -> Option<PaintMode> {
        if !self.is_editable() {
            return None;
        }
        let value = self.catalog.by_digit(digit)?;
        Some(self.paint.select(value))
    }

    pub fn escape(&mut self) -> PaintMode {
        self.paint.deactivate()
    }

    /// Route one raw input event.
    pub fn handle(&mut self, event: InputEvent) -> RouteOutcome {
        match event {
            InputEvent::KeyDown { key, target } => {
                if !self.router.is_listening() {
                    return RouteOutcome::Ignored;
                }
                match decode_key(key, target) {
                    Some(KeyCommand::Escape) => RouteOutcome::Paint(self.escape()),
                    Some(KeyCommand::Digit(d)) => self
                        .select_digit(d)
                        .map_or(RouteOutcome::Ignored, RouteOutcome::Paint),
                    None => RouteOutcome::Ignored,
                }
            }
            InputEvent::PointerDown { cell } => {
                let Some(current) = self.value(cell).filter(|_| self.is_editable()) else {
                    return RouteOutcome::Ignored;
                };
                match self.paint.begin_drag(cell.staff_id) {
                    Some(stamp) => RouteOutcome::Edit {
                        cell,
                        outcome: self.apply_edit(cell, stamp),
                    },
                    None => RouteOutcome::OpenPicker(Picker {
                        cell,
                        current,
                        options: self.catalog.picker_options(),
                    }),
                }
            }
            InputEvent::PointerEnter { cell } => match self.paint.stamp_for(cell.staff_id) {
                Some(stamp) => RouteOutcome::Edit {
                    cell,
                    outcome: self.apply_edit(cell, stamp),
                },
                None => RouteOutcome::Ignored,
            },
            InputEvent::PointerUp => {
                if self.paint.end_drag() {
                    RouteOutcome::DragEnded
                } else {
                    RouteOutcome::Ignored
                }
            }
            InputEvent::PickerSelect { cell, value } => RouteOutcome::Edit {
                cell,
                outcome: self.apply_edit(cell, value),
            },
        }
    }

    // ── baseline lifecycle ──────────────────────────────────────────────────

    /// Replace the baseline with a fresh fetch.
    ///
    /// A different period always clears pending edits and paint. For the same
    /// period, `policy` decides whether pending edits are discarded or
    /// re-applied on top. Returns the number of pending edits dropped.
    pub fn load_baseline(&mut self, schedule: ScheduleResponse, policy: RefreshPolicy) -> usize {
        let fresh = Baseline::new(schedule);
        let same_period = fresh.period_id() == self.period_id();

        let dropped = if same_period && fresh.is_editable() && policy == RefreshPolicy::Rebase {
            self.overlay.rebase(&fresh)
        } else {
            self.overlay.discard_all()
        };
        if !same_period {
            self.paint.deactivate();
        }

        self.baseline = fresh;
        self.layout = layout_for(&self.baseline, &self.roster);
        self.apply_lock_state();
        self.publish_unsaved();

        info!(
            period_id = %self.period_id(),
            assignments = self.baseline.len(),
            kept = self.overlay.len(),
            dropped,
            ?policy,
            "baseline loaded"
        );
        dropped
    }

    /// Record a status change made elsewhere (e.g. after publish).
    pub fn set_period_status(&mut self, status: PeriodStatus) {
        self.baseline.set_status(status);
        self.apply_lock_state();
        info!(period_id = %self.period_id(), ?status, "period status changed");
    }

    pub fn set_roster(&mut self, roster: Vec<Staff>) {
        self.roster = roster;
        self.layout = layout_for(&self.baseline, &self.roster);
    }

    /// Swap the slot list. A stamp that no longer exists turns paint off.
    pub fn set_slots(&mut self, slots: Vec<ShiftSlot>) {
        self.catalog = SlotCatalog::new(slots);
        if let Some(stamp) = self.paint.stamp() {
            if !self.catalog.contains(stamp) {
                self.paint.deactivate();
            }
        }
    }

    /// Release global listeners. The editor stays readable.
    pub fn unmount(&mut self) {
        self.paint.deactivate();
        self.router.unmount();
    }

    // ── sync ────────────────────────────────────────────────────────────────

    /// Snapshot the pending edits for dispatch. The overlay is not touched.
    pub fn begin_save(&self) -> Result<SaveBatch, SyncError> {
        if !self.is_editable() {
            return Err(SyncError::Locked {
                period_id: self.period_id(),
            });
        }
        let edits = self
            .overlay
            .pending()
            .iter()
            .map(|(cell, edit)| (*cell, *edit))
            .collect();
        Ok(SaveBatch::new(self.period_id(), edits))
    }

    /// Reconcile a completed batch.
    ///
    /// Each success is folded into the baseline and the cell keeps displaying
    /// what it displayed before, so an edit made during the flight stays
    /// pending. Failures stay pending untouched.
    pub fn finish_save(&mut self, outcome: BatchOutcome) -> SyncReport {
        let same_period = outcome.period_id == self.period_id();
        if !same_period {
            warn!(
                batch_id = %outcome.batch_id,
                batch_period = %outcome.period_id,
                period_id = %self.period_id(),
                "batch finished after the period changed; acknowledgements skipped"
            );
        }

        for c in &outcome.cells {
            match &c.result {
                Ok(()) if same_period => {
                    let displayed = self.value(c.cell);
                    if self
                        .baseline
                        .acknowledge(c.cell, c.edit.assignment_id, c.edit.value)
                    {
                        if let Some(v) = displayed {
                            self.overlay.pin(&self.baseline, c.cell, v);
                        }
                    }
                }
                Ok(()) => {}
                Err(e) => debug!(cell = %c.cell, error = %e, "edit kept pending"),
            }
        }

        let report = SyncReport::completed(&outcome);
        self.publish_unsaved();
        self.notify(report.clone());
        report
    }

    /// Whole-batch failure: nothing is reconciled, every edit stays pending.
    pub fn abort_save(&mut self, batch: &SaveBatch, err: &SyncError) -> SyncReport {
        warn!(batch_id = %batch.id(), error = %err, pending = self.overlay.len(), "save batch aborted");
        let report = SyncReport::aborted(batch, err);
        self.notify(report.clone());
        report
    }

    // ── internals ───────────────────────────────────────────────────────────

    fn apply_lock_state(&mut self) {
        let editable = self.is_editable();
        if !editable {
            self.paint.deactivate();
        }
        self.router.sync(editable);
    }

    fn publish_unsaved(&self) {
        let dirty = !self.overlay.is_empty();
        self.unsaved_tx.send_if_modified(|v| {
            if *v == dirty {
                false
            } else {
                *v = dirty;
                true
            }
        });
    }

    fn notify(&self, report: SyncReport) {
        let Some(tx) = &self.report_tx else {
            return;
        };
        let batch_id: Uuid = report.batch_id;
        if let Err(e) = tx.try_send(report) {
            warn!(%batch_id, error = %e, "sync report dropped");
        }
    }
}

fn layout_for(baseline: &Baseline, roster: &[Staff]) -> GridLayout {
    let period = baseline.period();
    GridLayout::new(period.start_date, period.end_date, roster)
}
