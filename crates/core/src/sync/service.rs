//! Reconciliation service
//!
//! A single sequential pass per invocation: resolve the watermark, fetch the
//! changed time entries, reconcile each against the calendar via the mapping
//! store, then commit a new watermark. No pagination, no retry, no
//! concurrency.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use timebridge_domain::{Result, TimeEntry};
use tracing::{debug, info, warn};

use super::ports::{CalendarPort, MappingStore, TimeEntrySource};

/// What the reconciler decided for a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// New event inserted and mapping stored
    Created,
    /// Existing event updated in place, mapping kept
    Updated,
    /// Event and mapping removed
    Deleted,
    /// Nothing to do (never-synced deleted entry, or still running)
    Skipped,
}

/// Counters for one completed pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub skipped: usize,
}

impl SyncReport {
    fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Deleted => self.deleted += 1,
            SyncOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// One-way Toggl -> Calendar reconciliation service.
///
/// All collaborators are injected so tests can substitute fakes.
pub struct SyncService {
    entries: Arc<dyn TimeEntrySource>,
    calendar: Arc<dyn CalendarPort>,
    mappings: Arc<dyn MappingStore>,
    time_zone: String,
    lookback: Duration,
}

impl SyncService {
    pub fn new(
        entries: Arc<dyn TimeEntrySource>,
        calendar: Arc<dyn CalendarPort>,
        mappings: Arc<dyn MappingStore>,
        time_zone: impl Into<String>,
        lookback_days: i64,
    ) -> Self {
        Self {
            entries,
            calendar,
            mappings,
            time_zone: time_zone.into(),
            lookback: Duration::days(lookback_days),
        }
    }

    /// Lower bound for the next fetch: the stored watermark when present,
    /// otherwise now minus the bootstrap lookback. A missing watermark is a
    /// normal first-run state.
    pub async fn resolve_watermark(&self) -> Result<DateTime<Utc>> {
        match self.mappings.last_sync_time().await? {
            Some(at) => Ok(at),
            None => {
                debug!(lookback_days = self.lookback.num_days(), "no stored watermark, bootstrapping");
                Ok(Utc::now() - self.lookback)
            }
        }
    }

    /// Run the full pass.
    ///
    /// The watermark is committed only after the loop completes; a failure
    /// mid-batch aborts without advancing it, so the next run re-fetches the
    /// same window. Reconciliation is idempotent under re-processing.
    pub async fn run(&self) -> Result<SyncReport> {
        let since = self.resolve_watermark().await?;
        info!(%since, "starting sync pass");

        let entries = self.entries.entries_since(since).await?;
        let mut report = SyncReport { fetched: entries.len(), ..SyncReport::default() };

        for entry in &entries {
            let outcome = self.reconcile(entry).await?;
            report.record(outcome);
        }

        self.mappings.set_last_sync_time(Utc::now()).await?;

        info!(
            fetched = report.fetched,
            created = report.created,
            updated = report.updated,
            deleted = report.deleted,
            skipped = report.skipped,
            "sync pass completed"
        );

        Ok(report)
    }

    /// Reconcile a single time entry against the calendar.
    ///
    /// Entries still running (`stop` unset, not deleted) are skipped before
    /// any branch runs; a mapped entry that has been restarted keeps its
    /// stale event until it stops again.
    ///
    /// Branch order is the contract:
    /// 1. mapped + deleted upstream -> delete event (errors logged, not
    ///    propagated), then delete the mapping keyed by the time-entry id
    /// 2. mapped -> full-record update, mapping kept
    /// 3. unmapped + not deleted -> insert event, store mapping
    /// 4. unmapped + deleted -> no-op
    pub async fn reconcile(&self, entry: &TimeEntry) -> Result<SyncOutcome> {
        if entry.stop.is_none() && !entry.is_deleted() {
            debug!(entry_id = entry.id, "entry still running, skipping");
            return Ok(SyncOutcome::Skipped);
        }

        let draft = entry.event_draft(&self.time_zone);
        let mapped = self.mappings.event_id_for(entry.id).await?;

        match (mapped, entry.is_deleted()) {
            (Some(event_id), true) => {
                info!(entry_id = entry.id, %event_id, "deleting calendar event");
                if let Err(err) = self.calendar.delete_event(&event_id).await {
                    warn!(entry_id = entry.id, %event_id, error = %err, "failed to delete calendar event");
                }
                self.mappings.delete_mapping(entry.id).await?;
                Ok(SyncOutcome::Deleted)
            }
            (Some(event_id), false) => {
                info!(entry_id = entry.id, %event_id, summary = %draft.summary, "updating calendar event");
                self.calendar.update_event(&event_id, &draft).await?;
                Ok(SyncOutcome::Updated)
            }
            (None, false) => {
                let event_id = self.calendar.insert_event(&draft).await?;
                info!(entry_id = entry.id, %event_id, summary = %draft.summary, "inserted calendar event");
                self.mappings.insert_mapping(entry.id, &event_id).await?;
                Ok(SyncOutcome::Created)
            }
            (None, true) => {
                debug!(entry_id = entry.id, "deleted entry was never synced, nothing to do");
                Ok(SyncOutcome::Skipped)
            }
        }
    }
}
