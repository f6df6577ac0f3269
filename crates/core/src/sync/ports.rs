//! Port interfaces for sync operations
//!
//! These traits define the boundaries between the reconciliation logic and
//! the infrastructure adapters (Toggl HTTP client, Google Calendar client,
//! SQLite mapping store).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use timebridge_domain::{EventDraft, NewTimeEntry, Result, TimeEntry};

/// Trait for reading and writing time-tracking records
#[async_trait]
pub trait TimeEntrySource: Send + Sync {
    /// Fetch all entries changed since the given watermark (single page,
    /// no pagination).
    async fn entries_since(&self, since: DateTime<Utc>) -> Result<Vec<TimeEntry>>;

    /// Fetch all entries within a date range (used by the seed command).
    async fn entries_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeEntry>>;

    /// Create a new time entry
    async fn create_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry>;

    /// Delete a time entry by id
    async fn delete_entry(&self, id: i64) -> Result<()>;
}

/// Trait for calendar event CRUD scoped to one calendar
#[async_trait]
pub trait CalendarPort: Send + Sync {
    /// Insert a new event, returning the id assigned by the calendar service
    async fn insert_event(&self, draft: &EventDraft) -> Result<String>;

    /// Full-record update of an existing event
    async fn update_event(&self, event_id: &str, draft: &EventDraft) -> Result<()>;

    /// Delete an event by id
    async fn delete_event(&self, event_id: &str) -> Result<()>;
}

/// Trait for the durable id-mapping and watermark store
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Look up the calendar event id mapped to a time entry.
    ///
    /// `Ok(None)` means "never synced" and is not an error.
    async fn event_id_for(&self, time_entry_id: i64) -> Result<Option<String>>;

    /// Store a mapping, replacing any previous one for the same entry
    async fn insert_mapping(&self, time_entry_id: i64, event_id: &str) -> Result<()>;

    /// Remove the mapping keyed by the time-entry id
    async fn delete_mapping(&self, time_entry_id: i64) -> Result<()>;

    /// Read the last successful sync watermark, if any
    async fn last_sync_time(&self) -> Result<Option<DateTime<Utc>>>;

    /// Persist the sync watermark
    async fn set_last_sync_time(&self, at: DateTime<Utc>) -> Result<()>;
}
