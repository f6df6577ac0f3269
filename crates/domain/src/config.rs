//! Configuration structures
//!
//! Plain data; loading from the environment lives in the infra crate.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub toggl: TogglConfig,
    pub calendar: CalendarConfig,
    pub storage: StorageConfig,
    pub sync: SyncConfig,
}

/// Toggl Track API access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TogglConfig {
    pub username: String,
    pub password: String,
    pub workspace_id: i64,
}

/// Google Calendar access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Id of the calendar all events are written to.
    pub calendar_id: String,
    /// Path to the Google credentials JSON file.
    pub credentials_path: PathBuf,
    /// IANA time zone label attached to event start/end times.
    pub time_zone: String,
}

/// Local mapping/watermark store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file path.
    pub db_path: PathBuf,
}

/// Sync pass tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Bootstrap lookback window when no watermark is stored yet.
    pub lookback_days: i64,
    /// Directory holding day-template JSON files for the seed command.
    pub template_dir: PathBuf,
}
