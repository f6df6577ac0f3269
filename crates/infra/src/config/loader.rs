//! Configuration loader
//!
//! Loads application configuration from environment variables (a `.env` file
//! is read by the binary before this runs).
//!
//! ## Environment Variables
//! - `TIMEBRIDGE_TOGGL_USERNAME`: Toggl account username (required)
//! - `TIMEBRIDGE_TOGGL_PASSWORD`: Toggl account password (required)
//! - `TIMEBRIDGE_TOGGL_WORKSPACE_ID`: Toggl workspace id (required)
//! - `TIMEBRIDGE_CALENDAR_ID`: target Google calendar id (required)
//! - `TIMEBRIDGE_GOOGLE_CREDENTIALS`: credentials JSON path
//!   (default `google_credentials.json`)
//! - `TIMEBRIDGE_DB_PATH`: SQLite store path (default `timebridge.db`)
//! - `TIMEBRIDGE_TIME_ZONE`: IANA zone for event times
//!   (default `America/New_York`)
//! - `TIMEBRIDGE_LOOKBACK_DAYS`: bootstrap fetch window (default `7`)
//! - `TIMEBRIDGE_TEMPLATE_DIR`: day-template directory (default `templates`)

use std::path::PathBuf;

use timebridge_domain::{
    CalendarConfig, Config, Result, StorageConfig, SyncConfig, TimebridgeError, TogglConfig,
};

const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Load configuration from environment variables
///
/// # Errors
/// Returns `TimebridgeError::Config` if a required variable is missing or a
/// numeric variable fails to parse.
pub fn load_from_env() -> Result<Config> {
    let username = env_var("TIMEBRIDGE_TOGGL_USERNAME")?;
    let password = env_var("TIMEBRIDGE_TOGGL_PASSWORD")?;
    let workspace_id = env_var("TIMEBRIDGE_TOGGL_WORKSPACE_ID").and_then(|s| {
        s.parse::<i64>()
            .map_err(|e| TimebridgeError::Config(format!("Invalid workspace id: {e}")))
    })?;

    let calendar_id = env_var("TIMEBRIDGE_CALENDAR_ID")?;
    let credentials_path = env_or("TIMEBRIDGE_GOOGLE_CREDENTIALS", "google_credentials.json");
    let time_zone = env_or("TIMEBRIDGE_TIME_ZONE", "America/New_York");

    let db_path = env_or("TIMEBRIDGE_DB_PATH", "timebridge.db");

    let lookback_days = match std::env::var("TIMEBRIDGE_LOOKBACK_DAYS") {
        Ok(s) => s
            .parse::<i64>()
            .map_err(|e| TimebridgeError::Config(format!("Invalid lookback days: {e}")))?,
        Err(_) => DEFAULT_LOOKBACK_DAYS,
    };
    let template_dir = env_or("TIMEBRIDGE_TEMPLATE_DIR", "templates");

    Ok(Config {
        toggl: TogglConfig { username, password, workspace_id },
        calendar: CalendarConfig {
            calendar_id,
            credentials_path: PathBuf::from(credentials_path),
            time_zone,
        },
        storage: StorageConfig { db_path: PathBuf::from(db_path) },
        sync: SyncConfig { lookback_days, template_dir: PathBuf::from(template_dir) },
    })
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        TimebridgeError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Get an environment variable with a fallback default
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
