//! Day-template planner
//!
//! Turns a template of relative times-of-day into absolute UTC time entries
//! anchored to one calendar day in a named local time zone. This is the
//! one-shot data-loading path; it performs no reconciliation and touches no
//! mapping store.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use timebridge_domain::{NewTimeEntry, Result, TemplateEntry, TimebridgeError};
use tracing::debug;

/// Anchor template entries to `date` in `time_zone`, producing entries ready
/// to be posted to the time-tracking service.
///
/// Local times are `HH:MM`. Ambiguous local times (a DST fall-back hour)
/// resolve to the earlier instant; nonexistent ones (a DST gap) are rejected.
/// A stop at or before the start on the same day is rejected too.
pub fn plan_day(
    entries: &[TemplateEntry],
    date: NaiveDate,
    time_zone: &str,
) -> Result<Vec<NewTimeEntry>> {
    let tz: Tz = time_zone
        .parse()
        .map_err(|_| TimebridgeError::InvalidInput(format!("unknown time zone: {time_zone}")))?;

    let mut planned = Vec::with_capacity(entries.len());
    for entry in entries {
        let start = anchor(&entry.start, date, tz)?;
        let stop = anchor(&entry.stop, date, tz)?;
        if stop <= start {
            return Err(TimebridgeError::InvalidInput(format!(
                "template entry '{}' stops at {} before it starts at {}",
                entry.description, entry.stop, entry.start
            )));
        }

        debug!(description = %entry.description, %start, %stop, "planned template entry");
        planned.push(NewTimeEntry {
            description: entry.description.clone(),
            start,
            stop,
            project_id: entry.project_id,
        });
    }

    Ok(planned)
}

fn anchor(time_of_day: &str, date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(time_of_day, "%H:%M").map_err(|e| {
        TimebridgeError::InvalidInput(format!("invalid template time '{time_of_day}': {e}"))
    })?;

    let local = date.and_time(time);
    local
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            TimebridgeError::InvalidInput(format!(
                "local time {local} does not exist in {tz} (DST gap)"
            ))
        })
}
