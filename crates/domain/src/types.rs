//! Core domain types shared between the sync service and its adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A time entry as returned by the Toggl v9 API (`meta=true` shape).
///
/// Read-only snapshot per sync pass. `server_deleted_at` is the soft-delete
/// marker: the entry counts as deleted iff the field is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    /// Toggl sends `null` for entries without a description.
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    pub start: DateTime<Utc>,
    /// `None` while the entry is still running.
    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,
    #[serde(default)]
    pub server_deleted_at: Option<DateTime<Utc>>,
}

impl TimeEntry {
    /// Whether the entry was soft-deleted upstream.
    pub fn is_deleted(&self) -> bool {
        self.server_deleted_at.is_some()
    }

    /// Derive the calendar event summary for this entry.
    ///
    /// `description + "-" + project` when the description is non-empty,
    /// otherwise just the project name.
    pub fn event_summary(&self) -> String {
        let project = self.project_name.as_deref().unwrap_or_default();
        if self.description.is_empty() {
            project.to_string()
        } else {
            format!("{}-{}", self.description, project)
        }
    }

    /// Build the full-record calendar write shape for this entry.
    ///
    /// The calendar event description carries the Toggl client name. Entries
    /// without a `stop` fall back to `start` for the end time; the service
    /// skips running entries before it ever writes them.
    pub fn event_draft(&self, time_zone: &str) -> EventDraft {
        EventDraft {
            summary: self.event_summary(),
            description: self.client_name.clone().unwrap_or_default(),
            start: self.start,
            end: self.stop.unwrap_or(self.start),
            time_zone: time_zone.to_string(),
        }
    }
}

/// Full-record write shape pushed to the calendar service.
///
/// There is no partial-field update: summary, description, start and end are
/// always written together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// IANA time zone label attached to both ends of the event.
    pub time_zone: String,
}

/// A calendar event as read back from the calendar service.
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A new time entry to be created in the time-tracking service.
///
/// Produced by the template planner; the Toggl adapter fills in the
/// workspace id and duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeEntry {
    pub description: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub project_id: Option<i64>,
}

/// One line of a day template: times-of-day relative to an unspecified date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateEntry {
    pub description: String,
    /// Local start time of day, `HH:MM`.
    pub start: String,
    /// Local stop time of day, `HH:MM`.
    pub stop: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
}

fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(description: &str, project: Option<&str>) -> TimeEntry {
        TimeEntry {
            id: 42,
            description: description.to_string(),
            client_name: Some("Acme".to_string()),
            project_name: project.map(String::from),
            start: "2024-01-29T14:00:00Z".parse().unwrap(),
            stop: Some("2024-01-29T15:00:00Z".parse().unwrap()),
            server_deleted_at: None,
        }
    }

    #[test]
    fn summary_joins_description_and_project() {
        let e = entry("Write spec", Some("DocsProject"));
        assert_eq!(e.event_summary(), "Write spec-DocsProject");
    }

    #[test]
    fn summary_falls_back_to_project_when_description_empty() {
        let e = entry("", Some("DocsProject"));
        assert_eq!(e.event_summary(), "DocsProject");
    }

    #[test]
    fn summary_handles_missing_project() {
        let e = entry("Write spec", None);
        assert_eq!(e.event_summary(), "Write spec-");
        let e = entry("", None);
        assert_eq!(e.event_summary(), "");
    }

    #[test]
    fn draft_maps_client_name_to_event_description() {
        let e = entry("Write spec", Some("DocsProject"));
        let draft = e.event_draft("America/New_York");
        assert_eq!(draft.summary, "Write spec-DocsProject");
        assert_eq!(draft.description, "Acme");
        assert_eq!(draft.time_zone, "America/New_York");
        assert_eq!(draft.start, e.start);
        assert_eq!(draft.end, e.stop.unwrap());
    }

    #[test]
    fn deserializes_toggl_wire_shape() {
        let json = r#"{
            "id": 9000,
            "description": null,
            "client_name": "Acme",
            "project_name": "DocsProject",
            "start": "2024-01-29T14:00:00Z",
            "stop": null,
            "server_deleted_at": "2024-01-30T08:00:00Z",
            "workspace_id": 123,
            "billable": false
        }"#;

        let e: TimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.id, 9000);
        assert_eq!(e.description, "");
        assert!(e.stop.is_none());
        assert!(e.is_deleted());
    }

    #[test]
    fn missing_deleted_field_means_not_deleted() {
        let json = r#"{"id": 1, "start": "2024-01-29T14:00:00Z"}"#;
        let e: TimeEntry = serde_json::from_str(json).unwrap();
        assert!(!e.is_deleted());
        assert!(e.client_name.is_none());
    }
}
