//! Toggl Track v9 API client
//!
//! Implements the [`TimeEntrySource`] port over plain HTTP Basic auth. One
//! request per call: no pagination, no retry, and no timeout configured.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use timebridge_domain::{NewTimeEntry, Result, TimeEntry, TimebridgeError, TogglConfig};
use timebridge_core::TimeEntrySource;
use tracing::debug;

use crate::errors::InfraError;

const TOGGL_API_BASE: &str = "https://api.track.toggl.com/api/v9";

/// Toggl Track API client
pub struct TogglClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    workspace_id: i64,
}

impl TogglClient {
    pub fn new(config: &TogglConfig) -> Self {
        Self::with_base_url(config, TOGGL_API_BASE)
    }

    /// Create a client against a non-default API base (used by tests).
    pub fn with_base_url(config: &TogglConfig, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            username: config.username.clone(),
            password: config.password.clone(),
            workspace_id: config.workspace_id,
        }
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.username, Some(&self.password))
    }

    fn me_entries_url(&self) -> String {
        format!("{}/me/time_entries", self.base_url)
    }

    fn workspace_entries_url(&self) -> String {
        format!("{}/workspaces/{}/time_entries", self.base_url, self.workspace_id)
    }
}

#[derive(Serialize)]
struct CreateTimeEntryBody<'a> {
    created_with: &'a str,
    description: &'a str,
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
    duration: i64,
    workspace_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<i64>,
}

#[async_trait]
impl TimeEntrySource for TogglClient {
    async fn entries_since(&self, since: DateTime<Utc>) -> Result<Vec<TimeEntry>> {
        debug!(%since, "fetching time entries");

        // No status check on this call; an error body fails JSON decoding
        // instead of producing a Network error.
        let entries = self
            .authed(self.http.get(self.me_entries_url()))
            .query(&[("since", since.timestamp().to_string()), ("meta", "true".to_string())])
            .send()
            .await
            .map_err(InfraError::from)?
            .json::<Vec<TimeEntry>>()
            .await
            .map_err(InfraError::from)?;

        debug!(count = entries.len(), "fetched time entries");
        Ok(entries)
    }

    async fn entries_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TimeEntry>> {
        debug!(%start, %end, "fetching time entries for date range");

        let entries = self
            .authed(self.http.get(self.me_entries_url()))
            .query(&[
                ("start_date", start.format("%Y-%m-%d").to_string()),
                ("end_date", end.format("%Y-%m-%d").to_string()),
                ("meta", "true".to_string()),
            ])
            .send()
            .await
            .map_err(InfraError::from)?
            .json::<Vec<TimeEntry>>()
            .await
            .map_err(InfraError::from)?;

        Ok(entries)
    }

    async fn create_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry> {
        let body = CreateTimeEntryBody {
            created_with: "timebridge",
            description: &entry.description,
            start: entry.start,
            stop: entry.stop,
            duration: (entry.stop - entry.start).num_seconds(),
            workspace_id: self.workspace_id,
            project_id: entry.project_id,
        };

        let response = self
            .authed(self.http.post(self.workspace_entries_url()))
            .json(&body)
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(TimebridgeError::Network(format!(
                "Toggl API error on time entry create ({status}): {text}"
            )));
        }

        let created = response.json::<TimeEntry>().await.map_err(InfraError::from)?;
        debug!(entry_id = created.id, "created time entry");
        Ok(created)
    }

    async fn delete_entry(&self, id: i64) -> Result<()> {
        let url = format!("{}/{}", self.workspace_entries_url(), id);
        let response =
            self.authed(self.http.delete(&url)).send().await.map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(TimebridgeError::Network(format!(
                "Toggl API error on time entry delete ({status}): {text}"
            )));
        }

        debug!(entry_id = id, "deleted time entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{basic_auth, body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config() -> TogglConfig {
        TogglConfig {
            username: "jane@example.com".to_string(),
            password: "s3cret".to_string(),
            workspace_id: 777,
        }
    }

    fn client(server: &MockServer) -> TogglClient {
        TogglClient::with_base_url(&config(), server.uri())
    }

    #[tokio::test]
    async fn entries_since_sends_auth_and_watermark() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/time_entries"))
            .and(basic_auth("jane@example.com", "s3cret"))
            .and(query_param("since", "1706536800"))
            .and(query_param("meta", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 42,
                    "description": "Write spec",
                    "client_name": "Acme",
                    "project_name": "DocsProject",
                    "start": "2024-01-29T14:00:00Z",
                    "stop": "2024-01-29T15:00:00Z",
                    "server_deleted_at": null
                },
                {
                    "id": 43,
                    "description": null,
                    "start": "2024-01-29T16:00:00Z",
                    "stop": null,
                    "server_deleted_at": "2024-01-30T08:00:00Z"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let since: DateTime<Utc> = "2024-01-29T14:00:00Z".parse().unwrap();
        let entries = client(&server).entries_since(since).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event_summary(), "Write spec-DocsProject");
        assert!(entries[1].is_deleted());
    }

    #[tokio::test]
    async fn entries_since_error_body_surfaces_as_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/time_entries"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Incorrect credentials"))
            .mount(&server)
            .await;

        let err = client(&server).entries_since(Utc::now()).await.unwrap_err();

        assert!(matches!(err, TimebridgeError::InvalidInput(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn entries_between_sends_date_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/time_entries"))
            .and(query_param("start_date", "2024-01-29"))
            .and(query_param("end_date", "2024-01-30"))
            .and(query_param("meta", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let start = NaiveDate::from_ymd_opt(2024, 1, 29).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let entries = client(&server).entries_between(start, end).await.unwrap();

        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn create_entry_posts_workspace_scoped_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workspaces/777/time_entries"))
            .and(basic_auth("jane@example.com", "s3cret"))
            .and(body_partial_json(serde_json::json!({
                "created_with": "timebridge",
                "description": "Standup",
                "workspace_id": 777,
                "duration": 1800
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 5000,
                "description": "Standup",
                "start": "2024-01-29T14:00:00Z",
                "stop": "2024-01-29T14:30:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let entry = NewTimeEntry {
            description: "Standup".to_string(),
            start: "2024-01-29T14:00:00Z".parse().unwrap(),
            stop: "2024-01-29T14:30:00Z".parse().unwrap(),
            project_id: None,
        };
        let created = client(&server).create_entry(&entry).await.unwrap();

        assert_eq!(created.id, 5000);
    }

    #[tokio::test]
    async fn create_entry_maps_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workspaces/777/time_entries"))
            .respond_with(ResponseTemplate::new(400).set_body_string("start is required"))
            .mount(&server)
            .await;

        let entry = NewTimeEntry {
            description: "Standup".to_string(),
            start: "2024-01-29T14:00:00Z".parse().unwrap(),
            stop: "2024-01-29T14:30:00Z".parse().unwrap(),
            project_id: None,
        };
        let err = client(&server).create_entry(&entry).await.unwrap_err();

        match err {
            TimebridgeError::Network(msg) => assert!(msg.contains("400")),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_entry_targets_workspace_path() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/workspaces/777/time_entries/42"))
            .and(basic_auth("jane@example.com", "s3cret"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).delete_entry(42).await.unwrap();
    }
}
