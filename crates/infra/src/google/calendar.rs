//! Google Calendar v3 events client
//!
//! Implements the [`CalendarPort`] over the events resource of a single
//! calendar. Updates are full-record: the event is read back, the synced
//! fields replaced, and the whole record written again, so fields this tool
//! does not own survive the round trip.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use timebridge_core::CalendarPort;
use timebridge_domain::{CalendarConfig, EventDraft, Result, TimebridgeError};
use tracing::debug;

use super::auth::{GoogleCredentials, TokenManager};
use crate::errors::InfraError;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar API client scoped to one calendar id.
pub struct GoogleCalendarClient {
    http: Client,
    base_url: String,
    calendar_id: String,
    tokens: TokenManager,
}

impl GoogleCalendarClient {
    pub fn new(config: &CalendarConfig, credentials: GoogleCredentials) -> Self {
        Self::with_base_url(config, credentials, CALENDAR_API_BASE)
    }

    /// Create a client against a non-default API base (used by tests).
    pub fn with_base_url(
        config: &CalendarConfig,
        credentials: GoogleCredentials,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            calendar_id: config.calendar_id.clone(),
            tokens: TokenManager::new(credentials),
        }
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), event_id)
    }

    fn draft_body(draft: &EventDraft) -> Value {
        json!({
            "summary": draft.summary,
            "description": draft.description,
            "start": {
                "dateTime": draft.start.to_rfc3339(),
                "timeZone": draft.time_zone,
            },
            "end": {
                "dateTime": draft.end.to_rfc3339(),
                "timeZone": draft.time_zone,
            },
        })
    }

    async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
        Err(TimebridgeError::Network(format!("Google Calendar API error ({status}): {text}")))
    }

    async fn get_event(&self, event_id: &str) -> Result<Value> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(self.event_url(event_id))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(InfraError::from)?;

        Self::check(response).await?.json::<Value>().await.map_err(|e| InfraError::from(e).into())
    }
}

#[async_trait]
impl CalendarPort for GoogleCalendarClient {
    async fn insert_event(&self, draft: &EventDraft) -> Result<String> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(self.events_url())
            .bearer_auth(&token)
            .json(&Self::draft_body(draft))
            .send()
            .await
            .map_err(InfraError::from)?;

        let body: Value = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| TimebridgeError::from(InfraError::from(e)))?;

        let event_id = body["id"].as_str().map(str::to_string).ok_or_else(|| {
            TimebridgeError::InvalidInput("calendar insert response missing event id".into())
        })?;

        debug!(%event_id, summary = %draft.summary, "inserted calendar event");
        Ok(event_id)
    }

    async fn update_event(&self, event_id: &str, draft: &EventDraft) -> Result<()> {
        let mut event = self.get_event(event_id).await?;

        let body = Self::draft_body(draft);
        for field in ["summary", "description", "start", "end"] {
            event[field] = body[field].clone();
        }

        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .put(self.event_url(event_id))
            .bearer_auth(&token)
            .json(&event)
            .send()
            .await
            .map_err(InfraError::from)?;
        Self::check(response).await?;

        debug!(%event_id, summary = %draft.summary, "updated calendar event");
        Ok(())
    }

    async fn delete_event(&self, event_id: &str) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .delete(self.event_url(event_id))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(InfraError::from)?;
        Self::check(response).await?;

        debug!(%event_id, "deleted calendar event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn draft() -> EventDraft {
        EventDraft {
            summary: "Write spec-DocsProject".to_string(),
            description: "Acme".to_string(),
            start: "2024-01-29T14:00:00Z".parse().unwrap(),
            end: "2024-01-29T15:00:00Z".parse().unwrap(),
            time_zone: "America/New_York".to_string(),
        }
    }

    async fn client(server: &MockServer) -> GoogleCalendarClient {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-test",
                "expires_in": 3600
            })))
            .mount(server)
            .await;

        let config = CalendarConfig {
            calendar_id: "primary".to_string(),
            credentials_path: PathBuf::from("unused.json"),
            time_zone: "America/New_York".to_string(),
        };
        let credentials = GoogleCredentials {
            client_id: "cid".to_string(),
            client_secret: "csecret".to_string(),
            refresh_token: "rtoken".to_string(),
            token_uri: format!("{}/token", server.uri()),
        };
        GoogleCalendarClient::with_base_url(&config, credentials, server.uri())
    }

    #[tokio::test]
    async fn insert_posts_full_record_and_returns_id() {
        let server = MockServer::start().await;
        let client = client(&server).await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(header("authorization", "Bearer at-test"))
            .and(body_partial_json(serde_json::json!({
                "summary": "Write spec-DocsProject",
                "description": "Acme",
                "start": {"timeZone": "America/New_York"},
                "end": {"timeZone": "America/New_York"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt-abc",
                "status": "confirmed"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let event_id = client.insert_event(&draft()).await.unwrap();
        assert_eq!(event_id, "evt-abc");
    }

    #[tokio::test]
    async fn update_reads_then_writes_full_record() {
        let server = MockServer::start().await;
        let client = client(&server).await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/evt-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt-abc",
                "summary": "stale summary",
                "colorId": "5",
                "start": {"dateTime": "2024-01-29T13:00:00Z"},
                "end": {"dateTime": "2024-01-29T13:30:00Z"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/calendars/primary/events/evt-abc"))
            .and(body_partial_json(serde_json::json!({
                "summary": "Write spec-DocsProject",
                "colorId": "5",
                "start": {"dateTime": "2024-01-29T14:00:00+00:00"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt-abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        client.update_event("evt-abc", &draft()).await.unwrap();
    }

    #[tokio::test]
    async fn delete_maps_api_errors_to_network() {
        let server = MockServer::start().await;
        let client = client(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/evt-gone"))
            .respond_with(ResponseTemplate::new(410).set_body_string("Resource has been deleted"))
            .mount(&server)
            .await;

        let err = client.delete_event("evt-gone").await.unwrap_err();
        match err {
            TimebridgeError::Network(msg) => assert!(msg.contains("410")),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_id_in_insert_response_is_invalid_input() {
        let server = MockServer::start().await;
        let client = client(&server).await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = client.insert_event(&draft()).await.unwrap_err();
        assert!(matches!(err, TimebridgeError::InvalidInput(_)));
    }
}
