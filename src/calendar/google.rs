//! Google Calendar HTTP client.
//!
//! Implements [`CalendarPort`] against the Calendar v3 events API with a
//! caller-supplied [`Credential`]. Event windows are always written with an
//! explicit "UTC" zone tag, matching the normalized model. All-day events
//! (date without dateTime) are skipped on read; this crate never creates
//! them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use super::token::Credential;
use super::CalendarPort;
use crate::error::{Error, Result};
use crate::event::{NormalizedEvent, RemoteEvent};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GoogleCalendar {
    client: Client,
    credential: Credential,
    calendar_id: String,
    api_base: String,
}

impl GoogleCalendar {
    pub fn new(credential: Credential, calendar_id: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            credential,
            calendar_id: calendar_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn events_url(&self) -> Result<Url> {
        Url::parse(&format!("{}/calendars/{}/events", self.api_base, self.calendar_id))
            .map_err(|e| Error::MalformedResponse(format!("bad events URL: {}", e)))
    }

    fn event_url(&self, id: &str) -> Result<Url> {
        Url::parse(&format!("{}/calendars/{}/events/{}", self.api_base, self.calendar_id, id))
            .map_err(|e| Error::MalformedResponse(format!("bad event URL: {}", e)))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_else(|_| "<unreadable>".to_string());
        Err(Error::CalendarHttp { status, body })
    }

    async fn fetch_events(&self, url: Url) -> Result<Vec<RemoteEvent>> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(self.credential.bearer())
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body: Value = response.json().await?;

        let items = body
            .get("items")
            .and_then(|i| i.as_array())
            .ok_or_else(|| Error::MalformedResponse("no 'items' in list response".to_string()))?;

        Ok(items.iter().filter_map(parse_remote_event).collect())
    }
}

/// Read back the subset of a provider event this crate cares about.
/// Returns None for all-day events, which carry a date but no dateTime.
fn parse_remote_event(item: &Value) -> Option<RemoteEvent> {
    let id = item.get("id")?.as_str()?.to_string();
    let summary = item.get("summary").and_then(|s| s.as_str()).unwrap_or("").to_string();
    let start_utc = parse_event_instant(item.get("start")?)?;
    let end_utc = parse_event_instant(item.get("end")?)?;
    Some(RemoteEvent { id, summary, start_utc, end_utc })
}

fn parse_event_instant(field: &Value) -> Option<DateTime<Utc>> {
    let raw = field.get("dateTime")?.as_str()?;
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
}

fn event_body(event: &NormalizedEvent) -> Value {
    let mut body = json!({
        "summary": event.summary,
        "start": { "dateTime": event.start_utc.to_rfc3339(), "timeZone": "UTC" },
        "end": { "dateTime": event.end_utc.to_rfc3339(), "timeZone": "UTC" },
    });
    if let Some(color_id) = &event.color_id {
        body["colorId"] = json!(color_id);
    }
    body
}

#[async_trait]
impl CalendarPort for GoogleCalendar {
    async fn list_upcoming(&self, limit: usize) -> Result<Vec<RemoteEvent>> {
        let mut url = self.events_url()?;
        url.query_pairs_mut()
            .append_pair("timeMin", &Utc::now().to_rfc3339())
            .append_pair("maxResults", &limit.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");
        self.fetch_events(url).await
    }

    async fn list_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        text_filter: &str,
    ) -> Result<Vec<RemoteEvent>> {
        let mut url = self.events_url()?;
        url.query_pairs_mut()
            .append_pair("timeMin", &start.to_rfc3339())
            .append_pair("timeMax", &end.to_rfc3339())
            .append_pair("q", text_filter)
            .append_pair("singleEvents", "true");
        self.fetch_events(url).await
    }

    async fn create(&self, event: &NormalizedEvent) -> Result<String> {
        let url = self.events_url()?;
        debug!("POST {} '{}'", url, event.summary);
        let response = self
            .client
            .post(url)
            .bearer_auth(self.credential.bearer())
            .json(&event_body(event))
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body: Value = response.json().await?;

        body.get("htmlLink")
            .or_else(|| body.get("id"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| Error::MalformedResponse("create response missing link".to_string()))
    }

    async fn get(&self, id: &str) -> Result<RemoteEvent> {
        let url = self.event_url(id)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(self.credential.bearer())
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body: Value = response.json().await?;
        parse_remote_event(&body)
            .ok_or_else(|| Error::MalformedResponse(format!("event {} has no dateTime", id)))
    }

    async fn update(&self, id: &str, event: &NormalizedEvent) -> Result<()> {
        let url = self.event_url(id)?;
        debug!("PUT {} '{}'", url, event.summary);
        let response = self
            .client
            .put(url)
            .bearer_auth(self.credential.bearer())
            .json(&event_body(event))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
