use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::datetime::{split_date_time, MalformedDatePolicy};
use super::error::AccessError;
use crate::models::{
    AccessConfig, CreateEventRequest, Event, EventCategory, ExternalEventRecord, NewEvent,
    PLACEHOLDER_IMAGE_URL,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Data-access layer between the gateway and the upstream events API.
///
/// Starts unconfigured; every data operation fails with
/// [`AccessError::NotConfigured`] until [`configure`](Self::configure) has been
/// called. Reconfiguring overwrites the previous settings.
pub struct EventAccessService {
    client: Client,
    config: RwLock<Option<AccessConfig>>,
    timeout: Duration,
    date_policy: MalformedDatePolicy,
}

impl EventAccessService {
    pub fn new(timeout: Duration, date_policy: MalformedDatePolicy) -> Result<Self, AccessError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AccessError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: RwLock::new(None),
            timeout,
            date_policy,
        })
    }

    pub fn with_defaults() -> Result<Self, AccessError> {
        Self::new(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            MalformedDatePolicy::default(),
        )
    }

    pub fn configure(&self, config: AccessConfig) {
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            user = %config.user,
            api_url = %config.api_url,
            "Database configuration set"
        );
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(config);
    }

    pub fn is_configured(&self) -> bool {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Checks that `config` points at a reachable events API without storing it.
    pub async fn probe(&self, config: &AccessConfig) -> Result<(), AccessError> {
        let url = config.events_url();
        debug!(url = %url, "Probing events API");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AccessError::from_reqwest(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(remote_error(response, "Failed to fetch events").await);
        }
        Ok(())
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, AccessError> {
        let url = self.events_url()?;
        debug!(url = %url, "Fetching events");

        let result = self.fetch_events(&url).await;
        if let Err(e) = &result {
            warn!(error = %e, "Failed to fetch events");
        }
        result
    }

    async fn fetch_events(&self, url: &str) -> Result<Vec<Event>, AccessError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AccessError::from_reqwest(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(remote_error(response, "Failed to fetch events").await);
        }

        let records: Vec<ExternalEventRecord> = response
            .json()
            .await
            .map_err(|e| AccessError::from_reqwest(e, self.timeout))?;

        let events = records
            .into_iter()
            .map(|record| self.to_event(record))
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = events.len(), "Fetched events");
        Ok(events)
    }

    pub async fn create_event(&self, event: NewEvent) -> Result<Event, AccessError> {
        let url = self.events_url()?;

        let (date, time) = split_date_time(&event.start_date);
        let body = CreateEventRequest {
            title: event.title,
            description: event.description,
            date,
            time,
            location: event.location,
            organizer: event.organizer,
            category: event.category,
            image_url: event
                .image_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
            attendees: event.attendees.unwrap_or(0),
        };
        debug!(url = %url, title = %body.title, "Creating event");

        let result = self.post_event(&url, &body).await;
        match &result {
            Ok(created) => info!(id = %created.id, "Created event"),
            Err(e) => warn!(error = %e, "Failed to create event"),
        }
        result
    }

    async fn post_event(&self, url: &str, body: &CreateEventRequest) -> Result<Event, AccessError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AccessError::from_reqwest(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(remote_error(response, "Failed to create event").await);
        }

        let record: ExternalEventRecord = response
            .json()
            .await
            .map_err(|e| AccessError::from_reqwest(e, self.timeout))?;

        self.to_event(record)
    }

    /// The upstream API has no single-record endpoint, so this fetches the
    /// whole collection and scans it.
    pub async fn get_event_by_id(&self, id: &str) -> Result<Event, AccessError> {
        self.list_events()
            .await?
            .into_iter()
            .find(|event| event.id == id)
            .ok_or(AccessError::NotFound)
    }

    pub async fn get_events_by_category(
        &self,
        category: EventCategory,
    ) -> Result<Vec<Event>, AccessError> {
        let mut events = self.list_events().await?;
        events.retain(|event| event.category == category);
        Ok(events)
    }

    fn events_url(&self) -> Result<String, AccessError> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(AccessConfig::events_url)
            .ok_or(AccessError::NotConfigured)
    }

    fn to_event(&self, record: ExternalEventRecord) -> Result<Event, AccessError> {
        let start = self
            .date_policy
            .combine(record.event_date.as_deref(), record.event_time.as_deref())?;

        // The upstream row holds a single date/time pair.
        Ok(Event {
            id: record
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: record.title,
            description: record.description,
            location: record.location,
            start_date: start,
            end_date: start,
            category: record.category,
            organizer: record.organizer,
            image_url: record.image_url,
            attendees: record.attendees,
        })
    }
}

/// Builds the error for a non-2xx response. Prefers the `error` or `message`
/// field of a JSON body; a body that is not JSON yields the status line.
async fn remote_error(response: Response, fallback: &str) -> AccessError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<Value>(&body) {
        Ok(json) => json
            .get("error")
            .or_else(|| json.get("message"))
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
            .unwrap_or(fallback)
            .to_string(),
        Err(_) => status.to_string(),
    };

    AccessError::Remote {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExternalEventId;

    fn service(policy: MalformedDatePolicy) -> EventAccessService {
        EventAccessService::new(Duration::from_secs(5), policy).unwrap()
    }

    #[test]
    fn test_starts_unconfigured() {
        let service = service(MalformedDatePolicy::default());
        assert!(!service.is_configured());
        assert_eq!(service.events_url(), Err(AccessError::NotConfigured));
    }

    #[test]
    fn test_configure_overwrites() {
        let service = service(MalformedDatePolicy::default());
        service.configure(AccessConfig::new("http://first.test"));
        service.configure(AccessConfig::new("http://second.test/"));

        assert!(service.is_configured());
        assert_eq!(
            service.events_url().unwrap(),
            "http://second.test/api/events"
        );
    }

    #[test]
    fn test_to_event_maps_external_fields() {
        let service = service(MalformedDatePolicy::default());
        let record = ExternalEventRecord {
            id: Some(ExternalEventId::Number(3)),
            title: "Chess Club".to_string(),
            category: EventCategory::Social,
            event_date: Some("2025-06-01".to_string()),
            event_time: Some("14:30:00".to_string()),
            image_url: Some("https://example.com/chess.png".to_string()),
            attendees: Some(12),
            ..Default::default()
        };

        let event = service.to_event(record).unwrap();
        assert_eq!(event.id, "3");
        assert_eq!(event.start_date, event.end_date);
        assert_eq!(event.category, EventCategory::Social);
        assert_eq!(event.attendees, Some(12));
        assert_eq!(
            split_date_time(&event.start_date),
            ("2025-06-01".to_string(), "14:30:00".to_string())
        );
    }

    #[test]
    fn test_to_event_generates_missing_id() {
        let service = service(MalformedDatePolicy::default());
        let event = service.to_event(ExternalEventRecord::default()).unwrap();
        assert!(Uuid::parse_str(&event.id).is_ok());
    }

    #[test]
    fn test_to_event_rejects_bad_dates_under_strict_policy() {
        let service = service(MalformedDatePolicy::Reject);
        let result = service.to_event(ExternalEventRecord::default());
        assert!(matches!(result, Err(AccessError::InvalidDate(_))));
    }
}
