use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Image used when an event is created without one.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placekitten.com/300/200";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Academic,
    Cultural,
    Sports,
    Tech,
    Workshop,
    Seminar,
    Social,
    #[default]
    #[serde(other)]
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 8] = [
        EventCategory::Academic,
        EventCategory::Cultural,
        EventCategory::Sports,
        EventCategory::Tech,
        EventCategory::Workshop,
        EventCategory::Seminar,
        EventCategory::Social,
        EventCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Academic => "academic",
            EventCategory::Cultural => "cultural",
            EventCategory::Sports => "sports",
            EventCategory::Tech => "tech",
            EventCategory::Workshop => "workshop",
            EventCategory::Seminar => "seminar",
            EventCategory::Social => "social",
            EventCategory::Other => "other",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical event as served to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub category: EventCategory,
    pub organizer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<u32>,
}

/// An event that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub category: EventCategory,
    pub organizer: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub attendees: Option<u32>,
}

/// Identifier as stored upstream; the events table hands out serial integers
/// but some deployments return strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalEventId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ExternalEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalEventId::Number(n) => write!(f, "{}", n),
            ExternalEventId::Text(s) => f.write_str(s),
        }
    }
}

/// Row shape returned by the upstream events API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalEventRecord {
    #[serde(default)]
    pub id: Option<ExternalEventId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organizer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: EventCategory,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub attendees: Option<u32>,
}

// Nullable columns come back as `null` rather than being omitted.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Aggregated counts arrive as numeric strings ("12"); values that are not a
// non-negative integer are dropped rather than failing the whole record.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(count)
}

/// Body of `POST /api/events` on the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub organizer: String,
    pub category: EventCategory,
    pub image_url: String,
    pub attendees: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_round_trips_lowercase() {
        let value = serde_json::to_value(EventCategory::Workshop).unwrap();
        assert_eq!(value, json!("workshop"));

        let parsed: EventCategory = serde_json::from_value(json!("tech")).unwrap();
        assert_eq!(parsed, EventCategory::Tech);
    }

    #[test]
    fn test_unknown_category_maps_to_other() {
        let parsed: EventCategory = serde_json::from_value(json!("music")).unwrap();
        assert_eq!(parsed, EventCategory::Other);
    }

    #[test]
    fn test_external_record_accepts_numeric_and_string_ids() {
        let numeric: ExternalEventRecord =
            serde_json::from_value(json!({ "id": 42, "title": "Hack Night" })).unwrap();
        assert_eq!(numeric.id, Some(ExternalEventId::Number(42)));
        assert_eq!(numeric.id.unwrap().to_string(), "42");

        let text: ExternalEventRecord =
            serde_json::from_value(json!({ "id": "evt-7" })).unwrap();
        assert_eq!(text.id, Some(ExternalEventId::Text("evt-7".to_string())));
    }

    #[test]
    fn test_external_record_tolerates_missing_fields() {
        let record: ExternalEventRecord = serde_json::from_value(json!({})).unwrap();
        assert!(record.id.is_none());
        assert!(record.event_date.is_none());
        assert!(record.event_time.is_none());
        assert_eq!(record.category, EventCategory::Other);
        assert_eq!(record.title, "");
    }

    #[test]
    fn test_external_record_treats_null_columns_as_empty() {
        let record: ExternalEventRecord = serde_json::from_value(json!({
            "id": 3,
            "title": "Career Fair",
            "description": null,
            "category": null,
            "image_url": null
        }))
        .unwrap();
        assert_eq!(record.description, "");
        assert_eq!(record.category, EventCategory::Other);
        assert!(record.image_url.is_none());
    }

    #[test]
    fn test_attendee_count_is_read_leniently() {
        let records: Vec<ExternalEventRecord> = serde_json::from_value(json!([
            { "id": 1, "attendees": 40 },
            { "id": 2, "attendees": "12" },
            { "id": 3, "attendees": -5 },
            { "id": 4, "attendees": "lots" },
            { "id": 5, "attendees": 2.5 },
            { "id": 6, "attendees": null },
            { "id": 7 }
        ]))
        .unwrap();

        let counts: Vec<Option<u32>> = records.iter().map(|r| r.attendees).collect();
        assert_eq!(
            counts,
            vec![Some(40), Some(12), None, None, None, None, None]
        );
    }

    #[test]
    fn test_create_request_uses_upstream_field_names() {
        let request = CreateEventRequest {
            title: "Robotics Demo".to_string(),
            description: "Bots".to_string(),
            date: "2025-06-01".to_string(),
            time: "14:30:00".to_string(),
            location: "Lab 3".to_string(),
            organizer: "Robotics Club".to_string(),
            category: EventCategory::Tech,
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            attendees: 0,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["date"], "2025-06-01");
        assert_eq!(value["time"], "14:30:00");
        assert_eq!(value["imageUrl"], PLACEHOLDER_IMAGE_URL);
        assert_eq!(value["attendees"], 0);
        assert_eq!(value["category"], "tech");
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let now = Utc::now();
        let event = Event {
            id: "1".to_string(),
            title: "Orientation".to_string(),
            description: String::new(),
            location: "Main Hall".to_string(),
            start_date: now,
            end_date: now,
            category: EventCategory::Academic,
            organizer: "Student Union".to_string(),
            image_url: Some("https://example.com/a.png".to_string()),
            attendees: None,
        };

        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("startDate").is_some());
        assert_eq!(value["imageUrl"], "https://example.com/a.png");
        assert!(value.get("attendees").is_none());
    }
}
