use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EventType {
    Deadline,
    Court,
    Appointment,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::Deadline, EventType::Court, EventType::Appointment];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Deadline => "deadline",
            EventType::Court => "court",
            EventType::Appointment => "appointment",
        }
    }
}

impl FromStr for EventType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|event_type| event_type.as_str() == s)
            .ok_or_else(|| AppError::BadRequest(format!("unknown event type: {}", s)))
    }
}

/// Event type selector of the calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventTypeFilter {
    #[default]
    All,
    Only(EventType),
}

impl EventTypeFilter {
    pub fn accepts(&self, event_type: EventType) -> bool {
        match self {
            EventTypeFilter::All => true,
            EventTypeFilter::Only(wanted) => *wanted == event_type,
        }
    }
}

impl FromStr for EventTypeFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(EventTypeFilter::All)
        } else {
            s.parse().map(EventTypeFilter::Only)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub event_type: EventType,
    pub case_id: Option<String>,
    pub case_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEventRequest {
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub case_name: Option<String>,
}

impl NewEventRequest {
    pub fn validate(self) -> Result<Self, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_field_is_named_type() {
        let event: EventRecord = serde_json::from_value(serde_json::json!({
            "id": "1",
            "title": "Filing Deadline",
            "date": "2023-06-15T09:00:00Z",
            "type": "deadline",
            "case_id": "1",
            "case_name": "Smith v. Johnson"
        }))
        .unwrap();
        assert_eq!(event.event_type, EventType::Deadline);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "deadline");
        assert!(json.get("event_type").is_none());
    }

    #[test]
    fn test_type_filter() {
        let filter: EventTypeFilter = "court".parse().unwrap();
        assert!(filter.accepts(EventType::Court));
        assert!(!filter.accepts(EventType::Deadline));
        assert!(EventTypeFilter::All.accepts(EventType::Appointment));
        assert!("hearing".parse::<EventTypeFilter>().is_err());
    }

    #[test]
    fn test_event_type_names_match_wire_format() {
        for event_type in EventType::ALL {
            let json = serde_json::to_value(event_type).unwrap();
            assert_eq!(json, event_type.as_str());
            assert_eq!(event_type.as_str().parse::<EventType>().unwrap(), event_type);
        }
    }
}
