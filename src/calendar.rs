use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, TimeZone};

use crate::models::{EventRecord, EventTypeFilter};

/// Calendar date of an event as seen from `tz`.
fn local_date<Tz: TimeZone>(event: &EventRecord, tz: &Tz) -> NaiveDate {
    event.date.with_timezone(tz).date_naive()
}

/// Events whose calendar date in `tz` is `day`, ignoring time of day.
pub fn events_on_day<'a, Tz: TimeZone>(
    events: &'a [EventRecord],
    day: NaiveDate,
    tz: &Tz,
) -> Vec<&'a EventRecord> {
    events
        .iter()
        .filter(|event| local_date(event, tz) == day)
        .collect()
}

pub fn day_has_event<Tz: TimeZone>(events: &[EventRecord], day: NaiveDate, tz: &Tz) -> bool {
    events.iter().any(|event| local_date(event, tz) == day)
}

pub fn filter_events_by_type(events: &[EventRecord], filter: EventTypeFilter) -> Vec<EventRecord> {
    events
        .iter()
        .filter(|event| filter.accepts(event.event_type))
        .cloned()
        .collect()
}

/// Days of the given month carrying at least one event. An out-of-range
/// month yields an empty set.
pub fn days_with_events<Tz: TimeZone>(
    events: &[EventRecord],
    year: i32,
    month: u32,
    tz: &Tz,
) -> BTreeSet<NaiveDate> {
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return BTreeSet::new();
    }

    events
        .iter()
        .map(|event| local_date(event, tz))
        .filter(|date| date.year() == year && date.month() == month)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;
    use crate::models::EventType;

    fn event(id: &str, rfc3339: &str, event_type: EventType) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            title: format!("event {}", id),
            date: rfc3339.parse().unwrap(),
            event_type,
            case_id: None,
            case_name: None,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_event_found_regardless_of_time_of_day() {
        let events = vec![
            event("1", "2023-06-15T00:00:00Z", EventType::Deadline),
            event("2", "2023-06-15T23:59:59Z", EventType::Court),
        ];
        let found = events_on_day(&events, day(2023, 6, 15), &Utc);
        assert_eq!(found.len(), 2);
        assert!(events_on_day(&events, day(2023, 6, 16), &Utc).is_empty());
    }

    #[test]
    fn test_day_uses_viewer_time_zone() {
        let events = vec![event("1", "2023-06-15T22:30:00Z", EventType::Appointment)];
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let new_york = FixedOffset::west_opt(4 * 3600).unwrap();

        assert!(day_has_event(&events, day(2023, 6, 16), &tokyo));
        assert!(!day_has_event(&events, day(2023, 6, 15), &tokyo));
        assert!(day_has_event(&events, day(2023, 6, 15), &new_york));
    }

    #[test]
    fn test_has_event_agrees_with_lookup() {
        let events = vec![
            event("1", "2023-06-02T10:00:00Z", EventType::Deadline),
            event("2", "2023-06-04T14:00:00Z", EventType::Appointment),
            event("3", "2023-06-04T16:00:00Z", EventType::Court),
        ];
        for d in 1..=7 {
            let date = day(2023, 6, d);
            assert_eq!(
                day_has_event(&events, date, &Utc),
                !events_on_day(&events, date, &Utc).is_empty()
            );
        }
    }

    #[test]
    fn test_lookup_preserves_order() {
        let events = vec![
            event("b", "2023-06-04T16:00:00Z", EventType::Court),
            event("a", "2023-06-04T09:00:00Z", EventType::Deadline),
        ];
        let found: Vec<&str> = events_on_day(&events, day(2023, 6, 4), &Utc)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(found, vec!["b", "a"]);
    }

    #[test]
    fn test_filter_by_type() {
        let events = vec![
            event("1", "2023-06-02T10:00:00Z", EventType::Deadline),
            event("2", "2023-06-04T14:00:00Z", EventType::Court),
        ];
        let courts = filter_events_by_type(&events, EventTypeFilter::Only(EventType::Court));
        assert_eq!(courts.len(), 1);
        assert_eq!(courts[0].id, "2");
        assert_eq!(filter_events_by_type(&events, EventTypeFilter::All).len(), 2);
    }

    #[test]
    fn test_days_with_events_in_month() {
        let events = vec![
            event("1", "2023-06-02T10:00:00Z", EventType::Deadline),
            event("2", "2023-06-02T18:00:00Z", EventType::Court),
            event("3", "2023-06-30T12:00:00Z", EventType::Appointment),
            event("4", "2023-07-01T12:00:00Z", EventType::Appointment),
        ];
        let days: Vec<NaiveDate> = days_with_events(&events, 2023, 6, &Utc).into_iter().collect();
        assert_eq!(days, vec![day(2023, 6, 2), day(2023, 6, 30)]);
        assert!(days_with_events(&events, 2023, 13, &Utc).is_empty());
    }
}
