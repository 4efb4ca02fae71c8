//! Demo records shown on a fresh install, dated relative to `now`.

use chrono::{DateTime, Duration, Utc};

use crate::models::{CaseRecord, CaseStatus, EventRecord, EventType};

#[allow(clippy::too_many_arguments)]
fn sample_case(
    id: &str,
    case_number: &str,
    client_name: &str,
    title: &str,
    status: CaseStatus,
    deadline: Option<DateTime<Utc>>,
    description: &str,
    created_at: DateTime<Utc>,
) -> CaseRecord {
    CaseRecord {
        id: id.to_string(),
        case_number: case_number.to_string(),
        client_name: client_name.to_string(),
        title: title.to_string(),
        status,
        next_deadline: deadline,
        description: Some(description.to_string()),
        created_at,
    }
}

pub fn sample_cases(now: DateTime<Utc>) -> Vec<CaseRecord> {
    let days = |n: i64| now + Duration::days(n);
    // Listed newest first; created_at steps back a minute per entry.
    let created = |n: i64| now - Duration::minutes(n);

    vec![
        sample_case(
            "1",
            "2023-001",
            "John Smith",
            "Smith v. Johnson",
            CaseStatus::Active,
            Some(days(7)),
            "Personal injury case involving a car accident on Highway 101.",
            created(0),
        ),
        sample_case(
            "2",
            "2023-002",
            "Sarah Williams",
            "Williams Estate Planning",
            CaseStatus::Pending,
            Some(days(14)),
            "Estate planning and will preparation for client with substantial assets.",
            created(1),
        ),
        sample_case(
            "3",
            "2022-045",
            "Tech Innovations Inc.",
            "Tech Innovations v. DataCorp",
            CaseStatus::Active,
            Some(days(3)),
            "Intellectual property dispute regarding patent infringement.",
            created(2),
        ),
        sample_case(
            "4",
            "2022-032",
            "Robert Chen",
            "Chen Divorce Proceedings",
            CaseStatus::Closed,
            None,
            "Divorce case with custody arrangements and asset division.",
            created(3),
        ),
        sample_case(
            "5",
            "2023-010",
            "Greenfield Properties",
            "Greenfield v. City Council",
            CaseStatus::Archived,
            None,
            "Zoning dispute for commercial property development.",
            created(4),
        ),
        sample_case(
            "6",
            "2023-015",
            "Maria Rodriguez",
            "Rodriguez Immigration Case",
            CaseStatus::Active,
            Some(days(10)),
            "Visa application and permanent residency process.",
            created(5),
        ),
    ]
}

pub fn sample_events(now: DateTime<Utc>) -> Vec<EventRecord> {
    let event = |id: &str, title: &str, in_days: i64, event_type, case_id: &str, case_name: &str| {
        EventRecord {
            id: id.to_string(),
            title: title.to_string(),
            date: now + Duration::days(in_days),
            event_type,
            case_id: Some(case_id.to_string()),
            case_name: Some(case_name.to_string()),
        }
    };

    vec![
        event("1", "Filing Deadline", 2, EventType::Deadline, "1", "Smith v. Johnson"),
        event("2", "Client Meeting", 4, EventType::Appointment, "2", "Williams Estate Planning"),
        event("3", "Court Hearing", 7, EventType::Court, "3", "Tech Innovations v. DataCorp"),
        event("4", "Document Submission", 10, EventType::Deadline, "1", "Smith v. Johnson"),
        event("5", "Settlement Conference", 14, EventType::Court, "6", "Rodriguez Immigration Case"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_reference_sample_cases() {
        let now = Utc::now();
        let cases = sample_cases(now);
        for event in sample_events(now) {
            let case_id = event.case_id.as_deref().unwrap();
            let case = cases.iter().find(|c| c.id == case_id).expect("linked case");
            assert_eq!(event.case_name.as_deref(), Some(case.title.as_str()));
            assert!(event.date > now);
        }
    }

    #[test]
    fn test_closed_and_archived_have_no_deadline() {
        for case in sample_cases(Utc::now()) {
            if matches!(case.status, CaseStatus::Closed | CaseStatus::Archived) {
                assert!(case.next_deadline.is_none());
            }
        }
    }
}
