use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthProvider, CaseRepository};
use crate::error::AppError;
use crate::models::{
    AuthIdentity, CaseRecord, Credentials, EventRecord, NewCaseRequest, NewEventRequest,
    SignUpOutcome,
};

/// Process-local store; contents are lost on restart.
#[derive(Default)]
pub struct MemoryRepository {
    cases: RwLock<Vec<CaseRecord>>,
    events: RwLock<Vec<EventRecord>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(cases: Vec<CaseRecord>, events: Vec<EventRecord>) -> Self {
        Self {
            cases: RwLock::new(cases),
            events: RwLock::new(events),
        }
    }
}

#[async_trait]
impl CaseRepository for MemoryRepository {
    async fn fetch_cases(&self) -> Result<Vec<CaseRecord>, AppError> {
        let mut cases = self.cases.read().await.clone();
        cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cases)
    }

    async fn insert_case(&self, req: NewCaseRequest) -> Result<CaseRecord, AppError> {
        let record = CaseRecord {
            id: Uuid::new_v4().to_string(),
            case_number: req.case_number,
            client_name: req.client_name,
            title: req.title,
            status: req.status,
            next_deadline: req.next_deadline,
            description: req.description,
            created_at: Utc::now(),
        };
        self.cases.write().await.push(record.clone());
        Ok(record)
    }

    async fn fetch_events(&self) -> Result<Vec<EventRecord>, AppError> {
        let mut events = self.events.read().await.clone();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn insert_event(&self, req: NewEventRequest) -> Result<EventRecord, AppError> {
        let record = EventRecord {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            date: req.date,
            event_type: req.event_type,
            case_id: req.case_id,
            case_name: req.case_name,
        };
        self.events.write().await.push(record.clone());
        Ok(record)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Auth for deployments without accounts: only guest sessions work.
pub struct GuestOnlyAuth;

#[async_trait]
impl AuthProvider for GuestOnlyAuth {
    async fn sign_in(&self, _credentials: &Credentials) -> Result<AuthIdentity, AppError> {
        Err(AppError::Unauthorized(
            "Sign-in is not available on this server, continue as guest".to_string(),
        ))
    }

    async fn sign_up(&self, _credentials: &Credentials) -> Result<SignUpOutcome, AppError> {
        Err(AppError::BadRequest(
            "Sign-up is not available on this server".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::{CaseStatus, EventType};

    #[tokio::test]
    async fn test_cases_newest_first() {
        let repo = MemoryRepository::new();
        for number in ["2023-001", "2023-002"] {
            repo.insert_case(NewCaseRequest {
                case_number: number.to_string(),
                client_name: "Client".to_string(),
                title: "Matter".to_string(),
                status: CaseStatus::Pending,
                description: None,
                next_deadline: None,
            })
            .await
            .expect("insert case");
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let cases = repo.fetch_cases().await.unwrap();
        assert_eq!(cases[0].case_number, "2023-002");
        assert_eq!(cases[1].case_number, "2023-001");
    }

    #[tokio::test]
    async fn test_events_earliest_first() {
        let repo = MemoryRepository::new();
        let now = Utc::now();
        for (title, offset) in [("later", 5), ("sooner", 1)] {
            repo.insert_event(NewEventRequest {
                title: title.to_string(),
                date: now + Duration::days(offset),
                event_type: EventType::Deadline,
                case_id: None,
                case_name: None,
            })
            .await
            .expect("insert event");
        }

        let titles: Vec<String> = repo
            .fetch_events()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["sooner", "later"]);
    }

    #[tokio::test]
    async fn test_guest_only_auth_rejects_sign_in() {
        let creds = Credentials {
            email: "name@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(matches!(
            GuestOnlyAuth.sign_in(&creds).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
