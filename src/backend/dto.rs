use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;
use crate::models::{
    CaseRecord, CaseStatus, EventRecord, EventType, NewCaseRequest, NewEventRequest,
    SignUpOutcome,
};

const CONFIRMATION_MESSAGE: &str = "Check your email for the confirmation link";

/// Row ids may come back as text (uuid) or as a bigint.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn opt_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "id_as_string")] String);

    Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(s)| s))
}

#[derive(Debug, Deserialize)]
pub struct CaseRow {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub case_number: String,
    pub client_name: String,
    pub title: String,
    pub status: CaseStatus,
    #[serde(default)]
    pub next_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CaseRow> for CaseRecord {
    fn from(row: CaseRow) -> Self {
        CaseRecord {
            id: row.id,
            case_number: row.case_number,
            client_name: row.client_name,
            title: row.title,
            status: row.status,
            next_deadline: row.next_deadline,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InsertCaseRow<'a> {
    pub case_number: &'a str,
    pub client_name: &'a str,
    pub title: &'a str,
    pub status: CaseStatus,
    pub description: Option<&'a str>,
    pub next_deadline: Option<DateTime<Utc>>,
}

impl<'a> From<&'a NewCaseRequest> for InsertCaseRow<'a> {
    fn from(req: &'a NewCaseRequest) -> Self {
        InsertCaseRow {
            case_number: &req.case_number,
            client_name: &req.client_name,
            title: &req.title,
            status: req.status,
            description: req.description.as_deref(),
            next_deadline: req.next_deadline,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EventRow {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default, deserialize_with = "opt_id_as_string")]
    pub case_id: Option<String>,
    #[serde(default)]
    pub case_name: Option<String>,
}

impl From<EventRow> for EventRecord {
    fn from(row: EventRow) -> Self {
        EventRecord {
            id: row.id,
            title: row.title,
            date: row.date,
            event_type: row.event_type,
            case_id: row.case_id,
            case_name: row.case_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InsertEventRow<'a> {
    pub title: &'a str,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub case_id: Option<&'a str>,
    pub case_name: Option<&'a str>,
}

impl<'a> From<&'a NewEventRequest> for InsertEventRow<'a> {
    fn from(req: &'a NewEventRequest) -> Self {
        InsertEventRow {
            title: &req.title,
            date: req.date,
            event_type: req.event_type,
            case_id: req.case_id.as_deref(),
            case_name: req.case_name.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PasswordGrantRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: AuthUser,
}

/// Sign-up returns a session when confirmation is off and the bare user
/// when a confirmation mail was sent.
#[derive(Debug, Deserialize)]
pub struct SignUpResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default)]
    pub id: Option<String>,
}

impl From<SignUpResponse> for SignUpOutcome {
    fn from(body: SignUpResponse) -> Self {
        let confirmation_required = body.access_token.is_none();
        SignUpOutcome {
            user_id: body.user.map(|u| u.id).or(body.id),
            confirmation_required,
            message: if confirmation_required {
                CONFIRMATION_MESSAGE.to_string()
            } else {
                "Account created".to_string()
            },
        }
    }
}

/// The auth and rest endpoints disagree on the error field name.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

/// Maps a non-success response to an error carrying the backend's message.
pub fn status_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| format!("backend returned {}", status));

    if status.is_client_error() {
        AppError::BadRequest(message)
    } else {
        AppError::Upstream(message)
    }
}

/// On the password grant a rejected request means bad credentials.
pub fn sign_in_error(err: AppError) -> AppError {
    match err {
        AppError::BadRequest(msg) => AppError::Unauthorized(msg),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_row_with_numeric_id() {
        let row: CaseRow = serde_json::from_value(serde_json::json!({
            "id": 42,
            "case_number": "2023-001",
            "client_name": "John Smith",
            "title": "Smith v. Johnson",
            "status": "active",
            "next_deadline": null,
            "description": "Personal injury case",
            "created_at": "2023-06-01T12:00:00+00:00"
        }))
        .unwrap();
        let record = CaseRecord::from(row);
        assert_eq!(record.id, "42");
        assert_eq!(record.next_deadline, None);
    }

    #[test]
    fn test_event_row_optional_case() {
        let row: EventRow = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "title": "Court Hearing",
            "date": "2023-06-15T09:30:00Z",
            "type": "court",
            "case_id": 3
        }))
        .unwrap();
        assert_eq!(row.case_id.as_deref(), Some("3"));
        assert_eq!(row.case_name, None);
    }

    #[test]
    fn test_error_body_prefers_description() {
        let body: ErrorBody = serde_json::from_value(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        }))
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid login credentials"));
    }

    #[test]
    fn test_sign_up_without_session_needs_confirmation() {
        let body: SignUpResponse = serde_json::from_value(serde_json::json!({
            "id": "5b0c1d2e",
            "email": "lawyer@example.com",
            "confirmation_sent_at": "2023-06-01T12:00:00Z"
        }))
        .unwrap();
        let outcome = SignUpOutcome::from(body);
        assert!(outcome.confirmation_required);
        assert_eq!(outcome.user_id.as_deref(), Some("5b0c1d2e"));
        assert_eq!(outcome.message, CONFIRMATION_MESSAGE);
    }

    #[test]
    fn test_sign_up_with_session_is_confirmed() {
        let body: SignUpResponse = serde_json::from_value(serde_json::json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "user": { "id": "9f8e", "email": "lawyer@example.com" }
        }))
        .unwrap();
        let outcome = SignUpOutcome::from(body);
        assert!(!outcome.confirmation_required);
        assert_eq!(outcome.user_id.as_deref(), Some("9f8e"));
        assert_eq!(outcome.message, "Account created");
    }

    #[test]
    fn test_status_error_mapping() {
        let body = serde_json::json!({ "msg": "User already registered" }).to_string();
        assert!(matches!(
            status_error(StatusCode::UNPROCESSABLE_ENTITY, &body),
            AppError::BadRequest(msg) if msg == "User already registered"
        ));
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, "upstream down"),
            AppError::Upstream(msg) if msg == "backend returned 503 Service Unavailable"
        ));
    }

    #[test]
    fn test_sign_in_rejection_is_unauthorized() {
        let body = serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })
        .to_string();
        let err = sign_in_error(status_error(StatusCode::BAD_REQUEST, &body));
        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Invalid login credentials"));

        let err = sign_in_error(status_error(StatusCode::BAD_GATEWAY, "{}"));
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
