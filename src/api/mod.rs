pub mod session;

use axum::Json;
use axum::extract::Query;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assistant::ChatMessage;
use crate::assistant::Sender;
use crate::error::AppError;
use crate::models::*;
use crate::services::{DayAgenda, MonthHighlights, viewer_offset};
use crate::state::AppState;

pub use session::CurrentSession;

#[derive(Deserialize)]
struct CaseQueryParams {
    #[serde(default)]
    q: String,
    status: Option<String>,
}

#[derive(Deserialize)]
struct EventQueryParams {
    #[serde(rename = "type")]
    event_type: Option<String>,
}

#[derive(Deserialize)]
struct DayQueryParams {
    date: NaiveDate,
    #[serde(rename = "type")]
    event_type: Option<String>,
    utc_offset: Option<i32>,
}

#[derive(Deserialize)]
struct MonthQueryParams {
    year: i32,
    month: u32,
    #[serde(rename = "type")]
    event_type: Option<String>,
    utc_offset: Option<i32>,
}

#[derive(Deserialize)]
struct ChatRequest {
    content: String,
}

#[derive(Serialize)]
struct ChatExchange {
    message: ChatMessage,
    reply: ChatMessage,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/guest", post(guest))
        .route("/auth/sign-out", post(sign_out))
        .route("/cases", get(list_cases).post(create_case))
        .route("/events", get(list_events).post(create_event))
        .route("/calendar/day", get(calendar_day))
        .route("/calendar/month", get(calendar_month))
        .route("/assistant/greeting", get(greeting))
        .route("/assistant/messages", post(send_message))
        .with_state(state)
}

fn parse_or_default<T>(raw: Option<&str>) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = AppError> + Default,
{
    raw.map(str::parse).transpose().map(Option::unwrap_or_default)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.repo.ping().await?;
    Ok(StatusCode::OK)
}

async fn sign_in(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Session>, AppError> {
    credentials.validate()?;
    let identity = state.auth.sign_in(&credentials).await?;
    info!("user {} signed in", identity.user_id);
    let session = state.sessions.open(Some(identity)).await;
    Ok(Json(session))
}

async fn sign_up(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<SignUpOutcome>), AppError> {
    credentials.validate_for_sign_up()?;
    let outcome = state.auth.sign_up(&credentials).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn guest(State(state): State<AppState>) -> Json<Session> {
    Json(state.sessions.open(None).await)
}

async fn sign_out(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> StatusCode {
    state.sessions.close(&session.token).await;
    StatusCode::NO_CONTENT
}

async fn list_cases(
    State(state): State<AppState>,
    _session: CurrentSession,
    Query(params): Query<CaseQueryParams>,
) -> Result<Json<Vec<CaseRecord>>, AppError> {
    let status: StatusFilter = parse_or_default(params.status.as_deref())?;
    let cases = state.cases().search(&params.q, status).await?;
    Ok(Json(cases))
}

async fn create_case(
    State(state): State<AppState>,
    _session: CurrentSession,
    Json(req): Json<NewCaseRequest>,
) -> Result<(StatusCode, Json<CaseRecord>), AppError> {
    let case = state.cases().create(req).await?;
    Ok((StatusCode::CREATED, Json(case)))
}

async fn list_events(
    State(state): State<AppState>,
    _session: CurrentSession,
    Query(params): Query<EventQueryParams>,
) -> Result<Json<Vec<EventRecord>>, AppError> {
    let filter: EventTypeFilter = parse_or_default(params.event_type.as_deref())?;
    let events = state.calendar().events(filter).await?;
    Ok(Json(events))
}

async fn create_event(
    State(state): State<AppState>,
    _session: CurrentSession,
    Json(req): Json<NewEventRequest>,
) -> Result<(StatusCode, Json<EventRecord>), AppError> {
    let event = state.calendar().create(req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn calendar_day(
    State(state): State<AppState>,
    _session: CurrentSession,
    Query(params): Query<DayQueryParams>,
) -> Result<Json<DayAgenda>, AppError> {
    let filter: EventTypeFilter = parse_or_default(params.event_type.as_deref())?;
    let tz = viewer_offset(params.utc_offset)?;
    let agenda = state.calendar().day(params.date, filter, &tz).await?;
    Ok(Json(agenda))
}

async fn calendar_month(
    State(state): State<AppState>,
    _session: CurrentSession,
    Query(params): Query<MonthQueryParams>,
) -> Result<Json<MonthHighlights>, AppError> {
    let filter: EventTypeFilter = parse_or_default(params.event_type.as_deref())?;
    let tz = viewer_offset(params.utc_offset)?;
    let highlights = state
        .calendar()
        .month(params.year, params.month, filter, &tz)
        .await?;
    Ok(Json(highlights))
}

async fn greeting(State(state): State<AppState>, _session: CurrentSession) -> Json<ChatMessage> {
    Json(state.assistant.greeting())
}

async fn send_message(
    State(state): State<AppState>,
    _session: CurrentSession,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatExchange>, AppError> {
    let reply = state
        .assistant
        .reply(&req.content)
        .ok_or_else(|| AppError::BadRequest("message is empty".to_string()))?;
    Ok(Json(ChatExchange {
        message: ChatMessage::new(req.content, Sender::User),
        reply,
    }))
}
