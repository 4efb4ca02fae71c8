use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::models::{CaseRecord, EventRecord, NewCaseRequest, NewEventRequest};

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub async fn fetch_cases(db: &SqlitePool) -> Result<Vec<CaseRecord>, sqlx::Error> {
    sqlx::query_as::<_, CaseRecord>(
        r#"
        SELECT id, case_number, client_name, title, status, next_deadline, description, created_at
        FROM cases
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn count_cases(db: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cases")
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn insert_case(
    db: &SqlitePool,
    req: NewCaseRequest,
) -> Result<CaseRecord, sqlx::Error> {
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
    insert_case_record(db, &record).await?;
    Ok(record)
}

/// Stores a fully formed record, keeping its id and timestamps.
pub async fn insert_case_record<'e, E>(db: E, record: &CaseRecord) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO cases
            (id, case_number, client_name, title, status, next_deadline, description, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&record.id)
    .bind(&record.case_number)
    .bind(&record.client_name)
    .bind(&record.title)
    .bind(record.status)
    .bind(record.next_deadline)
    .bind(&record.description)
    .bind(record.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn fetch_events(db: &SqlitePool) -> Result<Vec<EventRecord>, sqlx::Error> {
    sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, title, date, type, case_id, case_name
        FROM events
        ORDER BY date ASC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn insert_event(
    db: &SqlitePool,
    req: NewEventRequest,
) -> Result<EventRecord, sqlx::Error> {
    let record = EventRecord {
        id: Uuid::new_v4().to_string(),
        title: req.title,
        date: req.date,
        event_type: req.event_type,
        case_id: req.case_id,
        case_name: req.case_name,
    };
    insert_event_record(db, &record).await?;
    Ok(record)
}

pub async fn insert_event_record<'e, E>(db: E, record: &EventRecord) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO events (id, title, date, type, case_id, case_name)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&record.id)
    .bind(&record.title)
    .bind(record.date)
    .bind(record.event_type)
    .bind(&record.case_id)
    .bind(&record.case_name)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_user_by_email(db: &SqlitePool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn insert_user(
    db: &SqlitePool,
    email: &str,
    password_hash: &str,
) -> Result<UserRow, sqlx::Error> {
    let user = UserRow {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        created_at: Utc::now(),
    };

    sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(db)
        .await?;

    Ok(user)
}
