pub mod password;
pub mod repository;

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{error, info, warn};

use crate::backend::{AuthProvider, CaseRepository};
use crate::error::AppError;
use crate::models::{
    AuthIdentity, CaseRecord, Credentials, EventRecord, NewCaseRequest, NewEventRequest,
    SignUpOutcome,
};

const INVALID_LOGIN: &str = "Invalid login credentials";

/// Local SQLite store serving both records and accounts.
#[derive(Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Opens (creating if missing) the database and runs migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::migrate(&pool).await?;
        info!("connected to {}", database_url);
        Ok(Self::new(pool))
    }

    /// A private in-memory database. A single connection keeps every query
    /// on the same database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::migrate(&pool).await?;
        Ok(Self::new(pool))
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::Database(e.into()))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    pub async fn is_empty(&self) -> Result<bool, AppError> {
        Ok(repository::count_cases(&self.db).await? == 0)
    }
}

#[async_trait]
impl CaseRepository for SqliteStore {
    async fn fetch_cases(&self) -> Result<Vec<CaseRecord>, AppError> {
        Ok(repository::fetch_cases(&self.db).await?)
    }

    async fn insert_case(&self, req: NewCaseRequest) -> Result<CaseRecord, AppError> {
        Ok(repository::insert_case(&self.db, req).await?)
    }

    async fn fetch_events(&self) -> Result<Vec<EventRecord>, AppError> {
        Ok(repository::fetch_events(&self.db).await?)
    }

    async fn insert_event(&self, req: NewEventRequest) -> Result<EventRecord, AppError> {
        Ok(repository::insert_event(&self.db, req).await?)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("select 1").execute(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for SqliteStore {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthIdentity, AppError> {
        let email = normalize_email(&credentials.email);
        let user = repository::find_user_by_email(&self.db, &email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_LOGIN.to_string()))?;

        let plain = credentials.password.clone();
        let hash = user.password_hash.clone();
        if !off_runtime(move || password::verify_password(&plain, &hash)).await? {
            warn!("failed sign-in for {}", email);
            return Err(AppError::Unauthorized(INVALID_LOGIN.to_string()));
        }

        Ok(AuthIdentity {
            user_id: user.id,
            email: user.email,
        })
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AppError> {
        let email = normalize_email(&credentials.email);
        if repository::find_user_by_email(&self.db, &email).await?.is_some() {
            return Err(AppError::Conflict("User already registered".to_string()));
        }

        let plain = credentials.password.clone();
        let hash = off_runtime(move || password::hash_password(&plain)).await?;
        let user = repository::insert_user(&self.db, &email, &hash)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::Conflict("User already registered".to_string())
                }
                other => AppError::Database(other),
            })?;
        info!("registered local user {}", user.id);

        Ok(SignUpOutcome {
            user_id: Some(user.id),
            confirmation_required: false,
            message: "Account created".to_string(),
        })
    }
}

/// Runs argon2 work on the blocking pool so it doesn't hold up a worker.
async fn off_runtime<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, argon2::password_hash::Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("password task failed: {}", e);
            AppError::InternalServerError
        })?
        .map_err(AppError::from)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
pub(crate) async fn setup_test_db() -> SqlitePool {
    SqliteStore::in_memory()
        .await
        .expect("Failed to create test db")
        .db
}
