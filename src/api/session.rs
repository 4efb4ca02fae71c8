use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::models::Session;
use crate::state::AppState;

/// The caller's session, taken from an `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Expected: Bearer <token>".to_string())
        })?;

        state
            .sessions
            .get(token)
            .await
            .map(CurrentSession)
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))
    }
}
