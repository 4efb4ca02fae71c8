use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum password length accepted on sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<(), AppError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::BadRequest("a valid email is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(AppError::BadRequest("password is required".to_string()));
        }
        Ok(())
    }

    pub fn validate_for_sign_up(&self) -> Result<(), AppError> {
        self.validate()?;
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Password should be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }
}

/// A user confirmed by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpOutcome {
    pub user_id: Option<String>,
    pub confirmation_required: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    /// `None` for guest sessions.
    pub user: Option<AuthIdentity>,
    pub is_guest: bool,
    pub expires_at: DateTime<Utc>,
}
