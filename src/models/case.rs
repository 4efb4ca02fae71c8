use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Active,
    Pending,
    Closed,
    Archived,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 4] = [
        CaseStatus::Active,
        CaseStatus::Pending,
        CaseStatus::Closed,
        CaseStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Active => "active",
            CaseStatus::Pending => "pending",
            CaseStatus::Closed => "closed",
            CaseStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CaseStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::BadRequest(format!("unknown case status: {}", s)))
    }
}

/// Status selector of the case grid: one status, or every status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CaseStatus),
}

impl StatusFilter {
    pub fn accepts(&self, status: CaseStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CaseRecord {
    pub id: String,
    pub case_number: String,
    pub client_name: String,
    pub title: String,
    pub status: CaseStatus,
    pub next_deadline: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCaseRequest {
    pub case_number: String,
    pub client_name: String,
    pub title: String,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub next_deadline: Option<DateTime<Utc>>,
}

impl NewCaseRequest {
    /// Checks the fields the new-case form marks as required and
    /// normalizes an empty description to none.
    pub fn validate(mut self) -> Result<Self, AppError> {
        for (field, value) in [
            ("case_number", &self.case_number),
            ("client_name", &self.client_name),
            ("title", &self.title),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::BadRequest(format!("{} is required", field)));
            }
        }

        if self
            .description
            .as_deref()
            .is_some_and(|d| d.trim().is_empty())
        {
            self.description = None;
        }

        Ok(self)
    }
}
