use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::TimeDelta;

use crate::error::AppError;
use crate::services::session::DEFAULT_MAX_GUEST_SESSIONS;

const MAX_SESSION_TTL_SECS: i64 = 366 * 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Sqlite { database_url: String },
    Supabase,
    Memory,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_source: DataSource,
    pub seed_sample_data: bool,
    pub session_ttl: TimeDelta,
    pub session_reap_interval_secs: u64,
    pub max_guest_sessions: usize,
    pub cors_origin: String,
    pub assistant_rules_path: Option<PathBuf>,
}

impl AppConfig {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_source = match lookup("DATA_SOURCE").as_deref().unwrap_or("sqlite") {
            "sqlite" => DataSource::Sqlite {
                database_url: lookup("DATABASE_URL")
                    .unwrap_or_else(|| "sqlite://casedesk.db".to_string()),
            },
            "supabase" => DataSource::Supabase,
            "memory" => DataSource::Memory,
            other => {
                return Err(AppError::Config(format!(
                    "DATA_SOURCE must be sqlite, supabase or memory, got {}",
                    other
                )));
            }
        };

        let ttl_secs: i64 = parse_or(&lookup, "SESSION_TTL_SECS", 12 * 60 * 60)?;
        let session_ttl = TimeDelta::try_seconds(ttl_secs)
            .filter(|_| (1..=MAX_SESSION_TTL_SECS).contains(&ttl_secs))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "SESSION_TTL_SECS must be between 1 and {}, got {}",
                    MAX_SESSION_TTL_SECS, ttl_secs
                ))
            })?;

        let session_reap_interval_secs: u64 = parse_or(&lookup, "SESSION_REAP_INTERVAL_SECS", 300)?;
        if session_reap_interval_secs == 0 {
            return Err(AppError::Config(
                "SESSION_REAP_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }

        let max_guest_sessions: usize = parse_or(&lookup, "MAX_GUEST_SESSIONS", DEFAULT_MAX_GUEST_SESSIONS)?;
        if max_guest_sessions == 0 {
            return Err(AppError::Config("MAX_GUEST_SESSIONS must be at least 1".to_string()));
        }

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?,
            data_source,
            seed_sample_data: parse_or(&lookup, "SEED_SAMPLE_DATA", true)?,
            session_ttl,
            session_reap_interval_secs,
            max_guest_sessions,
            cors_origin: lookup("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            assistant_rules_path: lookup("ASSISTANT_RULES_PATH").map(PathBuf::from),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} is invalid: {}", key, e))),
    }
}
