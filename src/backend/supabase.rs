use std::env;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto;
use super::{AuthProvider, CaseRepository};
use crate::error::AppError;
use crate::models::{
    AuthIdentity, CaseRecord, Credentials, EventRecord, NewCaseRequest, NewEventRequest,
    SignUpOutcome,
};

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let url = env::var("SUPABASE_URL")
            .map_err(|_| AppError::Config("SUPABASE_URL is not set".to_string()))?;
        let anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| AppError::Config("SUPABASE_ANON_KEY is not set".to_string()))?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }
}

/// Talks to the Supabase REST and Auth endpoints.
pub struct SupabaseClient {
    client: Client,
    config: SupabaseConfig,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.url, path)
    }

    fn with_keys(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.config.anon_key))
    }

    async fn query<T: DeserializeOwned>(&self, table: &str, order: &str) -> Result<Vec<T>, AppError> {
        let response = self
            .with_keys(self.client.get(self.rest_url(table)))
            .query(&[("select", "*"), ("order", order)])
            .send()
            .await?;

        let rows = parse_json::<Vec<T>>(response).await?;
        debug!("fetched {} rows from {}", rows.len(), table);
        Ok(rows)
    }

    async fn insert<B, T>(&self, table: &str, row: &B) -> Result<T, AppError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .with_keys(self.client.post(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;

        parse_json::<Vec<T>>(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Upstream(format!("insert into {} returned no row", table)))
    }
}

/// Decodes a success body, or turns an error body into the message the
/// backend gave.
async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("supabase error {}: {}", status, body);
        return Err(dto::status_error(status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| AppError::Upstream(format!("Failed to parse backend response: {}", e)))
}

#[async_trait]
impl CaseRepository for SupabaseClient {
    async fn fetch_cases(&self) -> Result<Vec<CaseRecord>, AppError> {
        let rows = self.query::<dto::CaseRow>("cases", "created_at.desc").await?;
        Ok(rows.into_iter().map(CaseRecord::from).collect())
    }

    async fn insert_case(&self, req: NewCaseRequest) -> Result<CaseRecord, AppError> {
        let row: dto::CaseRow = self
            .insert("cases", &dto::InsertCaseRow::from(&req))
            .await?;
        Ok(row.into())
    }

    async fn fetch_events(&self) -> Result<Vec<EventRecord>, AppError> {
        let rows = self.query::<dto::EventRow>("events", "date.asc").await?;
        Ok(rows.into_iter().map(EventRecord::from).collect())
    }

    async fn insert_event(&self, req: NewEventRequest) -> Result<EventRecord, AppError> {
        let row: dto::EventRow = self
            .insert("events", &dto::InsertEventRow::from(&req))
            .await?;
        Ok(row.into())
    }

    async fn ping(&self) -> Result<(), AppError> {
        let response = self
            .with_keys(self.client.get(self.rest_url("cases")))
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        parse_json::<serde_json::Value>(response).await.map(|_| ())
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthIdentity, AppError> {
        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.anon_key)
            .json(&dto::PasswordGrantRequest {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await?;

        let token = parse_json::<dto::TokenResponse>(response)
            .await
            .map_err(dto::sign_in_error)?;

        Ok(AuthIdentity {
            user_id: token.user.id,
            email: token.user.email.unwrap_or_else(|| credentials.email.clone()),
        })
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AppError> {
        let response = self
            .client
            .post(self.auth_url("signup"))
            .header("apikey", &self.config.anon_key)
            .json(&dto::PasswordGrantRequest {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await?;

        let body = parse_json::<dto::SignUpResponse>(response).await?;
        Ok(body.into())
    }
}
