pub mod dto;
pub mod memory;
pub mod supabase;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{
    AuthIdentity, CaseRecord, Credentials, EventRecord, NewCaseRequest, NewEventRequest,
    SignUpOutcome,
};

pub use memory::{GuestOnlyAuth, MemoryRepository};
pub use supabase::{SupabaseClient, SupabaseConfig};

/// Where case and event records live.
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// All cases, newest first.
    async fn fetch_cases(&self) -> Result<Vec<CaseRecord>, AppError>;
    async fn insert_case(&self, req: NewCaseRequest) -> Result<CaseRecord, AppError>;
    /// All events, earliest first.
    async fn fetch_events(&self) -> Result<Vec<EventRecord>, AppError>;
    async fn insert_event(&self, req: NewEventRequest) -> Result<EventRecord, AppError>;
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthIdentity, AppError>;
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AppError>;
}
